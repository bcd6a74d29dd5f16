//! Tests for log output setup

use protograph_cli::logging::{default_level, log_layer};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn log_line(color: bool) -> String {
    let out = Captured::default();
    let subscriber = tracing_subscriber::registry().with(log_layer(out.clone(), color));
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(type_name = "acme.Missing", "referenced message type not in descriptor set");
    });
    let bytes = out.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_color_disabled_strips_ansi() {
    let line = log_line(false);
    assert!(line.contains("WARN"));
    assert!(line.contains("acme.Missing"));
    assert!(!line.contains('\u{1b}'));
}

#[test]
fn test_color_enabled_keeps_ansi() {
    assert!(log_line(true).contains('\u{1b}'));
}

#[test]
fn test_verbosity_levels() {
    assert_eq!(default_level(0), "warn");
    assert_eq!(default_level(1), "info");
    assert_eq!(default_level(2), "debug");
    assert_eq!(default_level(7), "trace");
}
