//! Tracing subscriber setup

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Install a stderr subscriber; `RUST_LOG` wins over the verbosity count
///
/// `color` follows `[output] color`, so disabling colour also strips ANSI
/// escapes from log lines.
pub fn init_logging(verbose: u8, color: bool) {
    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(log_layer(std::io::stderr, color))
        .try_init();
}

/// The fmt layer log lines are written through
pub fn log_layer<S, W>(writer: W, color: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(color)
        .with_target(false)
}

/// Default level for a `-v` count
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn log_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)))
}
