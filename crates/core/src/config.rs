//! Configuration file parsing for .protograph.toml

use crate::graph::GraphOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".protograph.toml";

/// Main configuration structure for .protograph.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtographConfig {
    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Fully-qualified root message (auto-detected if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_message: Option<String>,

    /// Schema file to auto-detect the root in (last file if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// Collapse google.protobuf wrapper types into scalars
    #[serde(default = "default_true")]
    pub flatten_wrappers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "terminal" or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable color output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "terminal".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            root_message: None,
            source_file: None,
            flatten_wrappers: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color: true,
        }
    }
}

impl GraphConfig {
    /// Builder inputs described by this section
    pub fn to_options(&self) -> GraphOptions {
        GraphOptions {
            message_name: self.root_message.clone(),
            filename: self.source_file.clone(),
            flatten_wrappers: self.flatten_wrappers,
        }
    }
}

impl ProtographConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ProtographConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Find and load .protograph.toml from the given directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
