//! Protograph CLI library, exposed for integration tests

pub mod commands;
pub mod logging;
pub mod output;

use clap::{Args, Parser, Subcommand};
use protograph_core::config::GraphConfig;
use protograph_core::GraphOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "protograph")]
#[command(about = "Inspect protobuf descriptor sets as a navigable type graph", long_about = None)]
#[command(version = protograph_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .protograph.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Summarize the graph of a descriptor set
    Inspect {
        #[command(flatten)]
        graph: GraphArgs,
    },

    /// List the flattened schema fields of the root message
    Fields {
        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Enumerate all paths between two schema elements
    Paths {
        #[command(flatten)]
        graph: GraphArgs,

        /// Fully-qualified name of the source element
        #[arg(long)]
        from: String,

        /// Fully-qualified name of the target element
        #[arg(long)]
        to: String,
    },
}

/// Arguments selecting and shaping the graph to build
#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Serialized FileDescriptorSet (e.g. from `protoc --descriptor_set_out`)
    pub descriptor: PathBuf,

    /// Fully-qualified root message (auto-detected if omitted)
    #[arg(long)]
    pub message: Option<String>,

    /// Schema file to auto-detect the root message in
    #[arg(long)]
    pub file: Option<String>,

    /// Keep google.protobuf wrapper types as nested messages
    #[arg(long)]
    pub no_flatten: bool,
}

impl GraphArgs {
    /// Builder options: flags override the configuration file
    pub fn options(&self, config: &GraphConfig) -> GraphOptions {
        let mut options = config.to_options();
        if self.message.is_some() {
            options.message_name = self.message.clone();
        }
        if self.file.is_some() {
            options.filename = self.file.clone();
        }
        if self.no_flatten {
            options.flatten_wrappers = false;
        }
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Resolve the format from a flag, falling back to the configured name
    pub fn resolve(flag: Option<OutputFormat>, configured: &str) -> Self {
        flag.unwrap_or(match configured {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Terminal,
        })
    }
}
