//! Summarize a schema graph

use super::load_graph;
use crate::output::{json::InspectOutput, terminal};
use crate::{GraphArgs, OutputFormat};
use anyhow::Result;
use protograph_core::ProtographConfig;

pub fn run(args: &GraphArgs, format: OutputFormat, config: &ProtographConfig) -> Result<()> {
    let graph = load_graph(args, config)?;
    let summary = InspectOutput::from_graph(&graph);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Terminal => println!("{}", terminal::format_summary(&summary)),
    }

    Ok(())
}
