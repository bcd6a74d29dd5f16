//! Enumerate paths between two schema elements

use super::load_graph;
use crate::output::{json::PathsOutput, terminal};
use crate::{GraphArgs, OutputFormat};
use anyhow::{Context, Result};
use protograph_core::ProtographConfig;

pub fn run(
    args: &GraphArgs,
    from: &str,
    to: &str,
    format: OutputFormat,
    config: &ProtographConfig,
) -> Result<()> {
    let graph = load_graph(args, config)?;

    let source = graph
        .find_by_name(from)
        .with_context(|| format!("No schema element named {}", from))?;
    let target = graph
        .find_by_name(to)
        .with_context(|| format!("No schema element named {}", to))?;

    let paths = graph.all_paths(source, target);
    let output = PathsOutput::from_paths(&graph, from, to, &paths);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Terminal => println!("{}", terminal::format_paths(&output)),
    }

    Ok(())
}
