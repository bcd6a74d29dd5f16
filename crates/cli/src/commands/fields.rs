//! List the flattened schema fields of the root message

use super::load_graph;
use crate::output::terminal;
use crate::{GraphArgs, OutputFormat};
use anyhow::Result;
use protograph_core::{ModelVisitor, ProtographConfig, SchemaField, SchemaFieldVisitor};

pub fn run(args: &GraphArgs, format: OutputFormat, config: &ProtographConfig) -> Result<()> {
    let graph = load_graph(args, config)?;

    let visitor = SchemaFieldVisitor::new();
    let visitors: [&dyn ModelVisitor<Output = SchemaField>; 1] = [&visitor];
    let fields = graph.accept(&visitors);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
        OutputFormat::Terminal => {
            println!("{}", terminal::format_header(&graph));
            for field in &fields {
                println!("{}", terminal::format_field(field));
            }
            println!("\n  {} fields", fields.len());
        }
    }

    Ok(())
}
