//! CLI commands

pub mod fields;
pub mod init;
pub mod inspect;
pub mod paths;

use crate::GraphArgs;
use anyhow::{Context, Result};
use protograph_core::{ProtoGraph, ProtographConfig};

/// Read a descriptor set from disk and build its graph
pub fn load_graph(args: &GraphArgs, config: &ProtographConfig) -> Result<ProtoGraph> {
    let bytes = std::fs::read(&args.descriptor)
        .with_context(|| format!("Failed to read {}", args.descriptor.display()))?;

    let options = args.options(&config.graph);
    let graph = ProtoGraph::from_bytes(&bytes, &options)
        .with_context(|| format!("Failed to build graph from {}", args.descriptor.display()))?;

    tracing::info!(
        root = %graph.full_name(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded schema graph"
    );
    Ok(graph)
}
