//! JSON output formatting

use protograph_core::{EdgeKind, GraphPath, ProtoGraph, VertexKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct InspectOutput {
    pub root: String,
    pub file: String,
    pub major_version: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub counts: JsonCounts,
    pub extensions: usize,
    pub hash: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JsonCounts {
    pub vertices: usize,
    pub edges: usize,
    pub messages: usize,
    pub fields: usize,
    pub one_ofs: usize,
    pub enums: usize,
}

impl InspectOutput {
    pub fn from_graph(graph: &ProtoGraph) -> Self {
        let mut counts = JsonCounts {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            ..Default::default()
        };
        for (_, vertex) in graph.vertices() {
            match vertex.kind() {
                VertexKind::Message => counts.messages += 1,
                VertexKind::Field => counts.fields += 1,
                VertexKind::OneOf => counts.one_ofs += 1,
                VertexKind::Enum => counts.enums += 1,
            }
        }

        Self {
            root: graph.full_name().to_string(),
            file: graph.root().file().to_string(),
            major_version: graph.major_version(),
            comment: graph.comment().to_string(),
            counts,
            extensions: graph.registry().len(),
            hash: graph.identity_hash(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PathsOutput {
    pub from: String,
    pub to: String,
    pub paths: Vec<JsonPath>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonPath {
    pub length: usize,
    pub steps: Vec<JsonStep>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonStep {
    pub source: String,
    pub target: String,
    pub edge_type: String,
    pub type_ref: bool,
    pub is_message_type: bool,
}

impl PathsOutput {
    pub fn from_paths(graph: &ProtoGraph, from: &str, to: &str, paths: &[GraphPath]) -> Self {
        let name_of = |id| {
            graph
                .vertex(id)
                .map(|v| v.full_name().to_string())
                .unwrap_or_default()
        };

        let paths = paths
            .iter()
            .map(|path| {
                let steps: Vec<JsonStep> = path
                    .edges
                    .iter()
                    .filter_map(|&edge_id| graph.edge(edge_id))
                    .map(|(source, target, edge)| JsonStep {
                        source: name_of(source),
                        target: name_of(target),
                        edge_type: edge.edge_type().to_string(),
                        type_ref: edge.kind() == EdgeKind::TypeRef,
                        is_message_type: edge.is_message_type(),
                    })
                    .collect();
                JsonPath {
                    length: steps.len(),
                    steps,
                }
            })
            .collect();

        Self {
            from: from.to_string(),
            to: to.to_string(),
            paths,
        }
    }
}
