//! Root message selection

use super::nodes::{VertexKey, VertexKind};
use super::{TypeGraph, VertexId};
use crate::error::{GraphError, Result};
use prost_types::{FileDescriptorProto, FileDescriptorSet};

/// Exact lookup of a message by fully-qualified name
pub fn find_message(graph: &TypeGraph, message_name: &str) -> Result<VertexId> {
    graph
        .find(&VertexKey::message(message_name))
        .ok_or_else(|| GraphError::NotFound(message_name.to_string()))
}

/// The file auto-detection searches: the one `filename` ends with, else the
/// last file of the set
pub fn target_file<'a>(
    set: &'a FileDescriptorSet,
    filename: Option<&str>,
) -> Result<&'a FileDescriptorProto> {
    let matched = filename.and_then(|filename| {
        set.file
            .iter()
            .find(|file| !file.name().is_empty() && filename.ends_with(file.name()))
    });

    matched
        .or_else(|| set.file.last())
        .ok_or(GraphError::EmptyDescriptorSet)
}

/// Find the single top-level message of `file_name` that nothing else uses
///
/// A candidate has no incoming edges (no field is typed as it) and each
/// vertex it owns is reachable only from the candidate itself (it is not a
/// shared sub-type). Zero candidates and several candidates are both errors;
/// candidates are reported sorted by name.
pub fn autodetect_root(graph: &TypeGraph, file_name: &str) -> Result<VertexId> {
    let mut candidates: Vec<(VertexId, &str)> = graph
        .vertices()
        .filter(|(_, v)| {
            v.kind() == VertexKind::Message && v.parent().is_none() && v.file() == file_name
        })
        .filter(|&(id, _)| graph.edges_to(id).next().is_none())
        .filter(|&(id, _)| {
            graph.edges_from(id).all(|(_, child, _)| {
                graph.edges_to(child).all(|(_, source, _)| source == id)
            })
        })
        .map(|(id, v)| (id, v.full_name()))
        .collect();
    candidates.sort_by(|a, b| a.1.cmp(b.1));

    match candidates.as_slice() {
        [(root, name)] => {
            tracing::info!(root = %name, file = %file_name, "autodetected root message");
            Ok(*root)
        }
        [] => Err(GraphError::AmbiguousOrMissingRoot(format!(
            "no candidate message in {}",
            file_name
        ))),
        many => Err(GraphError::AmbiguousOrMissingRoot(format!(
            "{} candidates in {}: {}",
            many.len(),
            file_name,
            many.iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
