//! Cross-message reference resolution
//!
//! Runs after every vertex of the descriptor set exists, since a field may
//! reference a message declared later in file order.

use super::nodes::{VertexKey, VertexKind};
use super::{EdgeKind, FieldTypeEdge, TypeGraph, VertexId};
use std::collections::{HashMap, HashSet};

/// Link message-typed fields into the referenced message's fields
///
/// For every field-path edge flagged as message-typed, the target field gets
/// an edge to each vertex owned by its declared message. Message- and
/// enum-typed fields also get a type-reference edge to the declaration.
pub(crate) fn resolve_references(
    graph: &mut TypeGraph,
    message_fields: &HashMap<String, Vec<VertexId>>,
) {
    let mut seen = HashSet::new();
    let referencing: Vec<VertexId> = graph
        .edges()
        .filter(|(_, _, _, edge)| edge.kind() == EdgeKind::Field && edge.is_message_type())
        .map(|(_, _, target, _)| target)
        .filter(|target| seen.insert(*target))
        .collect();

    for field_id in referencing {
        let Some(native_type) = graph
            .vertex(field_id)
            .and_then(|v| v.native_type())
            .map(str::to_string)
        else {
            continue;
        };

        let Some(message_id) = graph.find(&VertexKey::message(&native_type)) else {
            tracing::warn!(
                field = graph.vertex(field_id).map(|v| v.full_name()).unwrap_or_default(),
                type_name = %native_type,
                "referenced message type not in descriptor set"
            );
            continue;
        };

        let links: Vec<(VertexId, FieldTypeEdge)> = message_fields
            .get(&native_type)
            .into_iter()
            .flatten()
            .filter_map(|&target| {
                let vertex = graph.vertex(target)?;
                Some((
                    target,
                    FieldTypeEdge::new(vertex.path_type(), vertex.is_message_type()),
                ))
            })
            .collect();

        for (target, edge) in links {
            graph.add_edge(field_id, target, edge);
        }

        if let Some(message) = graph.vertex(message_id) {
            let edge = FieldTypeEdge::type_ref(message.path_type(), true);
            graph.add_edge(field_id, message_id, edge);
        }
    }

    link_enum_types(graph);
}

/// Add a type-reference edge from every enum-typed field to its enum
fn link_enum_types(graph: &mut TypeGraph) {
    let links: Vec<(VertexId, VertexId, FieldTypeEdge)> = graph
        .vertices()
        .filter(|(_, v)| v.kind() == VertexKind::Field && v.path_type().ends_with("[type=enum]"))
        .filter_map(|(field_id, v)| {
            let enum_id = graph.find(&VertexKey::new(VertexKind::Enum, v.native_type()?))?;
            let edge = FieldTypeEdge::type_ref(graph.vertex(enum_id)?.path_type(), false);
            Some((field_id, enum_id, edge))
        })
        .collect();

    for (field_id, enum_id, edge) in links {
        graph.add_edge(field_id, enum_id, edge);
    }
}
