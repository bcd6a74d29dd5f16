//! Wrapper flattening
//!
//! A field typed as one of the well-known wrapper messages
//! (`google.protobuf.StringValue` and friends) is rewritten into a plain
//! scalar field. All changes are computed into a [`GraphPatch`] first and
//! applied in one batch, so the graph is never mutated while it is being
//! traversed.

use super::nodes::{Vertex, VertexKey, VertexKind};
use super::{EdgeId, EdgeKind, FieldTypeEdge, TypeGraph, VertexId};
use crate::descriptor::WRAPPERS_FILE;
use std::collections::{BTreeSet, HashSet};

/// An edge to add, with endpoints named by identity
///
/// Endpoints are resolved when the patch is applied, after vertex removals
/// and additions, so an edge may point at a vertex the same patch adds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingEdge {
    pub source: VertexKey,
    pub target: VertexKey,
    pub edge: FieldTypeEdge,
}

/// A batch of graph mutations applied as one unit
///
/// Application order is fixed: remove edges, remove vertices, add vertices,
/// add edges.
#[derive(Debug, Default)]
pub struct GraphPatch {
    remove_edges: BTreeSet<EdgeId>,
    remove_vertices: BTreeSet<VertexId>,
    add_vertices: Vec<Vertex>,
    add_edges: Vec<PendingEdge>,
    pending: HashSet<PendingEdge>,
}

impl GraphPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_edge(&mut self, edge: EdgeId) {
        self.remove_edges.insert(edge);
    }

    pub fn remove_vertex(&mut self, vertex: VertexId) {
        self.remove_vertices.insert(vertex);
    }

    /// Queue a vertex; a second vertex with the same identity is ignored
    pub fn add_vertex(&mut self, vertex: Vertex) {
        if !self.add_vertices.contains(&vertex) {
            self.add_vertices.push(vertex);
        }
    }

    /// Queue an edge; duplicates of an already queued edge are ignored
    pub fn add_edge(&mut self, source: VertexKey, target: VertexKey, edge: FieldTypeEdge) {
        let pending = PendingEdge {
            source,
            target,
            edge,
        };
        if self.pending.insert(pending.clone()) {
            self.add_edges.push(pending);
        }
    }

    pub fn removed_vertex_count(&self) -> usize {
        self.remove_vertices.len()
    }

    pub fn removed_edge_count(&self) -> usize {
        self.remove_edges.len()
    }

    pub fn added_vertices(&self) -> &[Vertex] {
        &self.add_vertices
    }

    pub fn added_edges(&self) -> &[PendingEdge] {
        &self.add_edges
    }

    /// Total number of queued mutations
    pub fn len(&self) -> usize {
        self.remove_edges.len()
            + self.remove_vertices.len()
            + self.add_vertices.len()
            + self.add_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeGraph {
    /// Apply every mutation in `patch`
    pub fn apply(&mut self, patch: GraphPatch) {
        for edge in patch.remove_edges {
            self.remove_edge(edge);
        }

        for vertex in patch.remove_vertices {
            self.remove_vertex(vertex);
        }

        for vertex in patch.add_vertices {
            self.add_vertex(vertex);
        }

        for pending in patch.add_edges {
            match (self.find(&pending.source), self.find(&pending.target)) {
                (Some(source), Some(target)) => {
                    self.add_edge(source, target, pending.edge);
                }
                _ => tracing::warn!(
                    source = %pending.source.full_name,
                    target = %pending.target.full_name,
                    "dropping edge with a removed endpoint"
                ),
            }
        }
    }
}

/// Compute the patch that removes wrapper messages from `graph`
///
/// Every field typed as a wrapper is replaced by a field of the same identity
/// carrying the wrapped primitive's type, and every edge into the old field
/// is redirected to the replacement. Returns an empty patch when no wrapper
/// declarations are present.
pub fn plan_wrapper_flattening(graph: &TypeGraph) -> GraphPatch {
    let mut patch = GraphPatch::new();

    let wrappers: BTreeSet<VertexId> = graph
        .vertices()
        .filter(|(_, v)| v.kind() == VertexKind::Message && v.file() == WRAPPERS_FILE)
        .map(|(id, _)| id)
        .collect();

    // Nothing declared in the wrapper file survives
    for (id, vertex) in graph.vertices() {
        if vertex.file() == WRAPPERS_FILE {
            patch.remove_vertex(id);
        }
    }

    let primitives: BTreeSet<VertexId> = wrappers
        .iter()
        .flat_map(|&wrapper| graph.edges_from(wrapper))
        .filter(|(_, _, edge)| edge.kind() == EdgeKind::Field)
        .map(|(_, target, _)| target)
        .filter(|&target| graph.vertex(target).map(Vertex::kind) == Some(VertexKind::Field))
        .collect();

    for &primitive_id in &primitives {
        let Some(primitive) = graph.vertex(primitive_id) else {
            continue;
        };

        let mut originating = BTreeSet::new();
        for (edge_id, source, _) in graph.edges_to(primitive_id) {
            patch.remove_edge(edge_id);
            let is_field = graph.vertex(source).map(Vertex::kind) == Some(VertexKind::Field);
            if is_field && !wrappers.contains(&source) {
                originating.insert(source);
            }
        }

        for origin_id in originating {
            let Some(origin) = graph.vertex(origin_id) else {
                continue;
            };
            patch.remove_vertex(origin_id);

            let replacement = origin.with_primitive_type(primitive);
            let replacement_key = replacement.key();

            for (edge_id, source, _) in graph.edges_to(origin_id) {
                patch.remove_edge(edge_id);
                if let Some(source_vertex) = graph.vertex(source) {
                    patch.add_edge(
                        source_vertex.key(),
                        replacement_key.clone(),
                        FieldTypeEdge::new(primitive.path_type(), false),
                    );
                }
            }

            patch.add_vertex(replacement);
        }
    }

    patch
}
