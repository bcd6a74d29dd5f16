//! Graph query operations: neighbourhoods and path enumeration

use super::{EdgeId, EdgeKind, FieldTypeEdge, TypeGraph, VertexId};
use std::collections::HashSet;

/// A directed path as the sequence of edges it follows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPath {
    /// Visited vertices, source first and target last
    pub vertices: Vec<VertexId>,
    /// Traversed edges; `edges.len() == vertices.len() - 1`
    pub edges: Vec<EdgeId>,
}

impl GraphPath {
    /// Number of edges on the path
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    pub fn target(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }
}

/// A query interface over a built graph
pub struct GraphQuery<'a> {
    graph: &'a TypeGraph,
}

impl<'a> GraphQuery<'a> {
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self { graph }
    }

    /// Vertices with an edge into `vertex`
    pub fn predecessors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.graph
            .edges_to(vertex)
            .map(|(_, source, _)| source)
            .collect()
    }

    /// Vertices `vertex` has an edge to
    pub fn successors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.graph
            .edges_from(vertex)
            .map(|(_, target, _)| target)
            .collect()
    }

    /// Targets of outgoing edges of a specific kind
    pub fn find_by_edge_kind(&self, vertex: VertexId, kind: EdgeKind) -> Vec<VertexId> {
        self.graph
            .edges_from(vertex)
            .filter(|(_, _, edge)| edge.kind() == kind)
            .map(|(_, target, _)| target)
            .collect()
    }

    /// All simple directed paths from `from` to `to`
    ///
    /// No vertex repeats within a path, so cycles in the graph never make
    /// this loop. Parallel edges yield distinct paths. When `from == to`
    /// the only paths are self-loop edges. Returns an empty list when no
    /// path exists. The number of paths can grow exponentially with the
    /// number of parallel routes.
    pub fn all_paths(&self, from: VertexId, to: VertexId) -> Vec<GraphPath> {
        self.paths_matching(from, to, &|_| true)
    }

    /// Like [`GraphQuery::all_paths`], following field-path edges only
    ///
    /// Type-reference edges are skipped, so each path corresponds to one
    /// field path through the schema.
    pub fn field_paths(&self, from: VertexId, to: VertexId) -> Vec<GraphPath> {
        self.paths_matching(from, to, &|edge| edge.kind() == EdgeKind::Field)
    }

    fn paths_matching(
        &self,
        from: VertexId,
        to: VertexId,
        follow: &dyn Fn(&FieldTypeEdge) -> bool,
    ) -> Vec<GraphPath> {
        if self.graph.vertex(from).is_none() || self.graph.vertex(to).is_none() {
            return Vec::new();
        }

        if from == to {
            return self
                .graph
                .edges_from(from)
                .filter(|(_, target, edge)| *target == from && follow(edge))
                .map(|(edge, _, _)| GraphPath {
                    vertices: vec![from, from],
                    edges: vec![edge],
                })
                .collect();
        }

        let mut paths = Vec::new();
        let mut current = GraphPath {
            vertices: vec![from],
            edges: Vec::new(),
        };
        let mut visited = HashSet::new();
        visited.insert(from);

        self.find_paths_recursive(from, to, follow, &mut current, &mut visited, &mut paths);

        paths
    }

    fn find_paths_recursive(
        &self,
        vertex: VertexId,
        target: VertexId,
        follow: &dyn Fn(&FieldTypeEdge) -> bool,
        current: &mut GraphPath,
        visited: &mut HashSet<VertexId>,
        paths: &mut Vec<GraphPath>,
    ) {
        for (edge, next, weight) in self.graph.edges_from(vertex) {
            if !follow(weight) || visited.contains(&next) {
                continue;
            }

            current.vertices.push(next);
            current.edges.push(edge);

            if next == target {
                paths.push(current.clone());
            } else {
                visited.insert(next);
                self.find_paths_recursive(next, target, follow, current, visited, paths);
                visited.remove(&next);
            }

            current.vertices.pop();
            current.edges.pop();
        }
    }
}
