//! Schema graph data structures and operations

pub mod builder;
pub mod edges;
pub mod flatten;
pub mod nodes;
pub mod proto;
pub mod query;
pub mod resolver;
pub mod root;

pub use builder::GraphBuilder;
pub use edges::{EdgeKind, FieldTypeEdge};
pub use flatten::GraphPatch;
pub use nodes::{DataType, EnumValue, FieldLabel, Vertex, VertexData, VertexKey, VertexKind};
pub use proto::{GraphOptions, ProtoGraph};
pub use query::{GraphPath, GraphQuery};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Unique identifier for a vertex in the schema graph
pub type VertexId = NodeIndex;

/// Unique identifier for an edge in the schema graph
pub type EdgeId = EdgeIndex;

/// Vertex set plus edge multiset shared by every construction phase
///
/// A stable graph keeps ids valid across the removals done while
/// flattening wrappers.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    /// The underlying directed multigraph
    graph: StableDiGraph<Vertex, FieldTypeEdge>,

    /// Index for vertex lookup by identity
    index: HashMap<VertexKey, VertexId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, or return the existing one with the same identity
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let key = vertex.key();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }

        let id = self.graph.add_node(vertex);
        self.index.insert(key, id);
        id
    }

    /// Add an edge between two vertices
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, edge: FieldTypeEdge) -> EdgeId {
        self.graph.add_edge(from, to, edge)
    }

    /// Get a vertex by its ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.graph.node_weight(id)
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.graph.node_weight_mut(id)
    }

    /// Find a vertex by identity
    pub fn find(&self, key: &VertexKey) -> Option<VertexId> {
        self.index.get(key).copied()
    }

    /// Get an edge with its endpoints
    pub fn edge(&self, id: EdgeId) -> Option<(VertexId, VertexId, &FieldTypeEdge)> {
        let (source, target) = self.graph.edge_endpoints(id)?;
        Some((source, target, &self.graph[id]))
    }

    /// All vertices, in vertex-set order
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.graph
            .node_indices()
            .map(move |id| (id, &self.graph[id]))
    }

    /// All edges as `(id, source, target, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, VertexId, VertexId, &FieldTypeEdge)> {
        self.graph.edge_indices().filter_map(move |id| {
            let (source, target) = self.graph.edge_endpoints(id)?;
            Some((id, source, target, &self.graph[id]))
        })
    }

    /// Outgoing edges of a vertex as `(id, target, edge)`
    pub fn edges_from(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId, &FieldTypeEdge)> + '_ {
        self.graph
            .edges_directed(vertex, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target(), edge.weight()))
    }

    /// Incoming edges of a vertex as `(id, source, edge)`
    pub fn edges_to(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId, &FieldTypeEdge)> + '_ {
        self.graph
            .edges_directed(vertex, Direction::Incoming)
            .map(|edge| (edge.id(), edge.source(), edge.weight()))
    }

    /// Remove an edge, leaving its endpoints in place
    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<FieldTypeEdge> {
        self.graph.remove_edge(edge)
    }

    /// Remove a vertex and every edge touching it
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Option<Vertex> {
        let removed = self.graph.remove_node(vertex)?;
        self.index.remove(&removed.key());
        Some(removed)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get a query interface for path operations
    pub fn query(&self) -> GraphQuery<'_> {
        GraphQuery::new(self)
    }
}
