//! Visitor dispatch over a built schema graph
//!
//! Visitors turn the graph into whatever a consumer needs (documentation,
//! lineage, catalog records). Dispatch visits the whole graph once per
//! visitor, then every vertex once per visitor, in vertex-set order.

pub mod schema_field;

pub use schema_field::{SchemaField, SchemaFieldVisitor};

use crate::graph::{GraphPath, ProtoGraph, Vertex, VertexId, VertexKind};

/// Version prefix of every rendered field path
pub const FIELD_PATH_VERSION: &str = "[version=2.0]";

/// A consumer of the schema graph
///
/// Every method defaults to producing nothing, so visitors implement only
/// the element kinds they care about.
pub trait ModelVisitor {
    type Output;

    /// Called once per dispatch, before any vertex
    fn visit_graph(&self, _ctx: &VisitContext<'_>) -> Vec<Self::Output> {
        Vec::new()
    }

    fn visit_message(
        &self,
        _id: VertexId,
        _message: &Vertex,
        _ctx: &VisitContext<'_>,
    ) -> Vec<Self::Output> {
        Vec::new()
    }

    fn visit_field(
        &self,
        _id: VertexId,
        _field: &Vertex,
        _ctx: &VisitContext<'_>,
    ) -> Vec<Self::Output> {
        Vec::new()
    }

    fn visit_one_of(
        &self,
        _id: VertexId,
        _one_of: &Vertex,
        _ctx: &VisitContext<'_>,
    ) -> Vec<Self::Output> {
        Vec::new()
    }

    fn visit_enum(
        &self,
        _id: VertexId,
        _enum_vertex: &Vertex,
        _ctx: &VisitContext<'_>,
    ) -> Vec<Self::Output> {
        Vec::new()
    }
}

impl Vertex {
    /// Dispatch this vertex to the visitor method matching its kind
    pub fn accept<T>(
        &self,
        id: VertexId,
        visitor: &dyn ModelVisitor<Output = T>,
        ctx: &VisitContext<'_>,
    ) -> Vec<T> {
        match self.kind() {
            VertexKind::Message => visitor.visit_message(id, self, ctx),
            VertexKind::Field => visitor.visit_field(id, self, ctx),
            VertexKind::OneOf => visitor.visit_one_of(id, self, ctx),
            VertexKind::Enum => visitor.visit_enum(id, self, ctx),
        }
    }
}

/// What a visitor sees besides the element itself
#[derive(Debug, Clone)]
pub struct VisitContext<'a> {
    graph: &'a ProtoGraph,
    dataset_name: Option<String>,
}

impl<'a> VisitContext<'a> {
    pub fn new(graph: &'a ProtoGraph) -> Self {
        Self {
            graph,
            dataset_name: None,
        }
    }

    /// Name of the dataset the visited schema describes
    pub fn with_dataset_name(mut self, dataset_name: impl Into<String>) -> Self {
        self.dataset_name = Some(dataset_name.into());
        self
    }

    pub fn graph(&self) -> &'a ProtoGraph {
        self.graph
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn root(&self) -> &'a Vertex {
        self.graph.root()
    }

    /// Render a path from the root as a versioned field path
    ///
    /// `[version=2.0].[type=acme_Order].[type=string].id`
    pub fn field_path(&self, path: &GraphPath) -> String {
        let mut parts = vec![
            FIELD_PATH_VERSION.to_string(),
            self.root().path_type().to_string(),
        ];

        for &edge_id in &path.edges {
            if let Some((_, target, edge)) = self.graph.edge(edge_id) {
                parts.push(edge.edge_type().to_string());
                if let Some(vertex) = self.graph.vertex(target) {
                    parts.push(vertex.name().to_string());
                }
            }
        }

        parts.join(".")
    }

    /// Every field path from the root to `vertex`
    pub fn field_paths(&self, vertex: VertexId) -> Vec<String> {
        self.graph
            .query()
            .field_paths(self.graph.root_id(), vertex)
            .iter()
            .map(|path| self.field_path(path))
            .collect()
    }

    /// Run every visitor over the graph
    ///
    /// Whole-graph visits come first, then each vertex is handed to all
    /// visitors before moving on to the next vertex.
    pub fn accept<T>(&self, visitors: &[&dyn ModelVisitor<Output = T>]) -> Vec<T> {
        let mut results: Vec<T> = visitors
            .iter()
            .flat_map(|visitor| visitor.visit_graph(self))
            .collect();

        for (id, vertex) in self.graph.vertices() {
            for visitor in visitors {
                results.extend(vertex.accept(id, *visitor, self));
            }
        }

        results
    }
}

impl ProtoGraph {
    /// Run every visitor over this graph with a default context
    pub fn accept<T>(&self, visitors: &[&dyn ModelVisitor<Output = T>]) -> Vec<T> {
        VisitContext::new(self).accept(visitors)
    }
}
