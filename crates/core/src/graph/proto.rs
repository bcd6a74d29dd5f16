//! The frozen schema graph handed to queries and visitors

use super::builder::GraphBuilder;
use super::nodes::{Vertex, VertexKey, VertexKind};
use super::query::{GraphPath, GraphQuery};
use super::{EdgeId, FieldTypeEdge, TypeGraph, VertexId};
use crate::descriptor::{decode_descriptor_set, ExtensionRegistry};
use crate::error::{GraphError, Result};
use crate::options::RawOptions;
use prost_types::FileDescriptorSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Inputs that steer graph construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Fully-qualified root message; auto-detected when `None`
    pub message_name: Option<String>,

    /// File to auto-detect the root in, matched as a suffix of this path;
    /// the last file of the set when `None` or unmatched
    pub filename: Option<String>,

    /// Collapse well-known wrapper types into plain scalars
    pub flatten_wrappers: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            message_name: None,
            filename: None,
            flatten_wrappers: true,
        }
    }
}

impl GraphOptions {
    /// Options selecting `message_name` as the root
    pub fn with_root(message_name: impl Into<String>) -> Self {
        Self {
            message_name: Some(message_name.into()),
            ..Self::default()
        }
    }
}

/// Typed, navigable graph of a descriptor set, anchored at a root message
///
/// Read-only once built; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ProtoGraph {
    graph: TypeGraph,
    root_id: VertexId,
    root: Vertex,
    registry: ExtensionRegistry,
}

impl ProtoGraph {
    /// Decode serialized descriptor-set bytes and build the graph
    ///
    /// Custom options are decoded from the same bytes and attached to the
    /// vertices of the declarations that set them.
    pub fn from_bytes(bytes: &[u8], options: &GraphOptions) -> Result<Self> {
        let set = decode_descriptor_set(bytes)?;
        let raw = RawOptions::decode(bytes)?;

        let mut builder = GraphBuilder::new(&set);
        builder.attach_options(&raw)?;
        Self::build(builder, options)
    }

    /// Build, resolve, optionally flatten, and select the root
    ///
    /// An already-decoded set has lost its custom option values, so vertices
    /// built this way carry no options; use [`ProtoGraph::from_bytes`] to
    /// keep them.
    pub fn new(set: &FileDescriptorSet, options: &GraphOptions) -> Result<Self> {
        Self::build(GraphBuilder::new(set), options)
    }

    fn build(mut builder: GraphBuilder<'_>, options: &GraphOptions) -> Result<Self> {
        if options.flatten_wrappers {
            builder.flatten_wrappers();
        }
        builder.finish(options)
    }

    pub(crate) fn from_parts(
        graph: TypeGraph,
        root_id: VertexId,
        registry: ExtensionRegistry,
    ) -> Result<Self> {
        let root = graph
            .vertex(root_id)
            .cloned()
            .ok_or_else(|| GraphError::NotFound(format!("root vertex {}", root_id.index())))?;

        tracing::debug!(
            root = %root.full_name(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "schema graph ready"
        );

        Ok(Self {
            graph,
            root_id,
            root,
            registry,
        })
    }

    /// The root message vertex
    pub fn root(&self) -> &Vertex {
        &self.root
    }

    pub fn root_id(&self) -> VertexId {
        self.root_id
    }

    /// Fully-qualified name of the root message
    pub fn full_name(&self) -> &str {
        self.root.full_name()
    }

    /// Major version of the root message's file
    pub fn major_version(&self) -> i32 {
        self.root.major_version()
    }

    /// Documentation comment of the root message
    pub fn comment(&self) -> &str {
        self.root.comment()
    }

    /// Extensions declared in the descriptor set
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.graph.vertex(id)
    }

    pub fn find(&self, key: &VertexKey) -> Option<VertexId> {
        self.graph.find(key)
    }

    /// Look up a message vertex by fully-qualified name
    pub fn find_message(&self, message_name: &str) -> Result<VertexId> {
        super::root::find_message(&self.graph, message_name)
    }

    /// Find a vertex by full name, preferring a message over other kinds
    pub fn find_by_name(&self, full_name: &str) -> Option<VertexId> {
        [
            VertexKind::Message,
            VertexKind::Field,
            VertexKind::OneOf,
            VertexKind::Enum,
        ]
        .into_iter()
        .find_map(|kind| self.graph.find(&VertexKey::new(kind, full_name)))
    }

    /// All vertices, in vertex-set order
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.graph.vertices()
    }

    pub fn edge(&self, id: EdgeId) -> Option<(VertexId, VertexId, &FieldTypeEdge)> {
        self.graph.edge(id)
    }

    pub fn edges_from(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId, &FieldTypeEdge)> + '_ {
        self.graph.edges_from(vertex)
    }

    pub fn edges_to(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId, &FieldTypeEdge)> + '_ {
        self.graph.edges_to(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All simple directed paths between two vertices
    pub fn all_paths(&self, from: VertexId, to: VertexId) -> Vec<GraphPath> {
        self.query().all_paths(from, to)
    }

    pub fn query(&self) -> GraphQuery<'_> {
        self.graph.query()
    }

    /// The underlying vertex and edge store
    pub fn type_graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Stable hex digest of the graph's structure and root
    ///
    /// Independent of vertex ids and insertion order, so equal graphs built
    /// in separate runs hash the same.
    pub fn identity_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for line in self.canonical_form() {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Sorted textual rendering of vertices, edges and root
    fn canonical_form(&self) -> Vec<String> {
        let key_of = |id: VertexId| {
            self.graph
                .vertex(id)
                .map(|v| format!("{:?}:{}", v.kind(), v.full_name()))
                .unwrap_or_default()
        };

        let mut vertices: Vec<String> = self
            .graph
            .vertices()
            .map(|(_, v)| format!("V|{}", serde_json::to_string(v).unwrap_or_default()))
            .collect();
        vertices.sort();

        let mut edges: Vec<String> = self
            .graph
            .edges()
            .map(|(_, source, target, edge)| {
                format!(
                    "E|{}|{}|{:?}|{}|{}",
                    key_of(source),
                    key_of(target),
                    edge.kind(),
                    edge.edge_type(),
                    edge.is_message_type()
                )
            })
            .collect();
        edges.sort();

        let mut lines = vertices;
        lines.extend(edges);
        lines.push(format!("R|{}", key_of(self.root_id)));
        lines
    }
}

impl PartialEq for ProtoGraph {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_form() == other.canonical_form()
    }
}
