//! Edge types for the schema graph

use serde::{Deserialize, Serialize};

/// A directed edge between two schema vertices
///
/// The graph is a multigraph: parallel edges between the same pair of
/// vertices are legal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FieldTypeEdge {
    /// Whether this edge navigates a field path or records a declared type
    kind: EdgeKind,

    /// Field-path type tag mirroring the target's
    edge_type: String,

    /// Edge crosses into another message's subgraph
    is_message_type: bool,
}

impl FieldTypeEdge {
    /// A field-path edge: containment, oneof membership or cross-reference
    pub fn new(edge_type: impl Into<String>, is_message_type: bool) -> Self {
        Self {
            kind: EdgeKind::Field,
            edge_type: edge_type.into(),
            is_message_type,
        }
    }

    /// An edge from a field to the message or enum it is declared as
    pub fn type_ref(edge_type: impl Into<String>, is_message_type: bool) -> Self {
        Self {
            kind: EdgeKind::TypeRef,
            edge_type: edge_type.into(),
            is_message_type,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn is_message_type(&self) -> bool {
        self.is_message_type
    }
}

/// The kind of relationship an edge represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// A step along a field path (message → field, oneof → member,
    /// message-typed field → fields of the referenced message)
    Field,
    /// A field's declared type (field → message or enum)
    TypeRef,
}
