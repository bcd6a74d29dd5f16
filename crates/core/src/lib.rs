//! Protograph Core - Schema Graph Engine
//!
//! This crate turns a protobuf descriptor set into a typed, navigable graph:
//! - One vertex per message, field, oneof group and enum
//! - Cross-message references resolved into field-to-field edges
//! - Well-known wrapper types flattened into plain scalars
//! - Custom option values decoded onto the declarations that set them
//! - Root-message detection, path enumeration and visitor dispatch

pub mod config;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod options;
pub mod visitor;

pub use config::ProtographConfig;
pub use descriptor::{decode_descriptor_set, Extension, ExtensionRegistry, WRAPPERS_FILE};
pub use error::{GraphError, Result};
pub use graph::{
    DataType, EdgeKind, FieldTypeEdge, GraphBuilder, GraphOptions, GraphPath, ProtoGraph, Vertex,
    VertexData, VertexId, VertexKey, VertexKind,
};
pub use options::{CustomOption, OptionValue, RawOptions};
pub use visitor::{ModelVisitor, SchemaField, SchemaFieldVisitor, VisitContext};

/// Protograph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
