//! Error types for graph construction

use thiserror::Error;

/// Failures that abort graph construction
///
/// Construction is all-or-nothing: any of these means no graph was produced.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Cannot find protobuf message {0}")]
    NotFound(String),

    #[error("Cannot autodetect root message: {0}")]
    AmbiguousOrMissingRoot(String),

    #[error("Malformed descriptor set: {0}")]
    MalformedInput(#[from] prost::DecodeError),

    #[error("Malformed custom options: {0}")]
    MalformedOptions(String),

    #[error("Descriptor set contains no files")]
    EmptyDescriptorSet,
}

pub type Result<T> = std::result::Result<T, GraphError>;
