//! Descriptor-set decoding and the lookups derived from it
//!
//! Raw bytes are decoded with `prost-types`. Everything else in this module
//! reads the decoded [`FileDescriptorSet`]: the extension registry, source
//! comments and the major version implied by a file's package.

use crate::error::Result;
use prost::Message;
use prost_types::{FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Schema file that declares the well-known wrapper messages
pub const WRAPPERS_FILE: &str = "google/protobuf/wrappers.proto";

// Field numbers inside descriptor.proto, used to address SourceCodeInfo paths
pub(crate) const FILE_MESSAGE_TYPE: i32 = 4;
pub(crate) const FILE_ENUM_TYPE: i32 = 5;
pub(crate) const MESSAGE_FIELD: i32 = 2;
pub(crate) const MESSAGE_NESTED_TYPE: i32 = 3;
pub(crate) const MESSAGE_ENUM_TYPE: i32 = 4;
pub(crate) const MESSAGE_ONEOF_DECL: i32 = 8;

/// Decode a serialized `google.protobuf.FileDescriptorSet`
pub fn decode_descriptor_set(bytes: &[u8]) -> Result<FileDescriptorSet> {
    let set = FileDescriptorSet::decode(bytes)?;
    tracing::debug!(files = set.file.len(), "decoded descriptor set");
    Ok(set)
}

/// Strip the leading `.` protoc puts on fully-qualified type references
pub fn native_type_name(type_name: &str) -> &str {
    type_name.strip_prefix('.').unwrap_or(type_name)
}

/// Join a scope (package or parent message) and a simple name
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// A custom option declared with `extend`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Fully-qualified extension name, e.g. `acme.meta.classification`
    pub full_name: String,
    /// Options message being extended, e.g. `google.protobuf.FieldOptions`
    pub extendee: String,
    pub number: i32,
    /// Declared type: a scalar keyword or a fully-qualified message/enum name
    pub type_name: String,
    /// Wire-level kind: a scalar keyword, `enum` or `message`
    pub value_type: String,
    /// File the extension was declared in
    pub file: String,
}

/// Lookup of every extension declared in a descriptor set
///
/// Built once per set and shared read-only with callers that want to make
/// sense of custom options on graph elements.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    by_number: HashMap<(String, i32), Extension>,
    by_name: HashMap<String, (String, i32)>,
}

impl ExtensionRegistry {
    /// Collect file-scoped and message-scoped extensions from all files
    pub fn build(set: &FileDescriptorSet) -> Self {
        let mut registry = Self::default();

        for file in &set.file {
            for ext in &file.extension {
                registry.insert(file, file.package(), ext);
            }
            for message in &file.message_type {
                registry.collect_message(file, &qualify(file.package(), message.name()), message);
            }
        }

        tracing::debug!(extensions = registry.len(), "built extension registry");
        registry
    }

    fn collect_message(
        &mut self,
        file: &FileDescriptorProto,
        scope: &str,
        message: &prost_types::DescriptorProto,
    ) {
        for ext in &message.extension {
            self.insert(file, scope, ext);
        }
        for nested in &message.nested_type {
            self.collect_message(file, &qualify(scope, nested.name()), nested);
        }
    }

    fn insert(&mut self, file: &FileDescriptorProto, scope: &str, ext: &FieldDescriptorProto) {
        let type_name = if ext.type_name.is_some() {
            native_type_name(ext.type_name()).to_string()
        } else {
            scalar_keyword(ext.r#type()).to_string()
        };

        let extension = Extension {
            full_name: qualify(scope, ext.name()),
            extendee: native_type_name(ext.extendee()).to_string(),
            number: ext.number(),
            type_name,
            value_type: scalar_keyword(ext.r#type()).to_string(),
            file: file.name().to_string(),
        };

        let key = (extension.extendee.clone(), extension.number);
        self.by_name.insert(extension.full_name.clone(), key.clone());
        self.by_number.insert(key, extension);
    }

    /// Find the extension registered on `extendee` under field `number`
    pub fn find_by_number(&self, extendee: &str, number: i32) -> Option<&Extension> {
        self.by_number.get(&(extendee.to_string(), number))
    }

    /// Find an extension by its fully-qualified name
    pub fn find_by_name(&self, full_name: &str) -> Option<&Extension> {
        self.by_name
            .get(full_name)
            .and_then(|key| self.by_number.get(key))
    }

    /// All extensions declared on the given options message
    pub fn extensions_of<'a>(&'a self, extendee: &'a str) -> impl Iterator<Item = &'a Extension> {
        self.by_number.values().filter(move |ext| ext.extendee == extendee)
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}

/// The `.proto` keyword of a scalar field type
pub fn scalar_keyword(ty: prost_types::field_descriptor_proto::Type) -> &'static str {
    use prost_types::field_descriptor_proto::Type;

    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// Comments attached to declarations of one file, keyed by SourceCodeInfo path
#[derive(Debug, Default)]
pub struct SourceComments {
    by_path: HashMap<Vec<i32>, String>,
}

impl SourceComments {
    pub fn from_file(file: &FileDescriptorProto) -> Self {
        let by_path = file
            .source_code_info
            .iter()
            .flat_map(|info| info.location.iter())
            .filter_map(|location| {
                let comment = location
                    .leading_comments
                    .as_deref()
                    .or(location.trailing_comments.as_deref())?
                    .trim();
                if comment.is_empty() {
                    None
                } else {
                    Some((location.path.clone(), comment.to_string()))
                }
            })
            .collect();

        Self { by_path }
    }

    /// Comment for the declaration at `path`, or an empty string
    pub fn get(&self, path: &[i32]) -> String {
        self.by_path.get(path).cloned().unwrap_or_default()
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v(\d+)$").expect("static regex"))
}

/// Major version implied by a file, e.g. `acme.orders.v2` → 2
///
/// Package segments are checked last-to-first, then directory components of
/// the file name. Files without a `v<N>` segment are version 1.
pub fn major_version(file: &FileDescriptorProto) -> i32 {
    let package_segments = file.package().rsplit('.');
    let path_segments = file.name().rsplit('/').skip(1);

    package_segments
        .chain(path_segments)
        .find_map(|segment| {
            version_pattern()
                .captures(segment)
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(1)
}
