//! Vertex types for the schema graph

use crate::options::{CustomOption, OptionValue};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A vertex in the schema graph: a message, field, oneof group or enum
///
/// Identity is `(full_name, kind)`; two vertices with the same qualified name
/// and kind compare equal regardless of their other attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Fully-qualified name, e.g. `acme.orders.Order.note`
    full_name: String,

    /// Simple (last segment) name
    name: String,

    /// Schema file this element was declared in
    file: String,

    /// Package of the declaring file
    package: String,

    /// Full name of the enclosing message, if any
    parent: Option<String>,

    /// Field-path type tag, e.g. `[type=string]` or `[type=array].[type=int]`
    path_type: String,

    /// Schema data type consumers render this element as
    data_type: DataType,

    /// Leading comment from the source file, empty if none
    comment: String,

    /// Major version implied by the declaring file
    major_version: i32,

    /// Custom options set on the declaration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<CustomOption>,

    /// Variant-specific payload
    data: VertexData,
}

impl Vertex {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        full_name: String,
        file: String,
        package: String,
        parent: Option<String>,
        path_type: String,
        data_type: DataType,
        major_version: i32,
        data: VertexData,
    ) -> Self {
        let name = full_name
            .rsplit('.')
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();
        Self {
            full_name,
            name,
            file,
            package,
            parent,
            path_type,
            data_type,
            comment: String::new(),
            major_version,
            options: Vec::new(),
            data,
        }
    }

    pub fn with_comment(mut self, comment: String) -> Self {
        self.comment = comment;
        self
    }

    /// Copy of this field typed as the scalar `primitive`
    ///
    /// Used when a wrapper-typed field is collapsed onto the wrapped scalar.
    /// The path and data types come from the primitive; the declared native
    /// type (e.g. `google.protobuf.StringValue`) is kept.
    pub fn with_primitive_type(&self, primitive: &Vertex) -> Self {
        let mut replacement = self.clone();
        replacement.path_type = primitive.path_type.clone();
        replacement.data_type = primitive.data_type;
        if let VertexData::Field {
            is_message_type, ..
        } = &mut replacement.data
        {
            *is_message_type = false;
        }
        replacement
    }

    pub fn key(&self) -> VertexKey {
        VertexKey::new(self.kind(), &self.full_name)
    }

    pub fn kind(&self) -> VertexKind {
        match self.data {
            VertexData::Message { .. } => VertexKind::Message,
            VertexData::Field { .. } => VertexKind::Field,
            VertexData::OneOf { .. } => VertexKind::OneOf,
            VertexData::Enum { .. } => VertexKind::Enum,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn path_type(&self) -> &str {
        &self.path_type
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn major_version(&self) -> i32 {
        self.major_version
    }

    /// Custom options decoded against the extension registry
    pub fn options(&self) -> &[CustomOption] {
        &self.options
    }

    /// First value of the custom option named `name`
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    }

    pub(crate) fn set_options(&mut self, options: Vec<CustomOption>) {
        self.options = options;
    }

    pub fn data(&self) -> &VertexData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut VertexData {
        &mut self.data
    }

    /// Whether this is a field whose declared type is a message
    pub fn is_message_type(&self) -> bool {
        matches!(
            self.data,
            VertexData::Field {
                is_message_type: true,
                ..
            }
        )
    }

    /// Declared type of a field, `None` for other vertex kinds
    pub fn native_type(&self) -> Option<&str> {
        match &self.data {
            VertexData::Field { native_type, .. } => Some(native_type),
            _ => None,
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.full_name == other.full_name
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Identity of a vertex, usable as a lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexKey {
    pub kind: VertexKind,
    pub full_name: String,
}

impl VertexKey {
    pub fn new(kind: VertexKind, full_name: &str) -> Self {
        Self {
            kind,
            full_name: full_name.to_string(),
        }
    }

    pub fn message(full_name: &str) -> Self {
        Self::new(VertexKind::Message, full_name)
    }

    pub fn field(full_name: &str) -> Self {
        Self::new(VertexKind::Field, full_name)
    }
}

/// The kind of schema element a vertex represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexKind {
    Message,
    Field,
    /// A synthetic vertex grouping the members of a `oneof`
    OneOf,
    Enum,
}

/// Schema data type of an element, as consumers model it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Bytes,
    Number,
    String,
    Enum,
    Record,
    Array,
    Map,
    Union,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Bytes => "bytes",
            DataType::Number => "number",
            DataType::String => "string",
            DataType::Enum => "enum",
            DataType::Record => "record",
            DataType::Array => "array",
            DataType::Map => "map",
            DataType::Union => "union",
        };
        write!(f, "{}", name)
    }
}

/// Field cardinality
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    Optional,
    Required,
    Repeated,
}

/// Additional data specific to each vertex kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VertexData {
    Message {
        /// Names of the fields declared directly in this message
        fields: Vec<String>,
        /// Full names of nested message declarations
        nested_messages: Vec<String>,
        /// Full names of nested enum declarations
        nested_enums: Vec<String>,
        /// Synthesized `map<K, V>` entry message
        is_map_entry: bool,
    },
    Field {
        number: i32,
        label: FieldLabel,
        /// Scalar keyword or fully-qualified referenced type name
        native_type: String,
        is_message_type: bool,
        /// Name of the oneof group this field belongs to
        one_of: Option<String>,
        json_name: Option<String>,
    },
    OneOf {
        /// Names of the member fields
        fields: Vec<String>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
}

/// A declared enum value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}
