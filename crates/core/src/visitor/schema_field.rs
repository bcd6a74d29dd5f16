//! Flattened schema-field records, one per field path from the root

use super::{ModelVisitor, VisitContext};
use crate::graph::{DataType, FieldLabel, Vertex, VertexData, VertexId};
use crate::options::CustomOption;
use serde::{Deserialize, Serialize};

/// One field of the root message's flattened schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub field_path: String,
    pub native_type: String,
    pub data_type: DataType,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CustomOption>,
}

/// Emits a [`SchemaField`] for every path from the root to a field or oneof
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaFieldVisitor;

impl SchemaFieldVisitor {
    pub fn new() -> Self {
        Self
    }

    fn records(
        &self,
        id: VertexId,
        vertex: &Vertex,
        native_type: &str,
        nullable: bool,
        ctx: &VisitContext<'_>,
    ) -> Vec<SchemaField> {
        ctx.field_paths(id)
            .into_iter()
            .map(|field_path| SchemaField {
                field_path,
                native_type: native_type.to_string(),
                data_type: vertex.data_type(),
                nullable,
                description: vertex.comment().to_string(),
                options: vertex.options().to_vec(),
            })
            .collect()
    }
}

impl ModelVisitor for SchemaFieldVisitor {
    type Output = SchemaField;

    fn visit_field(&self, id: VertexId, field: &Vertex, ctx: &VisitContext<'_>) -> Vec<SchemaField> {
        let nullable = !matches!(
            field.data(),
            VertexData::Field {
                label: FieldLabel::Required,
                ..
            }
        );
        self.records(id, field, field.native_type().unwrap_or_default(), nullable, ctx)
    }

    fn visit_one_of(
        &self,
        id: VertexId,
        one_of: &Vertex,
        ctx: &VisitContext<'_>,
    ) -> Vec<SchemaField> {
        self.records(id, one_of, "oneof", true, ctx)
    }
}
