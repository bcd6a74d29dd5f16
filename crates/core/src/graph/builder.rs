//! Graph construction from a descriptor set
//!
//! One vertex is created per declared message, field, enum and oneof group.
//! Edges link each message to the fields it owns (through a oneof vertex for
//! grouped fields). Cross-message edges are added afterwards by the resolver,
//! once every vertex of the set exists.

use super::flatten;
use super::nodes::{DataType, EnumValue, FieldLabel, Vertex, VertexData, VertexKey, VertexKind};
use super::proto::{GraphOptions, ProtoGraph};
use super::resolver;
use super::root;
use super::{FieldTypeEdge, TypeGraph, VertexId};
use crate::descriptor::{
    self, native_type_name, qualify, scalar_keyword, ExtensionRegistry, SourceComments,
};
use crate::error::Result;
use crate::options::{decode_custom_options, extendee_of, RawOptions};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet,
};
use std::collections::{HashMap, HashSet};

/// Builds a [`ProtoGraph`] in distinct phases
///
/// `new` creates all vertices and resolves cross-references. The graph may
/// then be rewritten with [`GraphBuilder::flatten_wrappers`] before
/// [`GraphBuilder::finish`] selects the root and freezes it.
pub struct GraphBuilder<'a> {
    set: &'a FileDescriptorSet,
    graph: TypeGraph,

    /// Parent message full name → vertices it directly owns
    message_fields: HashMap<String, Vec<VertexId>>,

    /// Full names of synthesized map-entry messages
    map_entries: HashSet<String>,

    /// Extensions declared anywhere in the set
    registry: ExtensionRegistry,
}

/// Per-file state shared by every declaration in that file
struct FileContext<'f> {
    file: &'f FileDescriptorProto,
    comments: SourceComments,
    major_version: i32,
}

impl<'f> FileContext<'f> {
    fn new(file: &'f FileDescriptorProto) -> Self {
        Self {
            file,
            comments: SourceComments::from_file(file),
            major_version: descriptor::major_version(file),
        }
    }

    fn vertex(
        &self,
        full_name: String,
        parent: Option<&str>,
        path_type: String,
        data_type: DataType,
        data: VertexData,
        source_path: &[i32],
    ) -> Vertex {
        Vertex::new(
            full_name,
            self.file.name().to_string(),
            self.file.package().to_string(),
            parent.map(str::to_string),
            path_type,
            data_type,
            self.major_version,
            data,
        )
        .with_comment(self.comments.get(source_path))
    }
}

fn child_path(path: &[i32], field_number: i32, index: usize) -> Vec<i32> {
    let mut child = path.to_vec();
    child.push(field_number);
    child.push(index as i32);
    child
}

impl<'a> GraphBuilder<'a> {
    /// Create every vertex in `set` and resolve cross-message references
    pub fn new(set: &'a FileDescriptorSet) -> Self {
        let mut builder = Self {
            set,
            graph: TypeGraph::new(),
            message_fields: HashMap::new(),
            map_entries: HashSet::new(),
            registry: ExtensionRegistry::build(set),
        };

        for file in &set.file {
            for message in &file.message_type {
                builder.collect_map_entries(&qualify(file.package(), message.name()), message);
            }
        }

        for file in &set.file {
            builder.add_file(file);
        }
        tracing::debug!(
            vertices = builder.graph.vertex_count(),
            edges = builder.graph.edge_count(),
            "built schema vertices"
        );

        resolver::resolve_references(&mut builder.graph, &builder.message_fields);
        tracing::debug!(
            edges = builder.graph.edge_count(),
            "resolved cross-message references"
        );

        builder
    }

    /// Collapse well-known wrapper indirections; returns the number of
    /// changes applied
    pub fn flatten_wrappers(&mut self) -> usize {
        let patch = flatten::plan_wrapper_flattening(&self.graph);
        let changes = patch.len();
        tracing::debug!(
            remove_vertices = patch.removed_vertex_count(),
            remove_edges = patch.removed_edge_count(),
            "flattening wrapper types"
        );
        self.graph.apply(patch);
        changes
    }

    /// Decode custom options from `raw` onto their vertices; returns the
    /// number of vertices that received at least one option
    ///
    /// Run before flattening so replacement fields keep their options.
    pub fn attach_options(&mut self, raw: &RawOptions) -> Result<usize> {
        let mut attached = 0;
        for (key, bytes) in raw.iter() {
            let Some(id) = self.graph.find(key) else {
                continue;
            };
            let options = decode_custom_options(bytes, extendee_of(key.kind), &self.registry)?;
            if options.is_empty() {
                continue;
            }
            if let Some(vertex) = self.graph.vertex_mut(id) {
                vertex.set_options(options);
                attached += 1;
            }
        }

        tracing::debug!(attached, "attached custom options");
        Ok(attached)
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// The graph as built so far
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Select the root message and freeze the graph
    pub fn finish(self, options: &GraphOptions) -> Result<ProtoGraph> {
        let root = match options.message_name.as_deref() {
            Some(name) => root::find_message(&self.graph, name)?,
            None => {
                let target = root::target_file(self.set, options.filename.as_deref())?;
                root::autodetect_root(&self.graph, target.name())?
            }
        };

        ProtoGraph::from_parts(self.graph, root, self.registry)
    }

    fn collect_map_entries(&mut self, full_name: &str, message: &DescriptorProto) {
        if message.options.as_ref().and_then(|o| o.map_entry) == Some(true) {
            self.map_entries.insert(full_name.to_string());
        }
        for nested in &message.nested_type {
            self.collect_map_entries(&qualify(full_name, nested.name()), nested);
        }
    }

    fn add_file(&mut self, file: &FileDescriptorProto) {
        let ctx = FileContext::new(file);

        for (i, enum_proto) in file.enum_type.iter().enumerate() {
            self.add_enum(&ctx, None, enum_proto, &[descriptor::FILE_ENUM_TYPE, i as i32]);
        }

        for (i, message) in file.message_type.iter().enumerate() {
            self.add_message(&ctx, None, message, &[descriptor::FILE_MESSAGE_TYPE, i as i32]);
        }
    }

    fn add_message(
        &mut self,
        ctx: &FileContext<'_>,
        parent: Option<&str>,
        message: &DescriptorProto,
        path: &[i32],
    ) -> VertexId {
        let full_name = qualify(parent.unwrap_or(ctx.file.package()), message.name());

        let data = VertexData::Message {
            fields: message.field.iter().map(|f| f.name().to_string()).collect(),
            nested_messages: message
                .nested_type
                .iter()
                .map(|n| qualify(&full_name, n.name()))
                .collect(),
            nested_enums: message
                .enum_type
                .iter()
                .map(|e| qualify(&full_name, e.name()))
                .collect(),
            is_map_entry: self.map_entries.contains(&full_name),
        };
        let vertex = ctx.vertex(
            full_name.clone(),
            parent,
            format!("[type={}]", full_name.replace('.', "_")),
            DataType::Record,
            data,
            path,
        );
        let message_id = self.graph.add_vertex(vertex);

        // Nested declarations first so their fields are registered before
        // this message's fields are wired
        for (i, nested) in message.nested_type.iter().enumerate() {
            let nested_path = child_path(path, descriptor::MESSAGE_NESTED_TYPE, i);
            self.add_message(ctx, Some(&full_name), nested, &nested_path);
        }

        for (i, enum_proto) in message.enum_type.iter().enumerate() {
            let enum_path = child_path(path, descriptor::MESSAGE_ENUM_TYPE, i);
            self.add_enum(ctx, Some(&full_name), enum_proto, &enum_path);
        }

        let mut owned: Vec<VertexId> = Vec::new();
        for (i, field) in message.field.iter().enumerate() {
            let one_of = one_of_index(field).and_then(|idx| {
                message
                    .oneof_decl
                    .get(idx)
                    .map(|decl| (idx, decl.name().to_string()))
            });

            let field_path = child_path(path, descriptor::MESSAGE_FIELD, i);
            let field_vertex = self.field_vertex(
                ctx,
                &full_name,
                field,
                one_of.as_ref().map(|(_, name)| name.clone()),
                &field_path,
            );
            let edge = FieldTypeEdge::new(field_vertex.path_type(), field_vertex.is_message_type());
            let field_id = self.graph.add_vertex(field_vertex);

            match one_of {
                Some((idx, name)) => {
                    let one_of_path = child_path(path, descriptor::MESSAGE_ONEOF_DECL, idx);
                    let one_of_id =
                        self.add_one_of(ctx, message_id, &full_name, &name, field.name(), &one_of_path);
                    self.graph.add_edge(one_of_id, field_id, edge);
                    if !owned.contains(&one_of_id) {
                        owned.push(one_of_id);
                    }
                }
                None => {
                    self.graph.add_edge(message_id, field_id, edge);
                    owned.push(field_id);
                }
            }
        }

        self.message_fields.insert(full_name, owned);
        message_id
    }

    /// Get or create the vertex for a oneof group and record a member
    fn add_one_of(
        &mut self,
        ctx: &FileContext<'_>,
        message_id: VertexId,
        message_name: &str,
        one_of_name: &str,
        member: &str,
        path: &[i32],
    ) -> VertexId {
        let full_name = qualify(message_name, one_of_name);
        let key = VertexKey::new(VertexKind::OneOf, &full_name);

        let one_of_id = match self.graph.find(&key) {
            Some(id) => id,
            None => {
                let vertex = ctx.vertex(
                    full_name,
                    Some(message_name),
                    "[type=union]".to_string(),
                    DataType::Union,
                    VertexData::OneOf { fields: Vec::new() },
                    path,
                );
                let edge = FieldTypeEdge::new(vertex.path_type(), false);
                let id = self.graph.add_vertex(vertex);
                self.graph.add_edge(message_id, id, edge);
                id
            }
        };

        if let Some(VertexData::OneOf { fields }) =
            self.graph.vertex_mut(one_of_id).map(Vertex::data_mut)
        {
            fields.push(member.to_string());
        }
        one_of_id
    }

    fn field_vertex(
        &self,
        ctx: &FileContext<'_>,
        message_name: &str,
        field: &FieldDescriptorProto,
        one_of: Option<String>,
        path: &[i32],
    ) -> Vertex {
        let ty = field.r#type();
        let is_message_type = matches!(ty, Type::Message | Type::Group);
        let native_type = if matches!(ty, Type::Message | Type::Group | Type::Enum) {
            native_type_name(field.type_name()).to_string()
        } else {
            scalar_keyword(ty).to_string()
        };

        let label = match field.label() {
            Label::Optional => FieldLabel::Optional,
            Label::Required => FieldLabel::Required,
            Label::Repeated => FieldLabel::Repeated,
        };
        let is_map = label == FieldLabel::Repeated
            && is_message_type
            && self.map_entries.contains(&native_type);

        let base = match ty {
            Type::Double => "double".to_string(),
            Type::Float => "float".to_string(),
            Type::Int64 | Type::Uint64 | Type::Fixed64 | Type::Sfixed64 | Type::Sint64 => {
                "long".to_string()
            }
            Type::Int32 | Type::Uint32 | Type::Fixed32 | Type::Sfixed32 | Type::Sint32 => {
                "int".to_string()
            }
            Type::Bool => "boolean".to_string(),
            Type::String => "string".to_string(),
            Type::Bytes => "bytes".to_string(),
            Type::Enum => "enum".to_string(),
            Type::Message | Type::Group => native_type.replace('.', "_"),
        };

        let (path_type, data_type) = if is_map {
            (format!("[type=map].[type={}]", base), DataType::Map)
        } else if label == FieldLabel::Repeated {
            (format!("[type=array].[type={}]", base), DataType::Array)
        } else {
            (format!("[type={}]", base), scalar_data_type(ty))
        };

        let data = VertexData::Field {
            number: field.number(),
            label,
            native_type,
            is_message_type,
            one_of,
            json_name: field.json_name.clone(),
        };

        ctx.vertex(
            qualify(message_name, field.name()),
            Some(message_name),
            path_type,
            data_type,
            data,
            path,
        )
    }

    fn add_enum(
        &mut self,
        ctx: &FileContext<'_>,
        parent: Option<&str>,
        enum_proto: &EnumDescriptorProto,
        path: &[i32],
    ) -> VertexId {
        let full_name = qualify(parent.unwrap_or(ctx.file.package()), enum_proto.name());
        let values = enum_proto
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name().to_string(),
                number: v.number(),
            })
            .collect();

        let vertex = ctx.vertex(
            full_name,
            parent,
            "[type=enum]".to_string(),
            DataType::Enum,
            VertexData::Enum { values },
            path,
        );
        self.graph.add_vertex(vertex)
    }
}

/// Oneof group of a field; proto3 `optional` synthetic groups are ignored
fn one_of_index(field: &FieldDescriptorProto) -> Option<usize> {
    if field.proto3_optional() {
        return None;
    }
    field.oneof_index.map(|idx| idx as usize)
}

fn scalar_data_type(ty: Type) -> DataType {
    match ty {
        Type::Bool => DataType::Boolean,
        Type::String => DataType::String,
        Type::Bytes => DataType::Bytes,
        Type::Enum => DataType::Enum,
        Type::Message | Type::Group => DataType::Record,
        _ => DataType::Number,
    }
}
