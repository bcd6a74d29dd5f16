//! Custom option values on schema declarations
//!
//! Custom options are extension fields of the `*Options` messages, which
//! `prost-types` drops as unknown fields. The option bytes are read a second
//! time from the encoded descriptor set through a slim mirror of
//! `descriptor.proto` that leaves every `options` submessage undecoded, then
//! decoded field by field against the [`ExtensionRegistry`].

use crate::descriptor::{qualify, Extension, ExtensionRegistry};
use crate::error::{GraphError, Result};
use crate::graph::{VertexKey, VertexKind};
use prost::bytes::Buf;
use prost::encoding::{decode_key, decode_varint, WireType};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MESSAGE_OPTIONS: &str = "google.protobuf.MessageOptions";
pub const FIELD_OPTIONS: &str = "google.protobuf.FieldOptions";
pub const ONEOF_OPTIONS: &str = "google.protobuf.OneofOptions";
pub const ENUM_OPTIONS: &str = "google.protobuf.EnumOptions";

/// Options message extended by custom options on a vertex of `kind`
pub fn extendee_of(kind: VertexKind) -> &'static str {
    match kind {
        VertexKind::Message => MESSAGE_OPTIONS,
        VertexKind::Field => FIELD_OPTIONS,
        VertexKind::OneOf => ONEOF_OPTIONS,
        VertexKind::Enum => ENUM_OPTIONS,
    }
}

// Field numbers follow descriptor.proto; everything else is skipped.

#[derive(Clone, PartialEq, Message)]
struct OptionsSet {
    #[prost(message, repeated, tag = "1")]
    file: Vec<OptionsFile>,
}

#[derive(Clone, PartialEq, Message)]
struct OptionsFile {
    #[prost(string, optional, tag = "2")]
    package: Option<String>,
    #[prost(message, repeated, tag = "4")]
    message_type: Vec<OptionsMessage>,
    #[prost(message, repeated, tag = "5")]
    enum_type: Vec<OptionsEnum>,
}

#[derive(Clone, PartialEq, Message)]
struct OptionsMessage {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    field: Vec<OptionsDeclaration>,
    #[prost(message, repeated, tag = "3")]
    nested_type: Vec<OptionsMessage>,
    #[prost(message, repeated, tag = "4")]
    enum_type: Vec<OptionsEnum>,
    #[prost(bytes = "vec", optional, tag = "7")]
    options: Option<Vec<u8>>,
    #[prost(message, repeated, tag = "8")]
    oneof_decl: Vec<OptionsOneof>,
}

/// A field declaration; only its name and options are kept
#[derive(Clone, PartialEq, Message)]
struct OptionsDeclaration {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(bytes = "vec", optional, tag = "8")]
    options: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct OptionsEnum {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(bytes = "vec", optional, tag = "3")]
    options: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct OptionsOneof {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(bytes = "vec", optional, tag = "2")]
    options: Option<Vec<u8>>,
}

/// Still-encoded `*Options` bytes of every declaration that has any
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    by_element: HashMap<VertexKey, Vec<u8>>,
}

impl RawOptions {
    /// Read option bytes out of a serialized `FileDescriptorSet`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let set = OptionsSet::decode(bytes)?;
        let mut raw = Self::default();

        for file in &set.file {
            let package = file.package.as_deref().unwrap_or_default();
            for enum_proto in &file.enum_type {
                raw.insert(VertexKind::Enum, package, &enum_proto.name, &enum_proto.options);
            }
            for message in &file.message_type {
                raw.collect_message(package, message);
            }
        }

        tracing::debug!(elements = raw.len(), "read raw custom options");
        Ok(raw)
    }

    fn collect_message(&mut self, scope: &str, message: &OptionsMessage) {
        let full_name = qualify(scope, message.name.as_deref().unwrap_or_default());
        self.insert(VertexKind::Message, scope, &message.name, &message.options);

        for field in &message.field {
            self.insert(VertexKind::Field, &full_name, &field.name, &field.options);
        }
        for one_of in &message.oneof_decl {
            self.insert(VertexKind::OneOf, &full_name, &one_of.name, &one_of.options);
        }
        for enum_proto in &message.enum_type {
            self.insert(VertexKind::Enum, &full_name, &enum_proto.name, &enum_proto.options);
        }
        for nested in &message.nested_type {
            self.collect_message(&full_name, nested);
        }
    }

    fn insert(
        &mut self,
        kind: VertexKind,
        scope: &str,
        name: &Option<String>,
        options: &Option<Vec<u8>>,
    ) {
        if let Some(bytes) = options.as_ref().filter(|bytes| !bytes.is_empty()) {
            let full_name = qualify(scope, name.as_deref().unwrap_or_default());
            self.by_element
                .insert(VertexKey::new(kind, &full_name), bytes.clone());
        }
    }

    /// Encoded options of one declaration
    pub fn get(&self, key: &VertexKey) -> Option<&[u8]> {
        self.by_element.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexKey, &[u8])> {
        self.by_element
            .iter()
            .map(|(key, bytes)| (key, bytes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }
}

/// A decoded custom option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum value number
    Enum(i32),
    /// Encoded message value
    Message(Vec<u8>),
}

/// One custom option set on a declaration
///
/// Repeated options appear once per element, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOption {
    /// Fully-qualified extension name, e.g. `acme.meta.classification`
    pub name: String,
    pub number: i32,
    pub value: OptionValue,
}

/// Decode the registered extensions set in an encoded `extendee` message
///
/// Standard option fields and extensions missing from the registry are
/// skipped.
pub fn decode_custom_options(
    raw: &[u8],
    extendee: &str,
    registry: &ExtensionRegistry,
) -> Result<Vec<CustomOption>> {
    let mut buf = raw;
    let mut options = Vec::new();

    while buf.has_remaining() {
        let (number, wire_type) = decode_key(&mut buf)?;
        let extension = i32::try_from(number)
            .ok()
            .and_then(|number| registry.find_by_number(extendee, number));

        match extension {
            Some(extension) => decode_values(extension, wire_type, &mut buf, &mut options)?,
            None => skip_field(wire_type, number, &mut buf)?,
        }
    }

    Ok(options)
}

fn decode_values(
    extension: &Extension,
    wire_type: WireType,
    buf: &mut &[u8],
    out: &mut Vec<CustomOption>,
) -> Result<()> {
    let value_type = extension.value_type.as_str();
    let mut push = |value| {
        out.push(CustomOption {
            name: extension.full_name.clone(),
            number: extension.number,
            value,
        })
    };

    match (wire_type, value_type) {
        (WireType::LengthDelimited, "string") => {
            let bytes = take_delimited(buf)?;
            push(OptionValue::String(String::from_utf8_lossy(bytes).into_owned()));
        }
        (WireType::LengthDelimited, "bytes") => {
            push(OptionValue::Bytes(take_delimited(buf)?.to_vec()));
        }
        (WireType::LengthDelimited, "message") => {
            push(OptionValue::Message(take_delimited(buf)?.to_vec()));
        }
        (WireType::LengthDelimited, _) => {
            // packed repeated scalars
            let mut packed = take_delimited(buf)?;
            let element = packed_wire_type(value_type);
            while packed.has_remaining() {
                push(scalar(element, value_type, &mut packed)?);
            }
        }
        (WireType::StartGroup, _) => skip_field(wire_type, extension.number as u32, buf)?,
        _ => push(scalar(wire_type, value_type, buf)?),
    }

    Ok(())
}

fn scalar(wire_type: WireType, value_type: &str, buf: &mut &[u8]) -> Result<OptionValue> {
    let value = match wire_type {
        WireType::Varint => {
            let v = decode_varint(buf)?;
            match value_type {
                "bool" => OptionValue::Bool(v != 0),
                "enum" => OptionValue::Enum(v as i32),
                "uint32" | "uint64" => OptionValue::Uint(v),
                "sint32" | "sint64" => OptionValue::Int(((v >> 1) as i64) ^ -((v & 1) as i64)),
                "int32" => OptionValue::Int(i64::from(v as i32)),
                _ => OptionValue::Int(v as i64),
            }
        }
        WireType::ThirtyTwoBit => {
            ensure_remaining(buf, 4, value_type)?;
            let v = buf.get_u32_le();
            match value_type {
                "float" => OptionValue::Float(f64::from(f32::from_bits(v))),
                "sfixed32" => OptionValue::Int(i64::from(v as i32)),
                _ => OptionValue::Uint(u64::from(v)),
            }
        }
        WireType::SixtyFourBit => {
            ensure_remaining(buf, 8, value_type)?;
            let v = buf.get_u64_le();
            match value_type {
                "double" => OptionValue::Float(f64::from_bits(v)),
                "sfixed64" => OptionValue::Int(v as i64),
                _ => OptionValue::Uint(v),
            }
        }
        other => {
            return Err(GraphError::MalformedOptions(format!(
                "unexpected {:?} encoding for a {} value",
                other, value_type
            )))
        }
    };
    Ok(value)
}

fn packed_wire_type(value_type: &str) -> WireType {
    match value_type {
        "fixed32" | "sfixed32" | "float" => WireType::ThirtyTwoBit,
        "fixed64" | "sfixed64" | "double" => WireType::SixtyFourBit,
        _ => WireType::Varint,
    }
}

fn skip_field(wire_type: WireType, number: u32, buf: &mut &[u8]) -> Result<()> {
    match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
        }
        WireType::SixtyFourBit => advance(buf, 8)?,
        WireType::ThirtyTwoBit => advance(buf, 4)?,
        WireType::LengthDelimited => {
            take_delimited(buf)?;
        }
        WireType::StartGroup => loop {
            if !buf.has_remaining() {
                return Err(GraphError::MalformedOptions(format!(
                    "unterminated group {}",
                    number
                )));
            }
            let (inner, inner_type) = decode_key(buf)?;
            if inner_type == WireType::EndGroup {
                if inner == number {
                    break;
                }
                return Err(GraphError::MalformedOptions(format!(
                    "group {} closed by {}",
                    number, inner
                )));
            }
            skip_field(inner_type, inner, buf)?;
        },
        WireType::EndGroup => {
            return Err(GraphError::MalformedOptions(format!(
                "unexpected end of group {}",
                number
            )))
        }
    }
    Ok(())
}

fn take_delimited<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let len = usize::try_from(decode_varint(buf)?)
        .map_err(|_| GraphError::MalformedOptions("length overflows usize".to_string()))?;
    ensure_remaining(buf, len, "length-delimited")?;
    let (value, rest) = buf.split_at(len);
    *buf = rest;
    Ok(value)
}

fn advance(buf: &mut &[u8], len: usize) -> Result<()> {
    ensure_remaining(buf, len, "fixed-width")?;
    *buf = &buf[len..];
    Ok(())
}

fn ensure_remaining(buf: &[u8], len: usize, what: &str) -> Result<()> {
    if buf.len() < len {
        return Err(GraphError::MalformedOptions(format!(
            "truncated {} value: need {} bytes, have {}",
            what,
            len,
            buf.len()
        )));
    }
    Ok(())
}
