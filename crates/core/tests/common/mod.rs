//! Descriptor-set fixtures shared by the integration tests

#![allow(dead_code)]

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, OneofDescriptorProto, SourceCodeInfo,
};

pub fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(format!(".{}", type_name)),
        ..field(name, number, Type::Message)
    }
}

pub fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(format!(".{}", type_name)),
        ..field(name, number, Type::Enum)
    }
}

pub fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

pub fn required(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Required as i32);
    field
}

pub fn in_one_of(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn one_of_decl(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn map_entry(name: &str, key: Type, value: Type) -> DescriptorProto {
    DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(name, vec![field("key", 1, key), field("value", 2, value)])
    }
}

pub fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, value)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(i as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn comment(path: Vec<i32>, leading: &str) -> Location {
    Location {
        path,
        leading_comments: Some(leading.to_string()),
        ..Default::default()
    }
}

pub fn set(files: Vec<FileDescriptorProto>) -> FileDescriptorSet {
    FileDescriptorSet { file: files }
}

/// `google/protobuf/wrappers.proto` with the wrappers used in tests
pub fn wrappers_file() -> FileDescriptorProto {
    file(
        "google/protobuf/wrappers.proto",
        "google.protobuf",
        vec![
            message("StringValue", vec![field("value", 1, Type::String)]),
            message("Int32Value", vec![field("value", 1, Type::Int32)]),
            message("BoolValue", vec![field("value", 1, Type::Bool)]),
        ],
    )
}

/// `Order { string id; OrderStatus status; google.protobuf.StringValue note; }`
pub fn order_file() -> FileDescriptorProto {
    let mut order_file = file(
        "acme/orders/v2/order.proto",
        "acme.orders.v2",
        vec![message(
            "Order",
            vec![
                field("id", 1, Type::String),
                enum_field("status", 2, "acme.orders.v2.OrderStatus"),
                message_field("note", 3, "google.protobuf.StringValue"),
            ],
        )],
    );
    order_file.dependency = vec!["google/protobuf/wrappers.proto".to_string()];
    order_file.enum_type = vec![enumeration("OrderStatus", &["UNKNOWN", "PLACED", "SHIPPED"])];
    order_file.source_code_info = Some(SourceCodeInfo {
        location: vec![
            comment(vec![4, 0], " An order placed by a customer.\n"),
            comment(vec![4, 0, 2, 0], " Order identifier.\n"),
        ],
    });
    order_file
}

pub fn order_set() -> FileDescriptorSet {
    set(vec![wrappers_file(), order_file()])
}

/// `Tree { Tree left; Tree right; }`
pub fn tree_set() -> FileDescriptorSet {
    set(vec![file(
        "tree.proto",
        "acme.tree",
        vec![message(
            "Tree",
            vec![
                message_field("left", 1, "acme.tree.Tree"),
                message_field("right", 2, "acme.tree.Tree"),
            ],
        )],
    )])
}

/// `Payment { oneof method { string card; string iban; } int64 amount; }`
pub fn payment_set() -> FileDescriptorSet {
    let mut payment = message(
        "Payment",
        vec![
            in_one_of(field("card", 1, Type::String), 0),
            in_one_of(field("iban", 2, Type::String), 0),
            field("amount", 3, Type::Int64),
        ],
    );
    payment.oneof_decl = vec![one_of_decl("method")];
    set(vec![file("acme/pay/payment.proto", "acme.pay", vec![payment])])
}
