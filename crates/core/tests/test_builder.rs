//! Tests for graph construction and cross-reference resolution

mod common;

use common::*;
use prost_types::field_descriptor_proto::Type;
use protograph_core::graph::{FieldLabel, TypeGraph};
use protograph_core::{
    DataType, EdgeKind, GraphBuilder, GraphOptions, ProtoGraph, VertexData, VertexKey, VertexKind,
};

fn id_of(graph: &TypeGraph, kind: VertexKind, name: &str) -> protograph_core::VertexId {
    graph
        .find(&VertexKey::new(kind, name))
        .unwrap_or_else(|| panic!("missing {:?} {}", kind, name))
}

fn field_edges(graph: &TypeGraph, from: &str) -> Vec<(String, String, EdgeKind)> {
    let source = id_of(graph, VertexKind::Field, from);
    let mut edges: Vec<_> = graph
        .edges_from(source)
        .map(|(_, target, edge)| {
            (
                graph.vertex(target).unwrap().full_name().to_string(),
                edge.edge_type().to_string(),
                edge.kind(),
            )
        })
        .collect();
    edges.sort();
    edges
}

// ── Vertex creation ────────────────────────────────────────────

#[test]
fn test_order_vertices_before_flattening() {
    let set = order_set();
    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    assert_eq!(graph.vertex_count(), 11);
    for name in [
        "acme.orders.v2.Order",
        "google.protobuf.StringValue",
        "google.protobuf.Int32Value",
        "google.protobuf.BoolValue",
    ] {
        id_of(graph, VertexKind::Message, name);
    }
    id_of(graph, VertexKind::Enum, "acme.orders.v2.OrderStatus");
    id_of(graph, VertexKind::Field, "acme.orders.v2.Order.note");
    id_of(graph, VertexKind::Field, "google.protobuf.StringValue.value");
}

#[test]
fn test_order_edges_before_flattening() {
    let set = order_set();
    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let order = id_of(graph, VertexKind::Message, "acme.orders.v2.Order");
    let mut owned: Vec<_> = graph
        .edges_from(order)
        .map(|(_, target, edge)| {
            (
                graph.vertex(target).unwrap().name().to_string(),
                edge.edge_type().to_string(),
                edge.is_message_type(),
            )
        })
        .collect();
    owned.sort();
    assert_eq!(
        owned,
        vec![
            ("id".to_string(), "[type=string]".to_string(), false),
            (
                "note".to_string(),
                "[type=google_protobuf_StringValue]".to_string(),
                true
            ),
            ("status".to_string(), "[type=enum]".to_string(), false),
        ]
    );

    assert_eq!(
        field_edges(graph, "acme.orders.v2.Order.status"),
        vec![(
            "acme.orders.v2.OrderStatus".to_string(),
            "[type=enum]".to_string(),
            EdgeKind::TypeRef
        )]
    );

    assert_eq!(
        field_edges(graph, "acme.orders.v2.Order.note"),
        vec![
            (
                "google.protobuf.StringValue".to_string(),
                "[type=google_protobuf_StringValue]".to_string(),
                EdgeKind::TypeRef
            ),
            (
                "google.protobuf.StringValue.value".to_string(),
                "[type=string]".to_string(),
                EdgeKind::Field
            ),
        ]
    );
}

#[test]
fn test_every_field_has_one_owning_edge() {
    for set in [order_set(), tree_set(), payment_set()] {
        let builder = GraphBuilder::new(&set);
        let graph = builder.graph();

        for (id, vertex) in graph.vertices() {
            if vertex.kind() != VertexKind::Field {
                continue;
            }
            let owners = graph
                .edges_to(id)
                .filter(|(_, source, _)| {
                    matches!(
                        graph.vertex(*source).unwrap().kind(),
                        VertexKind::Message | VertexKind::OneOf
                    )
                })
                .count();
            assert_eq!(owners, 1, "{} owners", vertex.full_name());
        }
    }
}

// ── Field classification ───────────────────────────────────────

#[test]
fn test_field_path_types() {
    let set = set(vec![file(
        "acme/types.proto",
        "acme",
        vec![message(
            "Types",
            vec![
                field("count", 1, Type::Int64),
                field("small", 2, Type::Sint32),
                field("ratio", 3, Type::Double),
                field("flag", 4, Type::Bool),
                field("blob", 5, Type::Bytes),
                repeated(field("tags", 6, Type::String)),
                required(field("key", 7, Type::String)),
            ],
        )],
    )]);
    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let expect = |name: &str, path_type: &str, data_type: DataType| {
        let vertex = graph
            .vertex(id_of(graph, VertexKind::Field, &format!("acme.Types.{}", name)))
            .unwrap();
        assert_eq!(vertex.path_type(), path_type, "{}", name);
        assert_eq!(vertex.data_type(), data_type, "{}", name);
    };

    expect("count", "[type=long]", DataType::Number);
    expect("small", "[type=int]", DataType::Number);
    expect("ratio", "[type=double]", DataType::Number);
    expect("flag", "[type=boolean]", DataType::Boolean);
    expect("blob", "[type=bytes]", DataType::Bytes);
    expect("tags", "[type=array].[type=string]", DataType::Array);
    expect("key", "[type=string]", DataType::String);

    let key = graph
        .vertex(id_of(graph, VertexKind::Field, "acme.Types.key"))
        .unwrap();
    match key.data() {
        VertexData::Field {
            label,
            number,
            native_type,
            json_name,
            ..
        } => {
            assert_eq!(*label, FieldLabel::Required);
            assert_eq!(*number, 7);
            assert_eq!(native_type, "string");
            assert_eq!(json_name.as_deref(), Some("key"));
        }
        other => panic!("unexpected data {:?}", other),
    }
}

#[test]
fn test_map_field() {
    let mut labels = message(
        "Labeled",
        vec![repeated(message_field("labels", 1, "acme.Labeled.LabelsEntry"))],
    );
    labels.nested_type = vec![map_entry("LabelsEntry", Type::String, Type::String)];
    let set = set(vec![file("acme/labels.proto", "acme", vec![labels])]);

    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let labels_field = graph
        .vertex(id_of(graph, VertexKind::Field, "acme.Labeled.labels"))
        .unwrap();
    assert_eq!(
        labels_field.path_type(),
        "[type=map].[type=acme_Labeled_LabelsEntry]"
    );
    assert_eq!(labels_field.data_type(), DataType::Map);

    let entry = graph
        .vertex(id_of(graph, VertexKind::Message, "acme.Labeled.LabelsEntry"))
        .unwrap();
    assert!(matches!(
        entry.data(),
        VertexData::Message {
            is_map_entry: true,
            ..
        }
    ));
    assert_eq!(entry.parent(), Some("acme.Labeled"));

    let targets: Vec<_> = field_edges(graph, "acme.Labeled.labels")
        .into_iter()
        .map(|(name, _, _)| name)
        .collect();
    assert_eq!(
        targets,
        vec![
            "acme.Labeled.LabelsEntry",
            "acme.Labeled.LabelsEntry.key",
            "acme.Labeled.LabelsEntry.value",
        ]
    );
}

// ── Oneofs ─────────────────────────────────────────────────────

#[test]
fn test_one_of_group() {
    let set = payment_set();
    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let payment = id_of(graph, VertexKind::Message, "acme.pay.Payment");
    let method = id_of(graph, VertexKind::OneOf, "acme.pay.Payment.method");
    let card = id_of(graph, VertexKind::Field, "acme.pay.Payment.card");
    let iban = id_of(graph, VertexKind::Field, "acme.pay.Payment.iban");

    let one_ofs = graph
        .vertices()
        .filter(|(_, v)| v.kind() == VertexKind::OneOf)
        .count();
    assert_eq!(one_ofs, 1);

    let query = graph.query();
    let mut from_payment = query.successors(payment);
    from_payment.sort();
    assert!(from_payment.contains(&method));
    assert!(!from_payment.contains(&card));
    assert!(!from_payment.contains(&iban));

    assert_eq!(query.predecessors(card), vec![method]);
    assert_eq!(query.predecessors(iban), vec![method]);

    let group = graph.vertex(method).unwrap();
    assert_eq!(group.path_type(), "[type=union]");
    assert_eq!(group.data_type(), DataType::Union);
    match group.data() {
        VertexData::OneOf { fields } => assert_eq!(fields, &["card", "iban"]),
        other => panic!("unexpected data {:?}", other),
    }
}

#[test]
fn test_proto3_optional_is_not_a_one_of() {
    let mut optional = in_one_of(field("nickname", 1, Type::String), 0);
    optional.proto3_optional = Some(true);
    let mut person = message("Person", vec![optional]);
    person.oneof_decl = vec![one_of_decl("_nickname")];
    let set = set(vec![file("acme/person.proto", "acme", vec![person])]);

    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    assert!(graph
        .find(&VertexKey::new(VertexKind::OneOf, "acme.Person._nickname"))
        .is_none());
    let person = id_of(graph, VertexKind::Message, "acme.Person");
    let nickname = id_of(graph, VertexKind::Field, "acme.Person.nickname");
    assert_eq!(graph.query().predecessors(nickname), vec![person]);
}

// ── Nesting and references ─────────────────────────────────────

#[test]
fn test_nested_message_is_resolved() {
    let mut outer = message("Outer", vec![message_field("inner", 1, "acme.Outer.Inner")]);
    outer.nested_type = vec![message("Inner", vec![field("x", 1, Type::String)])];
    outer.enum_type = vec![enumeration("Kind", &["A", "B"])];
    let set = set(vec![file("acme/outer.proto", "acme", vec![outer])]);

    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let inner = graph
        .vertex(id_of(graph, VertexKind::Message, "acme.Outer.Inner"))
        .unwrap();
    assert_eq!(inner.parent(), Some("acme.Outer"));
    id_of(graph, VertexKind::Enum, "acme.Outer.Kind");

    let outer = graph
        .vertex(id_of(graph, VertexKind::Message, "acme.Outer"))
        .unwrap();
    match outer.data() {
        VertexData::Message {
            nested_messages,
            nested_enums,
            fields,
            ..
        } => {
            assert_eq!(nested_messages, &["acme.Outer.Inner"]);
            assert_eq!(nested_enums, &["acme.Outer.Kind"]);
            assert_eq!(fields, &["inner"]);
        }
        other => panic!("unexpected data {:?}", other),
    }

    let targets: Vec<_> = field_edges(graph, "acme.Outer.inner")
        .into_iter()
        .map(|(name, _, _)| name)
        .collect();
    assert_eq!(targets, vec!["acme.Outer.Inner", "acme.Outer.Inner.x"]);
}

#[test]
fn test_forward_reference_across_files() {
    let set = set(vec![
        file(
            "acme/a.proto",
            "acme",
            vec![message("A", vec![message_field("b", 1, "acme.B")])],
        ),
        file(
            "acme/b.proto",
            "acme",
            vec![message("B", vec![field("name", 1, Type::String)])],
        ),
    ]);

    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let targets: Vec<_> = field_edges(graph, "acme.A.b")
        .into_iter()
        .map(|(name, _, _)| name)
        .collect();
    assert_eq!(targets, vec!["acme.B", "acme.B.name"]);
}

#[test]
fn test_unknown_reference_is_left_unresolved() {
    let set = set(vec![file(
        "acme/a.proto",
        "acme",
        vec![message("A", vec![message_field("missing", 1, "acme.Missing")])],
    )]);

    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    assert!(field_edges(graph, "acme.A.missing").is_empty());
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_self_referential_message_builds() {
    let set = tree_set();
    let graph = ProtoGraph::new(&set, &GraphOptions::with_root("acme.tree.Tree")).unwrap();

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 8);

    let tree = graph.find_message("acme.tree.Tree").unwrap();
    let left = graph.find(&VertexKey::field("acme.tree.Tree.left")).unwrap();

    // Tree --left--> Field(left) --> Tree
    let query = graph.query();
    assert!(query.successors(tree).contains(&left));
    assert_eq!(query.find_by_edge_kind(left, EdgeKind::TypeRef), vec![tree]);
}

// ── Metadata ───────────────────────────────────────────────────

#[test]
fn test_comments_and_version() {
    let set = order_set();
    let builder = GraphBuilder::new(&set);
    let graph = builder.graph();

    let order = graph
        .vertex(id_of(graph, VertexKind::Message, "acme.orders.v2.Order"))
        .unwrap();
    assert_eq!(order.comment(), "An order placed by a customer.");
    assert_eq!(order.major_version(), 2);
    assert_eq!(order.file(), "acme/orders/v2/order.proto");
    assert_eq!(order.package(), "acme.orders.v2");
    assert_eq!(order.path_type(), "[type=acme_orders_v2_Order]");

    let id = graph
        .vertex(id_of(graph, VertexKind::Field, "acme.orders.v2.Order.id"))
        .unwrap();
    assert_eq!(id.comment(), "Order identifier.");
    assert_eq!(id.parent(), Some("acme.orders.v2.Order"));

    let status = graph
        .vertex(id_of(graph, VertexKind::Enum, "acme.orders.v2.OrderStatus"))
        .unwrap();
    match status.data() {
        VertexData::Enum { values } => {
            let names: Vec<_> = values.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(names, vec!["UNKNOWN", "PLACED", "SHIPPED"]);
            assert_eq!(values[2].number, 2);
        }
        other => panic!("unexpected data {:?}", other),
    }
}
