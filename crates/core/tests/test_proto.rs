//! Tests for graph identity and name lookup

mod common;

use common::*;
use prost::Message;
use protograph_core::{GraphOptions, ProtoGraph, VertexKind};

fn unflattened() -> GraphOptions {
    GraphOptions {
        flatten_wrappers: false,
        ..GraphOptions::default()
    }
}

#[test]
fn test_identity_hash_is_stable() {
    let first = ProtoGraph::new(&order_set(), &GraphOptions::default()).unwrap();
    let second = ProtoGraph::from_bytes(&order_set().encode_to_vec(), &GraphOptions::default())
        .unwrap();

    let hash = first.identity_hash();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash, second.identity_hash());
    assert!(first == second);
}

#[test]
fn test_identity_hash_ignores_file_order() {
    let reordered = set(vec![order_file(), wrappers_file()]);
    let options = GraphOptions::with_root("acme.orders.v2.Order");

    let a = ProtoGraph::new(&order_set(), &options).unwrap();
    let b = ProtoGraph::new(&reordered, &options).unwrap();

    assert_eq!(a.identity_hash(), b.identity_hash());
}

#[test]
fn test_identity_hash_tracks_structure() {
    let flattened = ProtoGraph::new(&order_set(), &GraphOptions::default()).unwrap();
    let raw = ProtoGraph::new(&order_set(), &unflattened()).unwrap();

    assert_ne!(flattened.identity_hash(), raw.identity_hash());
    assert!(flattened != raw);
}

#[test]
fn test_identity_hash_tracks_root() {
    let as_order = ProtoGraph::new(&order_set(), &unflattened()).unwrap();
    let as_wrapper = ProtoGraph::new(
        &order_set(),
        &GraphOptions {
            flatten_wrappers: false,
            ..GraphOptions::with_root("google.protobuf.StringValue")
        },
    )
    .unwrap();

    assert_eq!(as_order.vertex_count(), as_wrapper.vertex_count());
    assert_ne!(as_order.identity_hash(), as_wrapper.identity_hash());
}

#[test]
fn test_find_by_name() {
    let graph = ProtoGraph::new(&payment_set(), &GraphOptions::default()).unwrap();

    let payment = graph.find_by_name("acme.pay.Payment").unwrap();
    assert_eq!(payment, graph.root_id());

    let method = graph.find_by_name("acme.pay.Payment.method").unwrap();
    assert_eq!(graph.vertex(method).unwrap().kind(), VertexKind::OneOf);

    let amount = graph.find_by_name("acme.pay.Payment.amount").unwrap();
    assert_eq!(graph.vertex(amount).unwrap().kind(), VertexKind::Field);

    assert!(graph.find_by_name("acme.pay.Refund").is_none());
    assert!(graph.find_message("acme.pay.Payment.amount").is_err());
}

#[test]
fn test_root_accessors() {
    let graph = ProtoGraph::new(&order_set(), &GraphOptions::default()).unwrap();

    assert_eq!(graph.full_name(), "acme.orders.v2.Order");
    assert_eq!(graph.major_version(), 2);
    assert_eq!(graph.comment(), "An order placed by a customer.");
    assert_eq!(graph.root().kind(), VertexKind::Message);
}
