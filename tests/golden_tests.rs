//! Golden Tests for Derivation, Filtering and Pruning
//!
//! Loads shape documents from `tests/fixtures` and checks the derived
//! descriptors and filtered shapes against known output.

use std::path::{Path, PathBuf};

use familiar_shapes::filter::kinds::{is_null, is_number_like, is_reference, is_temporal};
use familiar_shapes::shape::{load_document, parse_document, render_shape};
use familiar_shapes::{
    derive, normalize, omit_by_kind_deep, pick_by_kind, pick_by_kind_deep, prune_empty,
    DescriptorNode, Deriver, FieldKind, ModelDocument, ObjectShape, Requirement, SchemaError,
    ShapeNode, ShapesConfig,
};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load(name: &str) -> ModelDocument {
    load_document(&fixture(name)).unwrap_or_else(|e| panic!("loading {}: {}", name, e))
}

// =============================================================================
// Derivation
// =============================================================================

#[test]
fn test_model_definition_golden() {
    let doc = load("model_definition.json");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/model_definition.expected.json")).unwrap();

    let tree = derive(&doc.shape).unwrap();
    assert_eq!(tree.to_json(), expected);
    assert_eq!(tree.keys(), vec!["test", "test2", "test3", "test6", "test9"]);
}

#[test]
fn test_model_definition_node_shapes() {
    let doc = load("model_definition.json");
    let tree = derive(&doc.shape).unwrap();

    assert!(matches!(tree.get("test3"), Some(DescriptorNode::Nested(_))));
    assert!(matches!(tree.get("test6"), Some(DescriptorNode::ObjectArray(_))));
    assert!(matches!(tree.get("test9"), Some(DescriptorNode::OptionalNested(_))));
    assert_eq!(tree.lookup("test3.test5").unwrap().kind(), FieldKind::ArrayOfScalar(
        familiar_shapes::LeafKind::Scalar(familiar_shapes::ScalarKind::String),
    ));
    assert_eq!(tree.lookup("test6.test7").unwrap().requirement(), Requirement::Required);
    assert_eq!(tree.lookup("test9.test11").unwrap().requirement(), Requirement::Unspecified);
}

#[test]
fn test_account_descriptor() {
    let doc = load("account.json");
    assert_eq!(doc.version.as_ref().unwrap().version_string(), "2.1.0");

    let tree = derive(&doc.shape).unwrap();
    let json = tree.to_json();

    assert!(json.get("_id").is_none());
    assert_eq!(json["owner"], json!({ "type": "ObjectId", "required": true, "ref": "User" }));
    assert_eq!(json["members"], json!([{ "type": "ObjectId", "ref": "User" }]));
    assert_eq!(json["createdAt"], json!({ "type": "Date", "required": true }));
    assert_eq!(json["logins"], json!([{ "type": "Date" }]));
    assert_eq!(json["balance"], json!({ "type": "Number" }));
    assert_eq!(json["active"], json!({ "type": "Boolean", "required": true }));
    assert_eq!(json["settings"]["limits"]["daily"]["required"], json!(true));
    assert!(json["settings"]["limits"]["monthly"].get("required").is_none());
}

#[test]
fn test_config_driven_derivation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.toml");
    std::fs::write(&path, "[derive]\nexcluded_fields = [\"email\"]\ntrim_strings = true\n").unwrap();
    let config = ShapesConfig::load_from(Some(path.to_str().unwrap())).unwrap();

    let doc = load("account.json");
    let tree = Deriver::with_options(config.derive_options()).derive(&doc.shape).unwrap();
    let json = tree.to_json();

    // `_id` is no longer excluded once the list is overridden
    assert_eq!(json["_id"]["ref"], json!("Account"));
    assert!(json.get("email").is_none());
    assert_eq!(json["settings"]["theme"]["trim"], json!(true));
}

#[test]
fn test_checksum_is_stable_across_loads() {
    let a = derive(&load("account.json").shape).unwrap().checksum();
    let b = derive(&load("account.json").shape).unwrap().checksum();
    let other = derive(&load("model_definition.json").shape).unwrap().checksum();
    assert_eq!(a, b);
    assert_ne!(a, other);
}

#[test]
fn test_unknown_primitive_fails_at_load() {
    match load_document(&fixture("unknown_primitive.json")) {
        Err(SchemaError::UnknownPrimitive { name, path }) => {
            assert_eq!(name, "geopoint");
            assert_eq!(path, "location.point");
        }
        other => panic!("Expected UnknownPrimitive, got {:?}", other),
    }
}

#[test]
fn test_nested_arrays_abort_derivation() {
    let doc = parse_document(&json!({
        "model": "Grid",
        "fields": { "name": "string", "cells": "number[][]" }
    }))
    .unwrap();

    match derive(&doc.shape) {
        Err(SchemaError::UnsupportedShapeKind { path, .. }) => assert_eq!(path, "cells[]"),
        other => panic!("Expected UnsupportedShapeKind, got {:?}", other),
    }
}

// =============================================================================
// Filtering and Pruning
// =============================================================================

#[test]
fn test_deep_pick_number_like() {
    let doc = load("measurements.json");
    let picked = pick_by_kind_deep(&doc.shape, &is_number_like).unwrap();

    assert_eq!(
        render_shape(&picked),
        json!({ "x": "number", "z": { "fields": { "b": "number" } } })
    );
}

#[test]
fn test_deep_omit_number_null_or_date() {
    let doc = load("measurements.json");
    let predicate = |k: &FieldKind| is_number_like(k) || is_null(k) || is_temporal(k);
    let omitted = omit_by_kind_deep(&doc.shape, &predicate).unwrap();

    assert_eq!(
        render_shape(&omitted),
        json!({ "y": "string", "z": { "fields": { "c": "number[]" } } })
    );
}

#[test]
fn test_prune_sparse_fixture() {
    let doc = load("sparse.json");
    let pruned = prune_empty(&doc.shape);
    assert_eq!(pruned, ObjectShape::new().required("a", ShapeNode::number()));
    assert_eq!(prune_empty(&pruned), pruned);
}

#[test]
fn test_filter_then_prune_pipeline() {
    let doc = load("account.json");
    let refs = pick_by_kind_deep(&doc.shape, &is_reference).unwrap();
    // settings survives the filter as an empty branch chain
    assert!(refs.get("settings").is_some());

    let pruned = prune_empty(&refs);
    assert_eq!(pruned.keys(), vec!["_id", "owner"]);
}

#[test]
fn test_filter_derived_descriptor() {
    let doc = load("account.json");
    let tree = derive(&doc.shape).unwrap();

    let dates = pick_by_kind(&tree, &is_temporal).unwrap();
    assert_eq!(dates.keys(), vec!["createdAt"]);

    let numbers = prune_empty(&pick_by_kind_deep(&tree, &is_number_like).unwrap());
    assert_eq!(
        numbers.to_json(),
        json!({
            "balance": { "type": "Number" },
            "settings": {
                "limits": {
                    "daily": { "type": "Number", "required": true },
                    "monthly": { "type": "Number" }
                }
            }
        })
    );
}

#[test]
fn test_normalize_before_derive() {
    let doc = load("model_definition.json");
    let normalized = normalize(&doc.shape);
    assert!(normalized.iter().all(|(_, slot)| !slot.optional));

    // Both encodings of optionality derive the same descriptor
    assert_eq!(derive(&normalized).unwrap(), derive(&doc.shape).unwrap());
}
