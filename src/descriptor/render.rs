//! Descriptor rendering
//!
//! Produces the JSON layout of a storage-schema definition:
//!
//! ```json
//! {
//!   "name": { "type": "String", "required": true, "trim": false },
//!   "tags": [{ "type": "ObjectId", "ref": "Tag" }],
//!   "address": { "city": { "type": "String", "required": true, "trim": false } },
//!   "contacts": { "type": [{ "phone": { "type": "String", "trim": false } }], "required": false }
//! }
//! ```
//!
//! Thunk defaults and validator predicates cannot be expressed in JSON.
//! Thunks are left out, validators are reduced to their message.

use serde_json::{json, Map, Value};

use super::{DefaultValue, DescriptorNode, DescriptorTree, FieldDescriptor};

/// Render a whole descriptor tree
pub fn render_tree(tree: &DescriptorTree) -> Value {
    let map: Map<String, Value> = tree
        .iter()
        .map(|(name, node)| (name.to_string(), render_node(node)))
        .collect();
    Value::Object(map)
}

fn render_node(node: &DescriptorNode) -> Value {
    match node {
        DescriptorNode::Field(fd) => render_field(fd),
        DescriptorNode::FieldArray(fd) => Value::Array(vec![render_field(fd)]),
        DescriptorNode::Nested(tree) => render_tree(tree),
        DescriptorNode::OptionalNested(tree) => json!({
            "type": render_tree(tree),
            "required": false,
        }),
        DescriptorNode::ObjectArray(tree) => json!({
            "type": [render_tree(tree)],
            "required": false,
        }),
    }
}

fn render_field(fd: &FieldDescriptor) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(fd.storage_type().to_string()));

    if let Some(required) = fd.required.as_flag() {
        map.insert("required".to_string(), Value::Bool(required));
    }
    if let Some(unique) = fd.unique {
        map.insert("unique".to_string(), Value::Bool(unique));
    }
    if let Some(drop_dups) = fd.drop_dups {
        map.insert("dropDups".to_string(), Value::Bool(drop_dups));
    }
    if let Some(DefaultValue::Value(value)) = &fd.default {
        map.insert("default".to_string(), value.clone());
    }
    if let Some(validator) = &fd.validator {
        map.insert("validate".to_string(), json!({ "message": validator.message() }));
    }
    if let Some(target) = &fd.reference {
        map.insert("ref".to_string(), Value::String(target.clone()));
    }
    if let Some(trim) = fd.trim {
        map.insert("trim".to_string(), Value::Bool(trim));
    }
    Value::Object(map)
}
