//! Shape Document Loading
//!
//! Reads domain-model shapes from JSON documents. This is pure structure
//! detection - nothing is classified or derived here, but an unknown
//! primitive name is rejected at construction time.
//!
//! ```json
//! {
//!   "model": "User",
//!   "version": "1.2.0",
//!   "fields": {
//!     "name": "string",
//!     "nickname?": "string",
//!     "owner": "ref:Account",
//!     "tags?": "string[]",
//!     "address": { "fields": { "city": "string" } },
//!     "contacts?": { "items": { "fields": { "phone": "string" } } },
//!     "score": { "type": "number", "nullable": true }
//!   }
//! }
//! ```

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::version::ModelVersion;

use super::{FieldPath, FieldSlot, ObjectShape, ScalarKind, ShapeNode};

const OPTIONAL_SUFFIX: char = '?';
const ARRAY_SUFFIX: &str = "[]";
const REF_PREFIX: &str = "ref:";

/// A named, optionally versioned model shape
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDocument {
    pub model: String,
    pub version: Option<ModelVersion>,
    pub shape: ObjectShape,
}

/// Load a shape document from disk
pub fn load_document(path: &Path) -> Result<ModelDocument> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let doc = parse_document(&value)?;
    debug!(model = %doc.model, path = %path.display(), fields = doc.shape.len(), "loaded shape document");
    Ok(doc)
}

/// Parse a shape document from JSON
pub fn parse_document(value: &Value) -> Result<ModelDocument> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::InvalidFormat("document must be a JSON object".to_string()))?;

    let model = obj
        .get("model")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SchemaError::InvalidFormat("missing 'model' name".to_string()))?
        .to_string();

    let version = match obj.get("version") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(
            ModelVersion::parse(s).map_err(|e| SchemaError::InvalidVersion(format!("{}: {}", s, e)))?,
        ),
        Some(other) => {
            return Err(SchemaError::InvalidVersion(other.to_string()));
        }
    };

    let fields = obj
        .get("fields")
        .ok_or_else(|| SchemaError::InvalidFormat(format!("model '{}' has no 'fields'", model)))?;

    Ok(ModelDocument {
        model,
        version,
        shape: parse_shape(fields)?,
    })
}

/// Parse an object shape from a `fields` mapping
pub fn parse_shape(fields: &Value) -> Result<ObjectShape> {
    parse_fields(fields, &FieldPath::root())
}

fn parse_fields(fields: &Value, path: &FieldPath) -> Result<ObjectShape> {
    let map = fields
        .as_object()
        .ok_or_else(|| SchemaError::InvalidFormat(format!("'fields' at {} must be an object", path)))?;

    let mut shape = ObjectShape::new();
    for (key, spec) in map {
        let (name, key_optional) = match key.strip_suffix(OPTIONAL_SUFFIX) {
            Some(stripped) => (stripped, true),
            None => (key.as_str(), false),
        };
        if name.is_empty() {
            return Err(SchemaError::InvalidFormat(format!("empty field name at {}", path)));
        }

        let field_path = path.field(name);
        let node = parse_node(spec, &field_path)?;
        let slot = FieldSlot {
            node,
            optional: key_optional || flag(spec, "optional"),
            nullable: flag(spec, "nullable"),
        };
        shape = shape.with_slot(name, slot);
    }
    Ok(shape)
}

fn flag(spec: &Value, name: &str) -> bool {
    spec.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn parse_node(spec: &Value, path: &FieldPath) -> Result<ShapeNode> {
    match spec {
        Value::String(type_name) => parse_type_name(type_name, path),
        Value::Object(map) => parse_node_object(map, path),
        other => Err(SchemaError::InvalidFormat(format!(
            "field {} must be a type name or an object, got {}",
            path, other
        ))),
    }
}

fn parse_node_object(map: &Map<String, Value>, path: &FieldPath) -> Result<ShapeNode> {
    if let Some(fields) = map.get("fields") {
        return Ok(ShapeNode::Object(parse_fields(fields, path)?));
    }
    if let Some(items) = map.get("items") {
        return Ok(ShapeNode::array_of(parse_node(items, &path.items())?));
    }
    if let Some(target) = map.get("ref") {
        let target = target
            .as_str()
            .ok_or_else(|| SchemaError::InvalidFormat(format!("'ref' at {} must be a string", path)))?;
        return parse_type_name(&format!("{}{}", REF_PREFIX, target), path);
    }

    match map.get("type").and_then(|v| v.as_str()) {
        Some("object") => Ok(ShapeNode::Object(ObjectShape::new())),
        Some("array") => Err(SchemaError::InvalidFormat(format!("array at {} has no 'items'", path))),
        Some(type_name) => parse_type_name(type_name, path),
        None => Err(SchemaError::InvalidFormat(format!("field {} has no type", path))),
    }
}

fn parse_type_name(type_name: &str, path: &FieldPath) -> Result<ShapeNode> {
    let type_name = type_name.trim();

    if let Some(element) = type_name.strip_suffix(ARRAY_SUFFIX) {
        return Ok(ShapeNode::array_of(parse_type_name(element, &path.items())?));
    }

    if let Some(target) = type_name.strip_prefix(REF_PREFIX) {
        if target.is_empty() {
            return Err(SchemaError::InvalidFormat(format!("reference at {} has no target", path)));
        }
        return Ok(ShapeNode::reference(target));
    }

    match type_name {
        "date" => Ok(ShapeNode::Temporal),
        "object" => Ok(ShapeNode::Object(ObjectShape::new())),
        other => ScalarKind::from_name(other)
            .map(ShapeNode::Scalar)
            .ok_or_else(|| SchemaError::UnknownPrimitive {
                name: other.to_string(),
                path: path.to_string(),
            }),
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render a shape back into the document `fields` format
pub fn render_shape(shape: &ObjectShape) -> Value {
    let mut map = Map::new();
    for (name, slot) in shape.iter() {
        let key = if slot.optional {
            format!("{}{}", name, OPTIONAL_SUFFIX)
        } else {
            name.to_string()
        };
        let mut spec = render_node(&slot.node);
        if slot.nullable {
            spec = match spec {
                Value::Object(mut obj) => {
                    obj.insert("nullable".to_string(), Value::Bool(true));
                    Value::Object(obj)
                }
                other => serde_json::json!({ "type": other, "nullable": true }),
            };
        }
        map.insert(key, spec);
    }
    Value::Object(map)
}

/// Render a whole document
pub fn render_document(doc: &ModelDocument) -> Value {
    let mut map = Map::new();
    map.insert("model".to_string(), Value::String(doc.model.clone()));
    if let Some(version) = &doc.version {
        map.insert("version".to_string(), Value::String(version.version_string()));
    }
    map.insert("fields".to_string(), render_shape(&doc.shape));
    Value::Object(map)
}

fn render_node(node: &ShapeNode) -> Value {
    match node {
        ShapeNode::Object(shape) => serde_json::json!({ "fields": render_shape(shape) }),
        ShapeNode::Array(element) => match render_node(element) {
            Value::String(name) => Value::String(format!("{}{}", name, ARRAY_SUFFIX)),
            other => serde_json::json!({ "items": other }),
        },
        other => Value::String(type_name(other)),
    }
}

fn type_name(node: &ShapeNode) -> String {
    match node {
        ShapeNode::Scalar(kind) => kind.name().to_string(),
        ShapeNode::Reference(target) => format!("{}{}", REF_PREFIX, target),
        ShapeNode::Temporal => "date".to_string(),
        // Containers are rendered structurally by render_node
        ShapeNode::Array(_) | ShapeNode::Object(_) => String::new(),
    }
}
