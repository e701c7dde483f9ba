//! Completeness Normalization
//!
//! There are two ways to say "this field may be missing": an omittable key
//! (`a?: T`) and a present key whose value may be absent (`a: T | Absent`).
//! Normalization folds both into the second form, so every key is present
//! and optionality is carried by the value alone.

use tracing::debug;

use super::{FieldSlot, ObjectShape, ShapeNode};

/// Make every top-level key present, marking previously optional or
/// nullable members as `T | Absent`.
///
/// `{ a: string; b?: string; c: string | Absent }` becomes
/// `{ a: string; b: string | Absent; c: string | Absent }`.
pub fn normalize(shape: &ObjectShape) -> ObjectShape {
    let normalized: ObjectShape = shape
        .iter()
        .map(|(name, slot)| (name.to_string(), complete_slot(slot, slot.node.clone())))
        .collect();
    debug!(fields = normalized.len(), "normalized shape");
    normalized
}

/// Like [`normalize`], also applied inside nested objects and the element
/// shapes of object arrays.
pub fn normalize_deep(shape: &ObjectShape) -> ObjectShape {
    shape
        .iter()
        .map(|(name, slot)| {
            let node = normalize_node_deep(&slot.node);
            (name.to_string(), complete_slot(slot, node))
        })
        .collect()
}

fn normalize_node_deep(node: &ShapeNode) -> ShapeNode {
    match node {
        ShapeNode::Object(inner) => ShapeNode::Object(normalize_deep(inner)),
        ShapeNode::Array(element) => ShapeNode::Array(Box::new(normalize_node_deep(element))),
        other => other.clone(),
    }
}

fn complete_slot(slot: &FieldSlot, node: ShapeNode) -> FieldSlot {
    FieldSlot {
        node,
        optional: false,
        nullable: !slot.is_required(),
    }
}

/// Make every key required and give all of them the same node type.
///
/// `{ one?: string; two: string; three: string | Absent }` with `number`
/// becomes `{ one: number; two: number; three: number }`.
pub fn require_all_with(shape: &ObjectShape, node: &ShapeNode) -> ObjectShape {
    shape
        .iter()
        .map(|(name, _)| (name.to_string(), FieldSlot::required(node.clone())))
        .collect()
}

/// Remove the Absent marker from every top-level value, leaving key
/// optionality untouched.
pub fn strip_absent(shape: &ObjectShape) -> ObjectShape {
    shape
        .iter()
        .map(|(name, slot)| {
            let stripped = FieldSlot {
                node: slot.node.clone(),
                optional: slot.optional,
                nullable: false,
            };
            (name.to_string(), stripped)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_shape() -> ObjectShape {
        ObjectShape::new()
            .required("key1", ShapeNode::number())
            .nullable("key2", ShapeNode::number())
            .optional("key3", ShapeNode::string())
            .with_slot(
                "key4",
                FieldSlot { node: ShapeNode::string(), optional: true, nullable: true },
            )
            .optional("key6", ShapeNode::null())
            .required("key8", ShapeNode::null())
    }

    #[test]
    fn test_normalize_makes_every_key_present() {
        let normalized = normalize(&mixed_shape());

        assert_eq!(normalized.keys(), vec!["key1", "key2", "key3", "key4", "key6", "key8"]);
        for (_, slot) in normalized.iter() {
            assert!(!slot.optional);
        }
        assert!(!normalized.get("key1").unwrap().nullable);
        assert!(normalized.get("key2").unwrap().nullable);
        assert!(normalized.get("key3").unwrap().nullable);
        assert!(normalized.get("key4").unwrap().nullable);
        assert!(normalized.get("key6").unwrap().nullable);
        // A required null-typed value is not the same as an absent one
        assert!(!normalized.get("key8").unwrap().nullable);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&mixed_shape());
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_is_shallow() {
        let inner = ObjectShape::new().optional("x", ShapeNode::string());
        let shape = ObjectShape::new().optional("nested", ShapeNode::object(inner.clone()));

        let normalized = normalize(&shape);
        assert_eq!(normalized.get("nested").unwrap().node, ShapeNode::object(inner));

        let deep = normalize_deep(&shape);
        let nested = deep.get("nested").unwrap().node.as_object().unwrap();
        assert!(nested.get("x").unwrap().nullable);
        assert!(!nested.get("x").unwrap().optional);
    }

    #[test]
    fn test_normalize_deep_reaches_object_arrays() {
        let element = ObjectShape::new().optional("phone", ShapeNode::string());
        let shape = ObjectShape::new()
            .required("contacts", ShapeNode::array_of(ShapeNode::object(element)));

        let deep = normalize_deep(&shape);
        let element = deep.get("contacts").unwrap().node.element().unwrap().as_object().unwrap();
        assert!(element.get("phone").unwrap().nullable);
    }

    #[test]
    fn test_require_all_with() {
        let shape = ObjectShape::new()
            .optional("one", ShapeNode::string())
            .required("two", ShapeNode::string())
            .nullable("three", ShapeNode::string());

        let uniform = require_all_with(&shape, &ShapeNode::number());
        assert_eq!(
            uniform,
            ObjectShape::new()
                .required("one", ShapeNode::number())
                .required("two", ShapeNode::number())
                .required("three", ShapeNode::number())
        );
    }

    #[test]
    fn test_strip_absent_keeps_key_optionality() {
        let stripped = strip_absent(&mixed_shape());
        assert!(stripped.iter().all(|(_, s)| !s.nullable));
        assert!(stripped.get("key3").unwrap().optional);
        assert!(!stripped.get("key2").unwrap().optional);
    }
}
