//! Kind-Directed Structural Filters
//!
//! Pick or omit the fields of a tree by the classified kind of their
//! values. Works on anything implementing [`FieldTree`]: model shapes and
//! derived descriptor trees.
//!
//! Shallow filters decide on top-level fields only. Deep filters also
//! descend into nested objects:
//!
//! - every nested object that stays in the result is filtered recursively,
//!   including one kept by pick because the predicate matched it;
//! - a field whose kind matches is dropped whole by omit, nested or not;
//! - a nested object that does not match is kept, then filtered;
//! - any other field that does not match is dropped (pick) or kept (omit).
//!
//! Arrays of objects are leaves here. Filters never reorder fields and
//! never remove branches that end up empty; see [`prune`] for that.

pub mod kinds;
pub mod prune;

pub use kinds::KindPredicate;
pub use prune::{prune_empty, prune_empty_shallow};

use tracing::debug;

use crate::descriptor::{DescriptorNode, DescriptorTree};
use crate::error::Result;
use crate::shape::{classify_at, FieldKind, FieldPath, FieldSlot, ObjectShape, ShapeNode};

// =============================================================================
// Field Trees
// =============================================================================

/// An ordered, object-shaped tree whose entries can be classified
pub trait FieldTree: Sized {
    type Entry: Clone;

    /// Entries in declaration order
    fn entries(&self) -> Vec<(&str, &Self::Entry)>;

    /// Rebuild a tree from entries, keeping their order
    fn from_entries(entries: Vec<(String, Self::Entry)>) -> Self;

    /// Kind of an entry's value
    fn kind_of(path: &FieldPath, entry: &Self::Entry) -> Result<FieldKind>;

    /// Nested object held by an entry, if any
    fn branch(entry: &Self::Entry) -> Option<&Self>;

    /// The same entry holding a different nested object
    fn rebranch(entry: &Self::Entry, branch: Self) -> Self::Entry;

    fn keys(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    fn is_empty_tree(&self) -> bool {
        self.entries().is_empty()
    }
}

impl FieldTree for ObjectShape {
    type Entry = FieldSlot;

    fn entries(&self) -> Vec<(&str, &FieldSlot)> {
        self.iter().collect()
    }

    fn from_entries(entries: Vec<(String, FieldSlot)>) -> Self {
        entries.into_iter().collect()
    }

    fn kind_of(path: &FieldPath, entry: &FieldSlot) -> Result<FieldKind> {
        classify_at(path, &entry.node)
    }

    fn branch(entry: &FieldSlot) -> Option<&Self> {
        entry.node.as_object()
    }

    fn rebranch(entry: &FieldSlot, branch: Self) -> FieldSlot {
        entry.with_node(ShapeNode::Object(branch))
    }
}

impl FieldTree for DescriptorTree {
    type Entry = DescriptorNode;

    fn entries(&self) -> Vec<(&str, &DescriptorNode)> {
        self.iter().collect()
    }

    fn from_entries(entries: Vec<(String, DescriptorNode)>) -> Self {
        entries.into_iter().collect()
    }

    fn kind_of(_path: &FieldPath, entry: &DescriptorNode) -> Result<FieldKind> {
        Ok(entry.kind())
    }

    fn branch(entry: &DescriptorNode) -> Option<&Self> {
        entry.nested()
    }

    fn rebranch(entry: &DescriptorNode, branch: Self) -> DescriptorNode {
        entry.with_nested(branch)
    }
}

// =============================================================================
// Pick / Omit
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pick,
    Omit,
}

/// Keep top-level fields whose kind matches
pub fn pick_by_kind<T, P>(tree: &T, predicate: &P) -> Result<T>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    filter(tree, predicate, Mode::Pick, false, &FieldPath::root())
}

/// Drop top-level fields whose kind matches
pub fn omit_by_kind<T, P>(tree: &T, predicate: &P) -> Result<T>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    filter(tree, predicate, Mode::Omit, false, &FieldPath::root())
}

/// Keep matching fields at every nesting level
pub fn pick_by_kind_deep<T, P>(tree: &T, predicate: &P) -> Result<T>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    filter(tree, predicate, Mode::Pick, true, &FieldPath::root())
}

/// Drop matching fields at every nesting level
pub fn omit_by_kind_deep<T, P>(tree: &T, predicate: &P) -> Result<T>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    filter(tree, predicate, Mode::Omit, true, &FieldPath::root())
}

fn filter<T, P>(tree: &T, predicate: &P, mode: Mode, deep: bool, path: &FieldPath) -> Result<T>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    let mut kept = Vec::new();
    let entries = tree.entries();
    let total = entries.len();

    for (name, entry) in entries {
        let field_path = path.field(name);
        let matched = predicate.matches(&T::kind_of(&field_path, entry)?);

        let keep_whole = match mode {
            Mode::Pick => matched,
            Mode::Omit => !matched,
        };

        if !deep {
            if keep_whole {
                kept.push((name.to_string(), entry.clone()));
            }
            continue;
        }

        match (mode, matched, T::branch(entry)) {
            (Mode::Omit, true, _) => {}
            (_, _, Some(branch)) => {
                let filtered = filter(branch, predicate, mode, deep, &field_path)?;
                kept.push((name.to_string(), T::rebranch(entry, filtered)));
            }
            (_, _, None) if keep_whole => kept.push((name.to_string(), entry.clone())),
            (_, _, None) => {}
        }
    }

    debug!(path = %path, ?mode, deep, kept = kept.len(), total, "filtered fields by kind");
    Ok(T::from_entries(kept))
}

/// Names of top-level fields whose kind matches
pub fn keys_of_kind<T, P>(tree: &T, predicate: &P) -> Result<Vec<String>>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    Ok(pick_by_kind(tree, predicate)?.keys().into_iter().map(String::from).collect())
}

/// Names of top-level fields whose kind does not match
pub fn keys_not_of_kind<T, P>(tree: &T, predicate: &P) -> Result<Vec<String>>
where
    T: FieldTree,
    P: KindPredicate + ?Sized,
{
    Ok(omit_by_kind(tree, predicate)?.keys().into_iter().map(String::from).collect())
}

// =============================================================================
// Common Fields
// =============================================================================

/// Fields declared by both shapes, in the order of `a`.
///
/// A shared field keeps its node when both shapes agree on it; its slot
/// may be absent if it may be absent in either shape. Shared names whose
/// nodes differ have no single node to carry and are left out. Disjoint
/// shapes give an empty shape, which [`prune_empty`] removes when it is
/// nested.
pub fn common_fields(a: &ObjectShape, b: &ObjectShape) -> ObjectShape {
    let common: ObjectShape = a
        .iter()
        .filter_map(|(name, slot)| {
            let other = b.get(name)?;
            if other.node != slot.node {
                debug!(field = name, "shared field differs in kind, left out");
                return None;
            }
            let merged = FieldSlot {
                node: slot.node.clone(),
                optional: slot.optional || other.optional,
                nullable: slot.nullable || other.nullable,
            };
            Some((name.to_string(), merged))
        })
        .collect();

    debug!(left = a.len(), right = b.len(), common = common.len(), "intersected shapes");
    common
}

#[cfg(test)]
mod tests {
    use super::kinds::{is_null, is_number_like, is_temporal};
    use super::*;
    use crate::descriptor::derive;
    use crate::error::SchemaError;

    /// `{ x: number; y: string; z: { a: null; b: number; c: number[]; d: Date } }`
    fn sample() -> ObjectShape {
        let z = ObjectShape::new()
            .required("a", ShapeNode::null())
            .required("b", ShapeNode::number())
            .required("c", ShapeNode::array_of(ShapeNode::number()))
            .required("d", ShapeNode::date());
        ObjectShape::new()
            .required("x", ShapeNode::number())
            .required("y", ShapeNode::string())
            .required("z", ShapeNode::object(z))
    }

    fn number_null_or_date(kind: &FieldKind) -> bool {
        is_number_like(kind) || is_null(kind) || is_temporal(kind)
    }

    #[test]
    fn test_pick_shallow() {
        let picked = pick_by_kind(&sample(), &is_number_like).unwrap();
        assert_eq!(picked, ObjectShape::new().required("x", ShapeNode::number()));
    }

    #[test]
    fn test_omit_shallow() {
        let omitted = omit_by_kind(&sample(), &is_number_like).unwrap();
        assert_eq!(omitted.keys(), vec!["y", "z"]);
        assert_eq!(omitted.get("z"), sample().get("z"));
    }

    #[test]
    fn test_pick_deep() {
        let picked = pick_by_kind_deep(&sample(), &is_number_like).unwrap();
        let expected = ObjectShape::new()
            .required("x", ShapeNode::number())
            .required("z", ShapeNode::object(ObjectShape::new().required("b", ShapeNode::number())));
        assert_eq!(picked, expected);
    }

    #[test]
    fn test_pick_deep_with_union_predicate() {
        let picked = pick_by_kind_deep(&sample(), &number_null_or_date).unwrap();
        let z = picked.get("z").unwrap().node.as_object().unwrap();
        assert_eq!(picked.keys(), vec!["x", "z"]);
        assert_eq!(z.keys(), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_omit_deep() {
        let omitted = omit_by_kind_deep(&sample(), &is_number_like).unwrap();
        let z = omitted.get("z").unwrap().node.as_object().unwrap();
        assert_eq!(omitted.keys(), vec!["y", "z"]);
        assert_eq!(z.keys(), vec!["a", "c", "d"]);

        let omitted = omit_by_kind_deep(&sample(), &number_null_or_date).unwrap();
        let z = omitted.get("z").unwrap().node.as_object().unwrap();
        assert_eq!(z.keys(), vec!["c"]);
    }

    #[test]
    fn test_deep_filter_keeps_empty_branches() {
        let picked = pick_by_kind_deep(&sample(), &|k: &FieldKind| matches!(k, FieldKind::Reference))
            .unwrap();
        assert_eq!(picked.keys(), vec!["z"]);
        assert!(picked.get("z").unwrap().node.is_empty_object());
    }

    #[test]
    fn test_deep_omit_matching_branch_is_dropped_whole() {
        let shape = ObjectShape::new()
            .required("a", ShapeNode::number())
            .required("b", ShapeNode::object(ObjectShape::new()));
        let omitted = omit_by_kind_deep(&shape, &|k: &FieldKind| *k == FieldKind::NestedObject).unwrap();
        assert_eq!(omitted.keys(), vec!["a"]);
    }

    #[test]
    fn test_deep_pick_filters_inside_matched_branch() {
        let shape = ObjectShape::new().required(
            "z",
            ShapeNode::object(
                ObjectShape::new()
                    .required("a", ShapeNode::string())
                    .required("b", ShapeNode::number()),
            ),
        );
        let numbers_or_objects =
            |k: &FieldKind| is_number_like(k) || *k == FieldKind::NestedObject;

        let picked = pick_by_kind_deep(&shape, &numbers_or_objects).unwrap();
        let z = picked.get("z").unwrap().node.as_object().unwrap();
        assert_eq!(z.keys(), vec!["b"]);

        let omitted = omit_by_kind_deep(&shape, &numbers_or_objects).unwrap();
        assert!(omitted.is_empty());
    }

    #[test]
    fn test_deep_pick_matched_branch_can_end_up_empty() {
        let shape = ObjectShape::new()
            .required("n", ShapeNode::number())
            .optional("meta", ShapeNode::object(ObjectShape::new().required("label", ShapeNode::string())));
        let picked = pick_by_kind_deep(&shape, &|k: &FieldKind| {
            is_number_like(k) || super::kinds::is_nested_object(k)
        })
        .unwrap();

        assert_eq!(picked.keys(), vec!["n", "meta"]);
        let meta = picked.get("meta").unwrap();
        assert!(meta.optional);
        assert!(meta.node.is_empty_object());
        assert_eq!(prune_empty(&picked).keys(), vec!["n"]);
    }

    #[test]
    fn test_common_fields() {
        let a = ObjectShape::new()
            .required("y", ShapeNode::number())
            .required("x", ShapeNode::number());
        let b = ObjectShape::new()
            .optional("y", ShapeNode::number())
            .required("z", ShapeNode::string());

        let common = common_fields(&a, &b);
        assert_eq!(common.keys(), vec!["y"]);
        assert!(common.get("y").unwrap().optional);
        assert_eq!(common_fields(&b, &a).keys(), vec!["y"]);
    }

    #[test]
    fn test_common_fields_of_disjoint_shapes_is_pruned() {
        let a = ObjectShape::new().required("x", ShapeNode::number());
        let b = ObjectShape::new().required("z", ShapeNode::string());
        let common = common_fields(&a, &b);
        assert!(common.is_empty());

        let wrapped = ObjectShape::new()
            .required("id", ShapeNode::string())
            .required("shared", ShapeNode::object(common));
        assert_eq!(prune_empty(&wrapped).keys(), vec!["id"]);
    }

    #[test]
    fn test_common_fields_skip_conflicting_nodes() {
        let a = ObjectShape::new()
            .required("k", ShapeNode::number())
            .required("same", ShapeNode::date());
        let b = ObjectShape::new()
            .required("same", ShapeNode::date())
            .required("k", ShapeNode::string());
        assert_eq!(common_fields(&a, &b).keys(), vec!["same"]);
    }

    #[test]
    fn test_slot_flags_survive_filtering() {
        let shape = ObjectShape::new()
            .optional("n", ShapeNode::number())
            .nullable("inner", ShapeNode::object(ObjectShape::new().optional("m", ShapeNode::number())));
        let picked = pick_by_kind_deep(&shape, &is_number_like).unwrap();
        assert!(picked.get("n").unwrap().optional);
        let inner = picked.get("inner").unwrap();
        assert!(inner.nullable);
        assert!(inner.node.as_object().unwrap().get("m").unwrap().optional);
    }

    #[test]
    fn test_filter_descriptor_tree() {
        let shape = ObjectShape::new()
            .required("count", ShapeNode::number())
            .required("name", ShapeNode::string())
            .optional("stats", ShapeNode::object(
                ObjectShape::new()
                    .required("avg", ShapeNode::number())
                    .required("label", ShapeNode::string()),
            ));
        let tree = derive(&shape).unwrap();

        let picked = pick_by_kind_deep(&tree, &is_number_like).unwrap();
        assert_eq!(picked.keys(), vec!["count", "stats"]);
        match picked.get("stats") {
            Some(DescriptorNode::OptionalNested(inner)) => assert_eq!(inner.keys(), vec!["avg"]),
            other => panic!("Expected OptionalNested, got {:?}", other),
        }
    }

    #[test]
    fn test_unclassifiable_field_reports_path() {
        let shape = ObjectShape::new().required(
            "outer",
            ShapeNode::object(
                ObjectShape::new().required("grid", ShapeNode::array_of(ShapeNode::array_of(ShapeNode::number()))),
            ),
        );
        match pick_by_kind_deep(&shape, &is_number_like) {
            Err(SchemaError::UnsupportedShapeKind { path, .. }) => assert_eq!(path, "outer.grid[]"),
            other => panic!("Expected UnsupportedShapeKind, got {:?}", other),
        }
    }

    #[test]
    fn test_keys_of_kind() {
        let shape = ObjectShape::new()
            .required("a", ShapeNode::number())
            .required("b", ShapeNode::boolean())
            .required("c", ShapeNode::null());
        let of_kind = keys_of_kind(&shape, &|k: &FieldKind| {
            super::kinds::is_boolean(k) || is_null(k)
        })
        .unwrap();
        assert_eq!(of_kind, vec!["b", "c"]);
        let not_of_kind = keys_not_of_kind(&shape, &super::kinds::is_boolean).unwrap();
        assert_eq!(not_of_kind, vec!["a", "c"]);
    }
}
