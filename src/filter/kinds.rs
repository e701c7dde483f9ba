//! Kind predicates
//!
//! Any `Fn(&FieldKind) -> bool` is a predicate, so unions of kinds are
//! plain closures: `|k| is_number_like(k) || is_null(k)`.

use crate::shape::{FieldKind, ScalarKind};

/// Decides whether a field of the given kind is selected
pub trait KindPredicate {
    fn matches(&self, kind: &FieldKind) -> bool;
}

impl<F> KindPredicate for F
where
    F: Fn(&FieldKind) -> bool,
{
    fn matches(&self, kind: &FieldKind) -> bool {
        self(kind)
    }
}

/// A fixed set of kinds; matches when the field's kind is in the set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindSet(Vec<FieldKind>);

impl KindSet {
    pub fn of(kinds: impl IntoIterator<Item = FieldKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    pub fn with(mut self, kind: FieldKind) -> Self {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
        self
    }
}

impl KindPredicate for KindSet {
    fn matches(&self, kind: &FieldKind) -> bool {
        self.0.contains(kind)
    }
}

pub fn is_string_like(kind: &FieldKind) -> bool {
    *kind == FieldKind::Scalar(ScalarKind::String)
}

pub fn is_number_like(kind: &FieldKind) -> bool {
    *kind == FieldKind::Scalar(ScalarKind::Number)
}

pub fn is_boolean(kind: &FieldKind) -> bool {
    *kind == FieldKind::Scalar(ScalarKind::Boolean)
}

pub fn is_null(kind: &FieldKind) -> bool {
    *kind == FieldKind::Scalar(ScalarKind::Null)
}

pub fn is_reference(kind: &FieldKind) -> bool {
    *kind == FieldKind::Reference
}

pub fn is_temporal(kind: &FieldKind) -> bool {
    *kind == FieldKind::Temporal
}

/// Any array, of leaves or of objects
pub fn is_array(kind: &FieldKind) -> bool {
    kind.is_array()
}

pub fn is_nested_object(kind: &FieldKind) -> bool {
    *kind == FieldKind::NestedObject
}

/// Look up a predicate by name (used by the CLI)
pub fn by_name(name: &str) -> Option<fn(&FieldKind) -> bool> {
    let predicate: fn(&FieldKind) -> bool = match name {
        "string" => is_string_like,
        "number" => is_number_like,
        "boolean" => is_boolean,
        "null" => is_null,
        "ref" | "reference" => is_reference,
        "date" | "temporal" => is_temporal,
        "array" => is_array,
        "object" => is_nested_object,
        _ => return None,
    };
    Some(predicate)
}
