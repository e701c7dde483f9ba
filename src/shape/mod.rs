//! Domain-Model Shapes
//!
//! A shape is the structural description of a domain model: scalars,
//! references to other entities, timestamps, arrays and nested objects.
//! Optionality lives on the field slot, not on the node, so the same
//! node can appear both as a required and as an optional member.
//!
//! Shapes are immutable values. Every transformation in this crate
//! (derive, normalize, filter, prune) returns a fresh tree.

pub mod classify;
pub mod loader;
pub mod normalize;

#[cfg(test)]
pub(crate) mod strategy;

pub use classify::{classify, classify_at, FieldKind, LeafKind};
pub use loader::{
    load_document, parse_document, parse_shape, render_document, render_shape, ModelDocument,
};
pub use normalize::{normalize, normalize_deep, require_all_with, strip_absent};

use std::fmt;

// =============================================================================
// Field Paths
// =============================================================================

/// One step on the way from a model root to a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPathSegment {
    /// A named field in an object
    Field(String),
    /// Array element shape
    ArrayItems,
}

impl fmt::Display for FieldPathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{}", name),
            Self::ArrayItems => write!(f, "[]"),
        }
    }
}

/// Path from the model root to a field, rendered as `a.b[].c`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<FieldPathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of a named child field
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(FieldPathSegment::Field(name.to_string()));
        Self(segments)
    }

    /// Path of the element shape of an array field
    pub fn items(&self) -> Self {
        let mut segments = self.0.clone();
        segments.push(FieldPathSegment::ArrayItems);
        Self(segments)
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        let rendered: String = self.0.iter().map(|s| s.to_string()).collect();
        // Drop the separator in front of the first field name
        write!(f, "{}", rendered.strip_prefix('.').unwrap_or(&rendered))
    }
}

// =============================================================================
// Scalars
// =============================================================================

/// Primitive leaf types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

// =============================================================================
// Shape Nodes
// =============================================================================

/// A node in a domain-model shape tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeNode {
    /// Primitive value
    Scalar(ScalarKind),
    /// Identifier of another entity (the target model name)
    Reference(String),
    /// Date / timestamp
    Temporal,
    /// Array of the element shape. Arrays of arrays are not modeled.
    Array(Box<ShapeNode>),
    /// Nested object
    Object(ObjectShape),
}

impl ShapeNode {
    pub fn string() -> Self {
        Self::Scalar(ScalarKind::String)
    }

    pub fn number() -> Self {
        Self::Scalar(ScalarKind::Number)
    }

    pub fn boolean() -> Self {
        Self::Scalar(ScalarKind::Boolean)
    }

    pub fn null() -> Self {
        Self::Scalar(ScalarKind::Null)
    }

    pub fn date() -> Self {
        Self::Temporal
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Self::Reference(target.into())
    }

    pub fn array_of(element: ShapeNode) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn object(shape: ObjectShape) -> Self {
        Self::Object(shape)
    }

    /// Element shape of an array node
    pub fn element(&self) -> Option<&ShapeNode> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Self::Object(shape) => Some(shape),
            _ => None,
        }
    }

    /// `{}` - an object node without any fields
    pub fn is_empty_object(&self) -> bool {
        matches!(self, Self::Object(shape) if shape.is_empty())
    }
}

// =============================================================================
// Field Slots
// =============================================================================

/// A field edge: the node plus how its presence is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub node: ShapeNode,
    /// Key may be omitted (`a?: T`)
    pub optional: bool,
    /// Key is present but the value may be absent (`a: T | Absent`)
    pub nullable: bool,
}

impl FieldSlot {
    pub fn required(node: ShapeNode) -> Self {
        Self { node, optional: false, nullable: false }
    }

    pub fn optional(node: ShapeNode) -> Self {
        Self { node, optional: true, nullable: false }
    }

    pub fn nullable(node: ShapeNode) -> Self {
        Self { node, optional: false, nullable: true }
    }

    /// Both optional encodings count: an omittable key and a present key
    /// whose value may be absent.
    pub fn is_required(&self) -> bool {
        !self.optional && !self.nullable
    }

    pub fn with_node(&self, node: ShapeNode) -> Self {
        Self {
            node,
            optional: self.optional,
            nullable: self.nullable,
        }
    }
}

// =============================================================================
// Object Shapes
// =============================================================================

/// Ordered set of named field slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectShape {
    fields: Vec<(String, FieldSlot)>,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field
    pub fn required(self, name: impl Into<String>, node: ShapeNode) -> Self {
        self.with_slot(name, FieldSlot::required(node))
    }

    /// Add an optional field (`name?: node`)
    pub fn optional(self, name: impl Into<String>, node: ShapeNode) -> Self {
        self.with_slot(name, FieldSlot::optional(node))
    }

    /// Add a present-but-nullable field (`name: node | Absent`)
    pub fn nullable(self, name: impl Into<String>, node: ShapeNode) -> Self {
        self.with_slot(name, FieldSlot::nullable(node))
    }

    /// Add a slot. A slot with an existing name replaces it in place.
    pub fn with_slot(mut self, name: impl Into<String>, slot: FieldSlot) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = slot,
            None => self.fields.push((name, slot)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSlot> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSlot)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldSlot)> for ObjectShape {
    fn from_iter<I: IntoIterator<Item = (String, FieldSlot)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |shape, (name, slot)| shape.with_slot(name, slot))
    }
}
