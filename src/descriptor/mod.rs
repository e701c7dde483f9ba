//! Storage Descriptors
//!
//! A descriptor tree is what a persistence-schema builder consumes: one
//! entry per model field with its storage type and constraints. The tree
//! is isomorphic in topology to the shape it was derived from.
//!
//! `required` is a tri-state. Optional leaves carry no `required` key at
//! all, while structural wrappers (optional nested objects, object arrays)
//! carry an explicit `required: false`. Collapsing the two would change
//! what the schema builder sees.

pub mod derive;
pub mod render;

pub use derive::{derive, DeriveOptions, Deriver, FieldConstraints};
pub use render::render_tree;

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::checksum::Checksum;
use crate::shape::{FieldKind, LeafKind, ScalarKind};

// =============================================================================
// Requirement
// =============================================================================

/// Whether a field must be supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// `required: true`
    Required,
    /// `required: false`
    NotRequired,
    /// No `required` key
    Unspecified,
}

impl Requirement {
    /// Leaf requirement for a slot: present-and-true or absent
    pub fn for_slot(required: bool) -> Self {
        if required {
            Self::Required
        } else {
            Self::Unspecified
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }

    /// Value of the `required` key, if the key exists
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Required => Some(true),
            Self::NotRequired => Some(false),
            Self::Unspecified => None,
        }
    }
}

// =============================================================================
// Defaults and Validators
// =============================================================================

/// Default value for a field: a constant or a thunk evaluated per document
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Thunk(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn thunk(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Thunk(Arc::new(f))
    }

    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Thunk(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Thunk(_) => f.write_str("Thunk(<fn>)"),
        }
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Thunk(a), Self::Thunk(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Field validator: a predicate and the message reported when it fails
#[derive(Clone)]
pub struct Validator {
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    message: String,
}

impl Validator {
    pub fn new(
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("message", &self.message).finish_non_exhaustive()
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.predicate, &other.predicate) && self.message == other.message
    }
}

// =============================================================================
// Field Descriptor
// =============================================================================

/// Storage constraints for one leaf field (or one array element)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub required: Requirement,
    pub unique: Option<bool>,
    pub drop_dups: Option<bool>,
    pub default: Option<DefaultValue>,
    pub validator: Option<Validator>,
    /// Target model; present iff `kind` is `Reference`
    pub reference: Option<String>,
    /// Present iff the field is string-like
    pub trim: Option<bool>,
}

impl FieldDescriptor {
    /// Bare descriptor for a leaf kind
    pub fn new(leaf: LeafKind, required: Requirement) -> Self {
        Self {
            kind: leaf.into(),
            required,
            unique: None,
            drop_dups: None,
            default: None,
            validator: None,
            reference: None,
            trim: None,
        }
    }

    /// Storage type name understood by the schema builder
    pub fn storage_type(&self) -> &'static str {
        match self.kind.leaf() {
            Some(LeafKind::Scalar(ScalarKind::String)) => "String",
            Some(LeafKind::Scalar(ScalarKind::Number)) => "Number",
            Some(LeafKind::Scalar(ScalarKind::Boolean)) => "Boolean",
            Some(LeafKind::Scalar(ScalarKind::Null)) => "Null",
            Some(LeafKind::Reference) => "ObjectId",
            Some(LeafKind::Temporal) => "Date",
            None => "Mixed",
        }
    }
}

// =============================================================================
// Descriptor Tree
// =============================================================================

/// One entry of a descriptor tree
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorNode {
    /// Scalar, reference or timestamp leaf
    Field(FieldDescriptor),
    /// Array of leaves: `[descriptor]`
    FieldArray(FieldDescriptor),
    /// Required nested object: the bare nested tree
    Nested(DescriptorTree),
    /// Optional nested object: `{ type: tree, required: false }`
    OptionalNested(DescriptorTree),
    /// Array of objects: `{ type: [tree], required: false }`
    ObjectArray(DescriptorTree),
}

impl DescriptorNode {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Field(fd) => fd.kind,
            Self::FieldArray(fd) => match fd.kind.leaf() {
                Some(leaf) => FieldKind::ArrayOfScalar(leaf),
                None => fd.kind,
            },
            Self::Nested(_) | Self::OptionalNested(_) => FieldKind::NestedObject,
            Self::ObjectArray(_) => FieldKind::ArrayOfObject,
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Self::Field(fd) | Self::FieldArray(fd) => fd.required,
            Self::Nested(_) => Requirement::Unspecified,
            Self::OptionalNested(_) | Self::ObjectArray(_) => Requirement::NotRequired,
        }
    }

    /// Nested object tree (not the element tree of an object array)
    pub fn nested(&self) -> Option<&DescriptorTree> {
        match self {
            Self::Nested(tree) | Self::OptionalNested(tree) => Some(tree),
            _ => None,
        }
    }

    /// Same wrapper around a different nested tree
    pub fn with_nested(&self, tree: DescriptorTree) -> Self {
        match self {
            Self::Nested(_) => Self::Nested(tree),
            Self::OptionalNested(_) => Self::OptionalNested(tree),
            Self::ObjectArray(_) => Self::ObjectArray(tree),
            leaf => leaf.clone(),
        }
    }

    pub fn as_field(&self) -> Option<&FieldDescriptor> {
        match self {
            Self::Field(fd) | Self::FieldArray(fd) => Some(fd),
            _ => None,
        }
    }
}

/// Ordered mapping from field name to descriptor node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorTree {
    fields: Vec<(String, DescriptorNode)>,
}

impl DescriptorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, node: DescriptorNode) -> Self {
        self.insert(name.into(), node);
        self
    }

    pub(crate) fn insert(&mut self, name: String, node: DescriptorNode) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = node,
            None => self.fields.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DescriptorNode> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Follow a dotted path through nested objects (`a.b.c`)
    pub fn lookup(&self, path: &str) -> Option<&DescriptorNode> {
        let mut parts = path.split('.');
        let mut node = self.get(parts.next()?)?;
        for part in parts {
            node = match node {
                DescriptorNode::ObjectArray(tree) => tree.get(part)?,
                other => other.nested()?.get(part)?,
            };
        }
        Some(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorNode)> {
        self.fields.iter().map(|(n, node)| (n.as_str(), node))
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

    /// JSON layout consumed by the schema builder
    pub fn to_json(&self) -> Value {
        render_tree(self)
    }

    /// Fingerprint of the rendered tree
    pub fn checksum(&self) -> Checksum {
        Checksum::from_json(&self.to_json())
    }
}

impl FromIterator<(String, DescriptorNode)> for DescriptorTree {
    fn from_iter<I: IntoIterator<Item = (String, DescriptorNode)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (name, node) in iter {
            tree.insert(name, node);
        }
        tree
    }
}
