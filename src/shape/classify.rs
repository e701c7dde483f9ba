//! Field Kind Classification
//!
//! Determines WHAT a field is before anything is derived or filtered from
//! it. Classification is a closed case analysis over [`ShapeNode`]: adding
//! a node variant without a rule here does not compile.
//!
//! Priority order:
//! 1. Reference
//! 2. Temporal
//! 3. Array of reference / temporal / scalar -> `ArrayOfScalar`
//! 4. Array of object -> `ArrayOfObject`
//! 5. Scalar
//! 6. Object -> `NestedObject`

use crate::error::{Result, SchemaError};

use super::{FieldPath, ScalarKind, ShapeNode};

/// Kind of a single array element that is not an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Scalar(ScalarKind),
    Reference,
    Temporal,
}

/// Classification of a field's declared shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Reference,
    Temporal,
    /// Array of scalars, references or timestamps
    ArrayOfScalar(LeafKind),
    ArrayOfObject,
    NestedObject,
}

impl FieldKind {
    /// Leaf kind for non-array, non-object kinds
    pub fn leaf(&self) -> Option<LeafKind> {
        match self {
            Self::Scalar(s) => Some(LeafKind::Scalar(*s)),
            Self::Reference => Some(LeafKind::Reference),
            Self::Temporal => Some(LeafKind::Temporal),
            Self::ArrayOfScalar(_) | Self::ArrayOfObject | Self::NestedObject => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::ArrayOfScalar(_) | Self::ArrayOfObject)
    }

    /// Short name used in logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Reference => "reference",
            Self::Temporal => "temporal",
            Self::ArrayOfScalar(_) => "array_of_scalar",
            Self::ArrayOfObject => "array_of_object",
            Self::NestedObject => "nested_object",
        }
    }
}

impl From<LeafKind> for FieldKind {
    fn from(leaf: LeafKind) -> Self {
        match leaf {
            LeafKind::Scalar(s) => Self::Scalar(s),
            LeafKind::Reference => Self::Reference,
            LeafKind::Temporal => Self::Temporal,
        }
    }
}

/// Classify a node found at the model root
pub fn classify(node: &ShapeNode) -> Result<FieldKind> {
    classify_at(&FieldPath::root(), node)
}

/// Classify a node, reporting `path` if it cannot be classified
pub fn classify_at(path: &FieldPath, node: &ShapeNode) -> Result<FieldKind> {
    let kind = match node {
        ShapeNode::Reference(_) => FieldKind::Reference,
        ShapeNode::Temporal => FieldKind::Temporal,
        ShapeNode::Array(element) => match element.as_ref() {
            ShapeNode::Reference(_) => FieldKind::ArrayOfScalar(LeafKind::Reference),
            ShapeNode::Temporal => FieldKind::ArrayOfScalar(LeafKind::Temporal),
            ShapeNode::Object(_) => FieldKind::ArrayOfObject,
            ShapeNode::Scalar(s) => FieldKind::ArrayOfScalar(LeafKind::Scalar(*s)),
            ShapeNode::Array(_) => {
                return Err(SchemaError::unsupported(
                    path.items(),
                    "arrays of arrays are not supported",
                ));
            }
        },
        ShapeNode::Scalar(s) => FieldKind::Scalar(*s),
        ShapeNode::Object(_) => FieldKind::NestedObject,
    };
    Ok(kind)
}
