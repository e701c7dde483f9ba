//! Schema Descriptor Derivation
//!
//! Walks a model shape and produces the storage descriptor tree, consuming
//! the field kind from the classifier at every node:
//!
//! | kind             | required slot          | optional slot                      |
//! |------------------|------------------------|------------------------------------|
//! | scalar/ref/date  | `Field` + required     | `Field`, no required key           |
//! | array of leaves  | `FieldArray` + required| `FieldArray`, no required key      |
//! | nested object    | `Nested(tree)`         | `OptionalNested(tree)`             |
//! | array of objects | `ObjectArray(tree)`    | `ObjectArray(tree)`                |
//!
//! Object arrays are nullable containers in the storage layer, so the array
//! itself is never required; element-level flags live in the element tree.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};
use crate::shape::{classify_at, FieldKind, FieldPath, LeafKind, ObjectShape, ScalarKind, ShapeNode};

use super::{DefaultValue, DescriptorNode, DescriptorTree, FieldDescriptor, Requirement, Validator};

/// Storage constraints supplied by the caller for one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    pub unique: Option<bool>,
    pub drop_dups: Option<bool>,
    pub default: Option<DefaultValue>,
    pub validator: Option<Validator>,
    pub trim: Option<bool>,
}

impl FieldConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn drop_dups(mut self, drop_dups: bool) -> Self {
        self.drop_dups = Some(drop_dups);
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }
}

/// Options for derivation
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// Field names skipped at every object level (storage-assigned keys)
    pub excluded_fields: Vec<String>,
    /// `trim` value for string fields without an explicit constraint
    pub trim_strings: bool,
    /// Constraints keyed by field path (`a.b`, `items[].name`)
    pub constraints: HashMap<String, FieldConstraints>,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            excluded_fields: vec!["_id".to_string()],
            trim_strings: false,
            constraints: HashMap::new(),
        }
    }
}

impl DeriveOptions {
    pub fn constrain(mut self, path: impl Into<String>, constraints: FieldConstraints) -> Self {
        self.constraints.insert(path.into(), constraints);
        self
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded_fields.push(name.into());
        self
    }

    pub fn trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }
}

/// Derive a descriptor tree with default options
pub fn derive(shape: &ObjectShape) -> Result<DescriptorTree> {
    Deriver::new().derive(shape)
}

/// Derives storage descriptor trees from model shapes
#[derive(Debug, Clone, Default)]
pub struct Deriver {
    options: DeriveOptions,
}

impl Deriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DeriveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DeriveOptions {
        &self.options
    }

    /// Derive the descriptor tree for `shape`. Either the whole tree is
    /// returned or the first unsupported field is reported.
    pub fn derive(&self, shape: &ObjectShape) -> Result<DescriptorTree> {
        let mut used = HashSet::new();
        let tree = self.derive_object(shape, &FieldPath::root(), &mut used)?;

        for path in self.options.constraints.keys().filter(|p| !used.contains(*p)) {
            warn!(path = %path, "constraints supplied for a path with no leaf field");
        }

        debug!(fields = tree.len(), "derived descriptor tree");
        Ok(tree)
    }

    fn derive_object(
        &self,
        shape: &ObjectShape,
        path: &FieldPath,
        used: &mut HashSet<String>,
    ) -> Result<DescriptorTree> {
        let mut tree = DescriptorTree::new();

        for (name, slot) in shape.iter() {
            if self.options.excluded_fields.iter().any(|f| f == name) {
                continue;
            }

            let field_path = path.field(name);
            let required = slot.is_required();

            let node = match (classify_at(&field_path, &slot.node)?, &slot.node) {
                (FieldKind::NestedObject, ShapeNode::Object(inner)) => {
                    let nested = self.derive_object(inner, &field_path, used)?;
                    if required {
                        DescriptorNode::Nested(nested)
                    } else {
                        DescriptorNode::OptionalNested(nested)
                    }
                }
                (FieldKind::ArrayOfObject, ShapeNode::Array(element)) => match element.as_ref() {
                    ShapeNode::Object(inner) => {
                        DescriptorNode::ObjectArray(self.derive_object(inner, &field_path.items(), used)?)
                    }
                    other => return Err(mismatch(&field_path, other)),
                },
                (FieldKind::ArrayOfScalar(leaf), ShapeNode::Array(element)) => {
                    let fd = self.leaf_descriptor(&field_path, leaf, element, required, used)?;
                    DescriptorNode::FieldArray(fd)
                }
                (kind, node) => match kind.leaf() {
                    Some(leaf) => {
                        DescriptorNode::Field(self.leaf_descriptor(&field_path, leaf, node, required, used)?)
                    }
                    None => return Err(mismatch(&field_path, node)),
                },
            };

            tree.insert(name.to_string(), node);
        }

        Ok(tree)
    }

    fn leaf_descriptor(
        &self,
        path: &FieldPath,
        leaf: LeafKind,
        node: &ShapeNode,
        required: bool,
        used: &mut HashSet<String>,
    ) -> Result<FieldDescriptor> {
        if leaf == LeafKind::Scalar(ScalarKind::Null) {
            return Err(SchemaError::unsupported(path, "null-typed fields have no storage type"));
        }

        let key = path.to_string();
        let constraints = match self.options.constraints.get(&key) {
            Some(found) => {
                used.insert(key);
                found.clone()
            }
            None => FieldConstraints::default(),
        };

        let mut fd = FieldDescriptor::new(leaf, Requirement::for_slot(required));
        fd.unique = constraints.unique;
        fd.drop_dups = constraints.drop_dups;
        fd.default = constraints.default;
        fd.validator = constraints.validator;

        if let ShapeNode::Reference(target) = node {
            fd.reference = Some(target.clone());
        }

        if leaf == LeafKind::Scalar(ScalarKind::String) {
            fd.trim = Some(constraints.trim.unwrap_or(self.options.trim_strings));
        } else if constraints.trim.is_some() {
            warn!(path = %path, "trim ignored on a field that is not string-like");
        }

        Ok(fd)
    }
}

/// Classification and node disagree; only reachable if the classifier
/// rules and this match drift apart.
fn mismatch(path: &FieldPath, node: &ShapeNode) -> SchemaError {
    SchemaError::unsupported(path, format!("cannot derive a descriptor for {:?}", node))
}
