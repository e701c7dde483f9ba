//! Familiar Shapes
//!
//! Derives storage-schema descriptors from domain-model shapes and slices
//! shape or descriptor trees by the kind of their fields.
//!
//! ## Features
//!
//! - **Derivation**: one descriptor tree per model shape, with required,
//!   unique, default, validator, reference and trim constraints
//! - **Normalization**: optional keys and nullable values folded into one
//!   explicit "may be absent" encoding
//! - **Kind Filters**: pick/omit fields by kind, shallow or deep
//! - **Pruning**: removal of branches left empty by filtering
//!
//! ## Architecture
//!
//! ```text
//! shape document ──loader──> ObjectShape ──normalize──> ObjectShape
//!                                │
//!                    classify ───┤
//!                                ▼
//!                             derive ──> DescriptorTree ──render──> JSON
//!
//! ObjectShape | DescriptorTree ──pick/omit──> ──prune_empty──>
//! ```
//!
//! ```
//! use familiar_shapes::{derive, ObjectShape, ShapeNode};
//!
//! let shape = ObjectShape::new()
//!     .required("a", ShapeNode::string())
//!     .optional("b", ShapeNode::string());
//! let tree = derive(&shape).unwrap();
//! let json = tree.to_json();
//! assert_eq!(json["a"]["required"], true);
//! assert!(json["b"].get("required").is_none());
//! ```

pub mod checksum;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod shape;
pub mod version;

pub use checksum::Checksum;
pub use config::ShapesConfig;
pub use descriptor::{
    derive, DefaultValue, DeriveOptions, Deriver, DescriptorNode, DescriptorTree, FieldConstraints,
    FieldDescriptor, Requirement, Validator,
};
pub use error::{Result, SchemaError};
pub use filter::{
    common_fields, keys_not_of_kind, keys_of_kind, omit_by_kind, omit_by_kind_deep, pick_by_kind,
    pick_by_kind_deep, prune_empty, prune_empty_shallow, FieldTree, KindPredicate,
};
pub use shape::{
    classify, normalize, normalize_deep, FieldKind, FieldPath, FieldSlot, LeafKind, ModelDocument,
    ObjectShape, ScalarKind, ShapeNode,
};
pub use version::ModelVersion;
