//! proptest strategies for shape trees (test builds only)

use proptest::prelude::*;

use super::{FieldSlot, ObjectShape, ShapeNode};

fn leaf() -> BoxedStrategy<ShapeNode> {
    prop_oneof![
        Just(ShapeNode::string()),
        Just(ShapeNode::number()),
        Just(ShapeNode::boolean()),
        Just(ShapeNode::null()),
        Just(ShapeNode::date()),
        "[A-Z][a-z]{2,6}".prop_map(|target: String| ShapeNode::reference(target)),
    ]
    .boxed()
}

/// Scalars, references, timestamps and flat arrays of them
pub(crate) fn leaf_node() -> BoxedStrategy<ShapeNode> {
    prop_oneof![
        3 => leaf(),
        1 => leaf().prop_map(ShapeNode::array_of),
    ]
    .boxed()
}

fn slot_entries(
    node: BoxedStrategy<ShapeNode>,
) -> impl Strategy<Value = Vec<(String, bool, bool, ShapeNode)>> {
    prop::collection::vec(("[a-z]{1,6}", any::<bool>(), any::<bool>(), node), 0..6)
}

fn build(entries: Vec<(String, bool, bool, ShapeNode)>) -> ObjectShape {
    entries
        .into_iter()
        .map(|(name, optional, nullable, node)| (name, FieldSlot { node, optional, nullable }))
        .collect()
}

/// Any legal node, including nested objects and arrays of objects
pub(crate) fn shape_node() -> BoxedStrategy<ShapeNode> {
    leaf_node()
        .prop_recursive(3, 48, 6, |inner| {
            let object = slot_entries(inner).prop_map(build).boxed();
            prop_oneof![
                2 => object.clone().prop_map(ShapeNode::Object),
                1 => object.prop_map(|o| ShapeNode::array_of(ShapeNode::Object(o))),
            ]
        })
        .boxed()
}

pub(crate) fn object_shape() -> BoxedStrategy<ObjectShape> {
    slot_entries(shape_node()).prop_map(build).boxed()
}
