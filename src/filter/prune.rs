//! Empty branch pruning
//!
//! Filtering can leave nested objects with no fields. Pruning removes them,
//! bottom-up, so a branch that only contained empty branches goes too.

use tracing::debug;

use super::FieldTree;

/// Remove every nested object that is empty once its own children have
/// been pruned. Leaves, arrays and non-empty objects are kept as they are.
pub fn prune_empty<T: FieldTree>(tree: &T) -> T {
    let mut removed = 0usize;
    let pruned = prune_tree(tree, &mut removed);
    if removed > 0 {
        debug!(removed, "pruned empty branches");
    }
    pruned
}

fn prune_tree<T: FieldTree>(tree: &T, removed: &mut usize) -> T {
    let mut kept = Vec::new();
    for (name, entry) in tree.entries() {
        match T::branch(entry) {
            Some(branch) => {
                let pruned = prune_tree(branch, removed);
                if pruned.is_empty_tree() {
                    *removed += 1;
                } else {
                    kept.push((name.to_string(), T::rebranch(entry, pruned)));
                }
            }
            None => kept.push((name.to_string(), entry.clone())),
        }
    }
    T::from_entries(kept)
}

/// Remove top-level fields holding an empty object, without descending
pub fn prune_empty_shallow<T: FieldTree>(tree: &T) -> T {
    let kept = tree
        .entries()
        .into_iter()
        .filter(|(_, entry)| !T::branch(entry).map(|b| b.is_empty_tree()).unwrap_or(false))
        .map(|(name, entry)| (name.to_string(), entry.clone()))
        .collect();
    T::from_entries(kept)
}
