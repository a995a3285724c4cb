//! Tree operations over an element forest.
//!
//! Every mutation here is pure: it borrows the input forest and returns a
//! new one. A target id that is not present is never an error; the output
//! is then structurally equal to the input.
//!
//! Update, remove and insert-child share one traversal ([`rebuild`]) that
//! walks the forest depth-first and asks a per-node policy what to do with
//! the node whose id matches. Reorder works one level up, on sibling
//! groups, and has its own traversal ([`rebuild_level`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{Element, Props};

/// Direction for [`reorder_sibling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Traversals
// ---------------------------------------------------------------------------

/// Depth-first rebuild of `forest`.
///
/// A node whose id equals `id` is replaced by whatever `on_match` returns
/// (`None` drops it). Any other node is kept, with its children rebuilt
/// recursively if it has any.
fn rebuild<F>(forest: &[Element], id: &str, on_match: &F) -> Vec<Element>
where
    F: Fn(&Element) -> Option<Element>,
{
    forest
        .iter()
        .filter_map(|node| {
            if node.id == id {
                on_match(node)
            } else {
                Some(match &node.children {
                    Some(children) => node.with_children(rebuild(children, id, on_match)),
                    None => node.clone(),
                })
            }
        })
        .collect()
}

/// Depth-first search for the first sibling group containing `id`.
///
/// When found, `on_group` rewrites that group (given the index of the
/// target) and the rewritten forest is returned. Descendants of the
/// group's members are not searched once the containing level is found.
fn rebuild_level<F>(siblings: &[Element], id: &str, on_group: &F) -> Option<Vec<Element>>
where
    F: Fn(&[Element], usize) -> Vec<Element>,
{
    if let Some(index) = siblings.iter().position(|node| node.id == id) {
        return Some(on_group(siblings, index));
    }

    siblings.iter().enumerate().find_map(|(i, node)| {
        let children = node.children.as_deref()?;
        let rebuilt = rebuild_level(children, id, on_group)?;
        let mut out = siblings.to_vec();
        out[i] = node.with_children(rebuilt);
        Some(out)
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Find an element anywhere in the forest (pre-order, first match).
pub fn find<'a>(forest: &'a [Element], id: &str) -> Option<&'a Element> {
    forest.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            node.children.as_deref().and_then(|children| find(children, id))
        }
    })
}

/// Total number of elements in the forest, all depths.
pub fn count(forest: &[Element]) -> usize {
    forest
        .iter()
        .map(|node| 1 + node.children.as_deref().map_or(0, count))
        .sum()
}

/// Every element id in the forest, pre-order.
pub fn collect_ids(forest: &[Element]) -> Vec<&str> {
    let mut ids = Vec::new();
    collect_into(forest, &mut ids);
    ids
}

fn collect_into<'a>(forest: &'a [Element], ids: &mut Vec<&'a str>) {
    for node in forest {
        ids.push(node.id.as_str());
        if let Some(children) = &node.children {
            collect_into(children, ids);
        }
    }
}

/// Ids that occur more than once across all the given forests.
///
/// Returned in first-repeat order, each id at most once.
pub fn duplicate_ids<'a, I>(forests: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [Element]>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for forest in forests {
        for id in collect_ids(forest) {
            if !seen.insert(id) && reported.insert(id) {
                duplicates.push(id.to_string());
            }
        }
    }
    duplicates
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Shallow-merge `patch` into the props of the element with `id`.
pub fn update_props(forest: &[Element], id: &str, patch: &Props) -> Vec<Element> {
    rebuild(forest, id, &|node| Some(node.with_merged_props(patch)))
}

/// Remove the element with `id` (and its subtree) from the forest.
pub fn remove(forest: &[Element], id: &str) -> Vec<Element> {
    rebuild(forest, id, &|_| None)
}

/// Append `element` to the children of the element with `container_id`.
pub fn insert_child(forest: &[Element], container_id: &str, element: &Element) -> Vec<Element> {
    rebuild(forest, container_id, &|node| {
        let mut children = node.child_slice().to_vec();
        children.push(element.clone());
        Some(node.with_children(children))
    })
}

/// Swap the element with `id` with its neighbour in `direction`.
///
/// Moving the first sibling up or the last sibling down returns the
/// forest unchanged.
pub fn reorder_sibling(forest: &[Element], id: &str, direction: Direction) -> Vec<Element> {
    rebuild_level(forest, id, &|siblings, index| {
        let mut out = siblings.to_vec();
        match direction {
            Direction::Up if index > 0 => out.swap(index, index - 1),
            Direction::Down if index + 1 < out.len() => out.swap(index, index + 1),
            _ => {}
        }
        out
    })
    .unwrap_or_else(|| forest.to_vec())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
