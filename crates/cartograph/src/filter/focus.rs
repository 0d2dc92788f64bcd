//! Depth-limited neighborhood focus.
//!
//! Given a focal node and a hop budget, everything outside the BFS
//! neighborhood is hidden. Hop 0 is just the focal node. Focus is
//! independent of the other filter facilities and typically composed on
//! top of them.

use std::collections::{HashSet, VecDeque};

use crate::builder::PositionedGraph;
use crate::error::{Error, Result};

/// Node ids within `hops` of the focal node, in either edge direction.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `focal_id` is not in the graph.
pub fn focus_set(graph: &PositionedGraph, focal_id: &str, hops: u32) -> Result<HashSet<String>> {
    let focal = graph
        .node_index(focal_id)
        .ok_or_else(|| Error::NodeNotFound(focal_id.to_string()))?;

    let mut visible: HashSet<usize> = HashSet::new();
    visible.insert(focal);
    let mut queue: VecDeque<(usize, u32)> = VecDeque::new();
    queue.push_back((focal, 0));

    while let Some((index, depth)) = queue.pop_front() {
        if depth == hops {
            continue;
        }
        for &neighbor in graph.neighbors(index) {
            if visible.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    Ok(visible
        .into_iter()
        .map(|i| graph.node(i).node.id.clone())
        .collect())
}
