// src/ir/walk.rs
//! Walkers over the node graph and its block skeleton.

use super::graph::Graph;
use super::node::NodeId;
use std::collections::{HashMap, HashSet};

/// Visits every live node reachable from End exactly once.
///
/// Traversal follows input edges and owning-block references, so the walk
/// crosses block boundaries and reaches the whole control skeleton; the
/// End node's inputs are the keep-alive edges, which keeps otherwise
/// unused nodes in view.
pub fn walk_graph<F>(g: &Graph, mut f: F)
where
    F: FnMut(&Graph, NodeId),
{
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![g.end()];
    while let Some(n) = stack.pop() {
        if g.data(n).is_dead() || !visited.insert(n) {
            continue;
        }
        f(g, n);
        if let Some(b) = g.try_block_of(n) {
            stack.push(b);
        }
        for &input in g.inputs(n) {
            stack.push(input);
        }
    }
}

/// Pre-order walk over blocks, starting at the end block and following
/// control predecessors. Blocks held only by keep-alive edges (infinite
/// loops) are walked after the end block's subtree.
///
/// A block is marked visited *before* `pre` runs and its predecessor list
/// is re-read afterwards, so a callback that rewires the block steers the
/// rest of the walk. The visited set is lent to the callback: the
/// dispensability test of the block optimizer consults it.
pub fn block_walk<F>(g: &mut Graph, mut pre: F)
where
    F: FnMut(&mut Graph, NodeId, &HashSet<NodeId>),
{
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = g
        .end_keepalives()
        .iter()
        .filter(|&&ka| !g.is_bad(ka))
        .map(|&ka| if g.is_block(ka) { ka } else { g.block_of(ka) })
        .collect();
    stack.push(g.end_block());
    while let Some(b) = stack.pop() {
        if g.data(b).is_dead() || visited.contains(&b) {
            continue;
        }
        visited.insert(b);
        pre(g, b, &visited);
        for i in 0..g.arity(b) {
            let pred = g.input(b, i);
            if g.is_bad(pred) {
                continue;
            }
            stack.push(g.block_of(pred));
        }
    }
}

/// Blocks reachable from the start block along forward control edges.
#[must_use]
pub fn reachable_from_start(g: &Graph) -> HashSet<NodeId> {
    let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for b in g.live_nodes().filter(|&n| g.is_block(n)) {
        for &pred in g.inputs(b) {
            if g.is_bad(pred) {
                continue;
            }
            successors.entry(g.block_of(pred)).or_default().push(b);
        }
    }

    let mut reachable: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![g.start_block()];
    while let Some(b) = stack.pop() {
        if !reachable.insert(b) {
            continue;
        }
        if let Some(succs) = successors.get(&b) {
            stack.extend(succs.iter().copied());
        }
    }
    reachable
}
