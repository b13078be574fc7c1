// src/ir/dominance.rs
//! Dominance analysis over the block skeleton of a node graph.

use super::graph::Graph;
use super::node::NodeId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use std::collections::HashMap;

/// Immediate-dominator information for the blocks of a graph.
///
/// Computed with the iterative algorithm from "A Simple, Fast Dominance
/// Algorithm" by Keith D. Cooper, Timothy J. Harvey, and Ken Kennedy over
/// a reverse-post-order worklist. Blocks unreachable from the start block
/// get no immediate dominator.
#[derive(Debug, Clone)]
pub struct DominanceInfo {
    idom: HashMap<NodeId, NodeId>,
}

impl DominanceInfo {
    /// Computes immediate dominators for every block reachable from the
    /// start block.
    #[must_use]
    pub fn compute(g: &Graph) -> Self {
        // Petgraph view of the block skeleton, predecessor edges forward.
        let mut view: DiGraph<NodeId, ()> = DiGraph::new();
        let mut index_of: HashMap<NodeId, NodeIndex> = HashMap::new();
        for b in g.live_nodes().filter(|&n| g.is_block(n)) {
            index_of.insert(b, view.add_node(b));
        }
        for (&b, &b_idx) in &index_of {
            for &pred in g.inputs(b) {
                if g.is_bad(pred) {
                    continue;
                }
                if let Some(&pred_idx) = index_of.get(&g.block_of(pred)) {
                    view.add_edge(pred_idx, b_idx, ());
                }
            }
        }

        let entry_idx = index_of[&g.start_block()];

        // Reverse post-order, and the position map the intersection walk
        // keys on.
        let mut post_order = Vec::new();
        let mut dfs = DfsPostOrder::new(&view, entry_idx);
        while let Some(node) = dfs.next(&view) {
            post_order.push(node);
        }
        post_order.reverse();
        let rpo_position: HashMap<NodeIndex, usize> =
            post_order.iter().enumerate().map(|(pos, &node)| (node, pos)).collect();

        let mut idom: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        idom.insert(entry_idx, entry_idx);

        // Iteratively compute immediate dominators.
        let mut changed = true;
        while changed {
            changed = false;
            for &node in post_order.iter().filter(|&&node| node != entry_idx) {
                let preds: Vec<NodeIndex> =
                    view.neighbors_directed(node, petgraph::Direction::Incoming).collect();

                // First predecessor that already has a dominator.
                let Some(&first) = preds.iter().find(|p| idom.contains_key(p)) else {
                    continue;
                };

                let mut new_idom = first;
                for &pred in preds.iter().filter(|&&p| p != first) {
                    if idom.contains_key(&pred) {
                        new_idom = Self::intersect(new_idom, pred, &idom, &rpo_position);
                    }
                }

                if idom.get(&node) != Some(&new_idom) {
                    idom.insert(node, new_idom);
                    changed = true;
                }
            }
        }

        let idom = idom.into_iter().map(|(node, dom)| (view[node], view[dom])).collect();
        Self { idom }
    }

    /// Intersects two dominator paths to find their common ancestor.
    fn intersect(
        node1: NodeIndex, node2: NodeIndex, idom: &HashMap<NodeIndex, NodeIndex>,
        rpo_position: &HashMap<NodeIndex, usize>,
    ) -> NodeIndex {
        let mut finger1 = node1;
        let mut finger2 = node2;
        while finger1 != finger2 {
            while rpo_position[&finger1] > rpo_position[&finger2] {
                finger1 = idom[&finger1];
            }
            while rpo_position[&finger2] > rpo_position[&finger1] {
                finger2 = idom[&finger2];
            }
        }
        finger1
    }

    /// The immediate dominator of `block`. The start block dominates
    /// itself; unreachable blocks have none.
    #[must_use]
    pub fn immediate_dominator(&self, block: NodeId) -> Option<NodeId> {
        self.idom.get(&block).copied()
    }

    /// Checks whether `dominator` dominates `block`.
    #[must_use]
    pub fn dominates(&self, dominator: NodeId, block: NodeId) -> bool {
        let mut current = block;
        while current != dominator {
            match self.idom.get(&current) {
                Some(&up) if up != current => current = up,
                _ => return false,
            }
        }
        true
    }
}
