//! Pre-pass collection: one whole-graph walk gathering everything the
//! rest of the optimization needs.

use crate::ir::{Graph, NodeId, NodeKind, walk_graph};
use std::collections::{HashMap, HashSet};

/// Side tables built by [`collect`].
///
/// A block is *removable* while it is known to contain nothing but Phi
/// and Jmp nodes and to carry no entity. The flag is transient pass
/// state: the block optimizer demotes further blocks while it decides
/// which predecessors may fold.
#[derive(Debug, Default)]
pub struct Collection {
    phi_lists: HashMap<NodeId, Vec<NodeId>>,
    proj_lists: HashMap<NodeId, Vec<NodeId>>,
    non_removable: HashSet<NodeId>,
    switch_conds: Vec<NodeId>,
}

impl Collection {
    #[must_use]
    pub fn is_removable(&self, block: NodeId) -> bool {
        !self.non_removable.contains(&block)
    }

    pub fn mark_non_removable(&mut self, block: NodeId) {
        self.non_removable.insert(block);
    }

    /// Phi nodes owned by `block`, in collection order.
    #[must_use]
    pub fn phis_of(&self, block: NodeId) -> &[NodeId] {
        self.phi_lists.get(&block).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_phis(&self, block: NodeId) -> bool {
        self.phi_lists.get(&block).is_some_and(|phis| !phis.is_empty())
    }

    /// Splices a hoisted Phi onto its new block's list.
    pub fn add_phi(&mut self, block: NodeId, phi: NodeId) {
        self.phi_lists.entry(block).or_default().push(phi);
    }

    /// Proj children of a multi-output producer, in collection order.
    #[must_use]
    pub fn projs_of(&self, producer: NodeId) -> &[NodeId] {
        self.proj_lists.get(&producer).map_or(&[], Vec::as_slice)
    }

    /// All collected multi-way Conds.
    #[must_use]
    pub fn switch_conds(&self) -> &[NodeId] {
        &self.switch_conds
    }
}

/// Walks every node reachable from End once and builds the side tables:
/// Phi lists per block, Proj lists per producer, tentative removability
/// of each block, and the set of switch Conds.
///
/// Blocks start out removable; a block containing any node other than
/// Phi and Jmp, or carrying an entity, is demoted. A Cond whose selector
/// has a non-Boolean data mode is a switch.
#[must_use]
pub fn collect(g: &Graph) -> Collection {
    let mut collection = Collection::default();
    walk_graph(g, |g, n| match g.kind(n) {
        NodeKind::Phi => {
            collection.phi_lists.entry(g.block_of(n)).or_default().push(n);
        }
        NodeKind::Block { entity } => {
            if entity.is_some() {
                collection.non_removable.insert(n);
            }
        }
        NodeKind::Jmp => {}
        NodeKind::Proj { .. } => {
            collection.proj_lists.entry(g.input(n, 0)).or_default().push(n);
            collection.non_removable.insert(g.block_of(n));
        }
        _ => {
            collection.non_removable.insert(g.block_of(n));
            if g.is_cond(n) && g.mode(g.input(n, 0)).is_switch_selector() {
                collection.switch_conds.push(n);
            }
        }
    });
    collection
}
