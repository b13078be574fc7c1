//! Per-block folding of dispensable predecessors: the core of the pass.
//!
//! For each block the optimizer decides which predecessor chains may be
//! folded away, rebuilds the block's Phi input vectors, rescues the Phis
//! of vanishing predecessors, and finally rewrites the block's own
//! control-predecessor vector. Removed blocks and their jumps are
//! bad-replaced.

use super::collector::Collection;
use super::stats::ControlFlowStats;
use crate::ir::{DominanceInfo, Graph, Mode, NodeId};
use std::collections::HashSet;

/// How one predecessor position of the current block is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredClass {
    /// Bad edge: keeps one arity slot, rewritten to a fresh Bad.
    Bad,
    /// Dispensable predecessor block: folded away, its own predecessors
    /// take its place.
    Fold,
    /// Surviving predecessor: kept as is.
    Keep,
}

pub(super) struct BlockOptimizer<'a> {
    collection: &'a mut Collection,
    doms: &'a DominanceInfo,
    stats: &'a mut ControlFlowStats,
    phis_moved: bool,
}

impl<'a> BlockOptimizer<'a> {
    pub(super) fn new(
        collection: &'a mut Collection, doms: &'a DominanceInfo, stats: &'a mut ControlFlowStats,
    ) -> Self {
        Self { collection, doms, stats, phis_moved: false }
    }

    /// Whether any Phi was hoisted out of a removed block; the driver
    /// prunes stale keep-alive edges when so.
    pub(super) const fn phis_moved(&self) -> bool {
        self.phis_moved
    }

    /// Optimizes one block during the pre-order block walk. `visited`
    /// is the walk's own visited set: blocks already rewired must not be
    /// folded again.
    pub(super) fn optimize_block(&mut self, g: &mut Graph, b: NodeId, visited: &HashSet<NodeId>) {
        let arity = g.arity(b);
        let counts: Vec<usize> =
            (0..arity).map(|pos| self.test_whether_dispensable(g, b, pos, visited)).collect();
        let max_preds: usize = counts.iter().sum();

        let classes: Vec<PredClass> = (0..arity).map(|i| classify(g, self.collection, visited, b, i)).collect();
        if !classes.contains(&PredClass::Fold) {
            return;
        }

        let old_preds: Vec<NodeId> = g.inputs(b).to_vec();
        self.rewrite_phis(g, b, &classes, &old_preds, max_preds);
        self.rescue_pred_phis(g, b, &classes, &old_preds, max_preds);
        self.rewrite_block_inputs(g, b, &classes, &old_preds, max_preds);
    }

    /// Dispensability of the predecessor at `pos`: one arity slot for
    /// anything that stays, the predecessor's own arity for a folded
    /// chain.
    ///
    /// A removable predecessor is rejected, and demoted for every later
    /// query, when it closes a self-loop, is entered through an unknown
    /// jump, or violates the disjointness rule: when the block merges
    /// values in Phis, no two folded predecessors may share a grandparent
    /// block and no surviving sibling may itself feed a folded one, or
    /// the merge would lose its last copy insertion point on that path.
    fn test_whether_dispensable(
        &mut self, g: &Graph, b: NodeId, pos: usize, visited: &HashSet<NodeId>,
    ) -> usize {
        let pred = g.input(b, pos);
        if g.is_bad(pred) {
            return 1;
        }
        let predb = g.block_of(pred);
        if !self.collection.is_removable(predb) {
            return 1;
        }
        if predb == b {
            // can't remove self-loops
            self.collection.mark_non_removable(predb);
            return 1;
        }
        if g.is_unknown_jump(pred) {
            self.collection.mark_non_removable(predb);
            return 1;
        }

        if self.collection.has_phis(b) {
            for i in (0..g.arity(b)).filter(|&i| i != pos) {
                let other_pred = g.input(b, i);
                if g.is_bad(other_pred) {
                    continue;
                }
                let other_predb = g.block_of(other_pred);
                let conflict = if self.collection.is_removable(other_predb) && !visited.contains(&other_predb)
                {
                    // Both fold: their predecessors must stay disjoint.
                    parent_blocks(g, other_predb).any(|gp| parent_blocks(g, predb).any(|pp| pp == gp))
                } else {
                    // The sibling survives: it must not itself feed predb.
                    parent_blocks(g, predb).any(|pp| pp == other_predb)
                };
                if conflict {
                    self.collection.mark_non_removable(predb);
                    return 1;
                }
            }
        }

        // Already rewired earlier in this walk; leave it alone.
        if visited.contains(&predb) {
            return 1;
        }
        g.arity(predb)
    }

    /// Rebuilds the input vector of every Phi in `b` against the folded
    /// predecessor layout.
    fn rewrite_phis(
        &mut self, g: &mut Graph, b: NodeId, classes: &[PredClass], old_preds: &[NodeId], max_preds: usize,
    ) {
        let phis: Vec<NodeId> = self.collection.phis_of(b).to_vec();
        for phi in phis {
            let mode = g.mode(phi);
            let mut new_inputs = Vec::with_capacity(max_preds);
            for (i, &class) in classes.iter().enumerate() {
                let value = g.input(phi, i);
                match class {
                    PredClass::Bad => new_inputs.push(g.new_bad(mode)),
                    PredClass::Keep => new_inputs.push(value),
                    PredClass::Fold => {
                        let predb = g.block_of(old_preds[i]);
                        // A Phi living in the vanishing block is merged
                        // away: its inputs thread through directly.
                        let merged_phi = g.is_phi(value) && g.block_of(value) == predb;
                        for j in 0..g.arity(predb) {
                            if g.is_bad(g.input(predb, j)) {
                                new_inputs.push(g.new_bad(mode));
                            } else if merged_phi {
                                new_inputs.push(g.input(value, j));
                            } else {
                                new_inputs.push(value);
                            }
                        }
                    }
                }
            }
            assert_eq!(new_inputs.len(), max_preds, "Phi input count must match the folded block arity");
            if new_inputs.len() == 1 {
                g.exchange(phi, new_inputs[0]);
            } else {
                g.set_inputs(phi, new_inputs);
            }
            self.stats.phis_rewritten += 1;
        }
    }

    /// Deals with the Phis of every vanishing predecessor: without a
    /// surviving dominance frontier they are dead and become Bad; when
    /// the predecessor immediately dominates `b` they are hoisted into
    /// `b`, self-referencing along every control edge that did not flow
    /// through the vanished block.
    fn rescue_pred_phis(
        &mut self, g: &mut Graph, b: NodeId, classes: &[PredClass], old_preds: &[NodeId], max_preds: usize,
    ) {
        for (k, &class) in classes.iter().enumerate() {
            if class != PredClass::Fold {
                continue;
            }
            let predb = g.block_of(old_preds[k]);
            let pred_phis: Vec<NodeId> = self.collection.phis_of(predb).to_vec();
            if pred_phis.is_empty() {
                continue;
            }
            let hoist = self.doms.immediate_dominator(b) == Some(predb);

            for phi in pred_phis {
                if !hoist {
                    // No use of the Phi can be dominated once predb is
                    // gone.
                    let bad = g.new_bad(g.mode(phi));
                    g.exchange(phi, bad);
                    continue;
                }

                let own_inputs: Vec<NodeId> = g.inputs(phi).to_vec();
                let mode = g.mode(phi);
                let mut new_inputs = Vec::with_capacity(max_preds);
                for (i, &class_i) in classes.iter().enumerate() {
                    if i == k {
                        new_inputs.extend(own_inputs.iter().copied());
                        continue;
                    }
                    match class_i {
                        PredClass::Bad => new_inputs.push(g.new_bad(mode)),
                        PredClass::Keep => new_inputs.push(phi),
                        PredClass::Fold => {
                            let predb_i = g.block_of(old_preds[i]);
                            new_inputs.extend(std::iter::repeat_n(phi, g.arity(predb_i)));
                        }
                    }
                }
                assert_eq!(new_inputs.len(), max_preds, "hoisted Phi input count must match the folded block arity");
                g.set_block(phi, b);
                self.collection.add_phi(b, phi);
                if new_inputs.len() == 1 {
                    g.exchange(phi, new_inputs[0]);
                } else {
                    g.set_inputs(phi, new_inputs);
                }
                self.phis_moved = true;
                self.stats.phis_hoisted += 1;
            }
        }
    }

    /// Rebuilds `b`'s control-predecessor vector and detaches the folded
    /// blocks and their jumps.
    fn rewrite_block_inputs(
        &mut self, g: &mut Graph, b: NodeId, classes: &[PredClass], old_preds: &[NodeId], max_preds: usize,
    ) {
        let mut new_preds = Vec::with_capacity(max_preds);
        for (i, &class) in classes.iter().enumerate() {
            let pred = old_preds[i];
            match class {
                PredClass::Bad => new_preds.push(g.new_bad(Mode::Control)),
                PredClass::Keep => new_preds.push(pred),
                PredClass::Fold => {
                    let predb = g.block_of(pred);
                    for j in 0..g.arity(predb) {
                        let grand_pred = g.input(predb, j);
                        if g.is_bad(grand_pred) {
                            new_preds.push(g.new_bad(Mode::Control));
                        } else {
                            new_preds.push(grand_pred);
                        }
                    }
                    let bad_jmp = g.new_bad(Mode::Control);
                    g.exchange(pred, bad_jmp);
                    let bad_block = g.new_bad(Mode::Any);
                    g.exchange(predb, bad_block);
                    self.stats.blocks_removed += 1;
                }
            }
        }
        assert_eq!(new_preds.len(), max_preds, "block input count must match the folded block arity");
        g.set_inputs(b, new_preds);
    }
}

/// Classification of position `i` after the dispensability pass settled
/// the removable flags. Mirrors exactly what `test_whether_dispensable`
/// counted.
fn classify(g: &Graph, collection: &Collection, visited: &HashSet<NodeId>, b: NodeId, i: usize) -> PredClass {
    let pred = g.input(b, i);
    if g.is_bad(pred) {
        return PredClass::Bad;
    }
    let predb = g.block_of(pred);
    if collection.is_removable(predb) && !visited.contains(&predb) {
        PredClass::Fold
    } else {
        PredClass::Keep
    }
}

fn parent_blocks<'g>(g: &'g Graph, b: NodeId) -> impl Iterator<Item = NodeId> + 'g {
    g.inputs(b).iter().copied().filter(|&p| !g.is_bad(p)).map(|p| g.block_of(p))
}
