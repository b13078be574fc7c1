// src/ir/verifier.rs
//! Structural verification of graphs.

use super::graph::Graph;
use super::node::NodeId;
use super::walk::walk_graph;
use crate::error::IrError;
use std::collections::HashSet;

/// Verifies the structural invariants of the live graph reachable from
/// End.
///
/// Checks performed:
/// - no reachable node references a tombstoned node;
/// - every Phi's arity equals its owning block's arity;
/// - block inputs are control-mode producers or Bad;
/// - every reachable Cond still has at least two live Proj successors.
///
/// # Errors
///
/// Returns the first violated invariant as an [`IrError`].
pub fn verify(g: &Graph) -> Result<(), IrError> {
    let mut reachable: Vec<NodeId> = Vec::new();
    walk_graph(g, |_, n| reachable.push(n));
    let reachable_set: HashSet<NodeId> = reachable.iter().copied().collect();

    for &n in &reachable {
        for &input in g.inputs(n) {
            if g.data(input).is_dead() {
                return Err(IrError::DanglingTombstone { node: input, user: n });
            }
        }

        if g.is_phi(n) {
            let block = g.block_of(n);
            if g.arity(n) != g.arity(block) {
                return Err(IrError::PhiArityMismatch {
                    phi: n,
                    block,
                    phi_arity: g.arity(n),
                    block_arity: g.arity(block),
                });
            }
        } else if g.is_block(n) {
            for &pred in g.inputs(n) {
                if !g.is_bad(pred) && !g.mode(pred).is_control() {
                    return Err(IrError::NonControlPred { block: n, pred });
                }
            }
        } else if g.is_cond(n) {
            let live = reachable_set.iter().filter(|&&u| g.is_proj(u) && g.input(u, 0) == n).count();
            if live < 2 {
                return Err(IrError::DegenerateCond { cond: n, live });
            }
        }
    }
    Ok(())
}
