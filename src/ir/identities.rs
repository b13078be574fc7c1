// src/ir/identities.rs
//! Local peephole identities for single nodes.

use super::graph::Graph;
use super::node::{NodeId, NodeKind};

/// Returns a node equivalent to `n`, or `n` itself when no local identity
/// applies. Callers decide whether to `exchange` the result in.
#[must_use]
pub fn equivalent_node(g: &Graph, n: NodeId) -> NodeId {
    match g.kind(n) {
        NodeKind::Block { .. } => equivalent_block(g, n),
        NodeKind::Phi => equivalent_phi(g, n),
        _ => n,
    }
}

/// Straightening: a single-entry block whose one predecessor is a Jmp
/// merges into the producing block. Labeled blocks, the start block and
/// blocks still holding Phis keep their identity.
fn equivalent_block(g: &Graph, b: NodeId) -> NodeId {
    if g.block_entity(b).is_some() || g.arity(b) != 1 {
        return b;
    }
    let pred = g.input(b, 0);
    if g.is_bad(pred) || !g.is_jmp(pred) {
        return b;
    }
    let pred_block = g.block_of(pred);
    if pred_block == b || pred_block == g.start_block() {
        return b;
    }
    if block_owns_phi(g, b) {
        return b;
    }
    pred_block
}

/// A Phi whose inputs, ignoring self-references and Bads, name exactly
/// one distinct value is that value.
fn equivalent_phi(g: &Graph, phi: NodeId) -> NodeId {
    let mut unique = None;
    for &input in g.inputs(phi) {
        if input == phi || g.is_bad(input) {
            continue;
        }
        match unique {
            None => unique = Some(input),
            Some(seen) if seen == input => {}
            Some(_) => return phi,
        }
    }
    unique.unwrap_or(phi)
}

fn block_owns_phi(g: &Graph, b: NodeId) -> bool {
    g.live_nodes().any(|n| g.is_phi(n) && g.try_block_of(n) == Some(b))
}
