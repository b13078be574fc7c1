//! Simplification of degenerate multi-way branches.

use super::collector::Collection;
use super::stats::ControlFlowStats;
use crate::ir::{Graph, Mode, NodeId};

/// Runs [`handle_switch_cond`] over every collected switch. Returns true
/// if any switch was rewritten.
pub(super) fn simplify_switches(
    g: &mut Graph, collection: &Collection, stats: &mut ControlFlowStats,
) -> bool {
    let mut changed = false;
    for &cond in collection.switch_conds() {
        changed |= handle_switch_cond(g, collection, cond, stats);
    }
    changed
}

/// Rewrites one switch Cond when it has degenerated:
///
/// 1. Only the default case remains (every live Proj carries the default
///    case number): the first such Proj becomes an unconditional Jmp in
///    the Cond's block, the rest become Bad.
/// 2. Exactly two Projs and a compile-time constant selector: the Proj
///    whose case number matches the selector (or the default Proj when
///    none does) becomes a Jmp, the other becomes Bad.
///
/// Reducing a switch to a Jmp may leave its block with nothing but that
/// Jmp, which is why the driver loops back to a fresh collection.
fn handle_switch_cond(
    g: &mut Graph, collection: &Collection, cond: NodeId, stats: &mut ControlFlowStats,
) -> bool {
    let projs: Vec<NodeId> = collection.projs_of(cond).to_vec();
    if projs.is_empty() {
        return false;
    }
    let default_case = g.cond_default(cond).expect("switch set holds only Conds");
    let block = g.block_of(cond);

    if projs.iter().all(|&p| g.proj_num(p) == Some(default_case)) {
        convert_to_jmp(g, block, projs[0], &projs[1..]);
        stats.switches_simplified += 1;
        return true;
    }

    if projs.len() == 2
        && let Some(value) = g.const_value(g.input(cond, 0))
    {
        let matching = u64::try_from(value)
            .ok()
            .and_then(|v| projs.iter().copied().find(|&p| g.proj_num(p) == Some(v)));
        let taken = matching
            .or_else(|| projs.iter().copied().find(|&p| g.proj_num(p) == Some(default_case)));
        if let Some(taken) = taken {
            let dead: Vec<NodeId> = projs.iter().copied().filter(|&p| p != taken).collect();
            convert_to_jmp(g, block, taken, &dead);
            stats.switches_simplified += 1;
            return true;
        }
    }

    false
}

fn convert_to_jmp(g: &mut Graph, block: NodeId, taken: NodeId, dead: &[NodeId]) {
    let jmp = g.new_jmp(block);
    g.exchange(taken, jmp);
    for &proj in dead {
        let bad = g.new_bad(Mode::Control);
        g.exchange(proj, bad);
    }
}
