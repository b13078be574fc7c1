//! Unreachable-code cleanup run between fixpoint iterations.

use crate::ir::{Graph, Mode, NodeId, reachable_from_start};

/// Bad-replaces every control edge into a live block whose producer sits
/// in a block with no path from Start, together with the aligned Phi
/// inputs. Returns the number of edges pruned.
///
/// Switch simplification bad-replaces Proj edges; whole chains of blocks
/// can lose their last path from Start while still pointing into live
/// code. Cutting those edges here lets the next collection see their
/// targets as they really are.
pub fn remove_unreachable_code(g: &mut Graph) -> usize {
    let reachable = reachable_from_start(g);
    let blocks: Vec<NodeId> = g
        .live_nodes()
        .filter(|&n| g.is_block(n) && reachable.contains(&n))
        .collect();

    let mut pruned = 0;
    for b in blocks {
        let dead_positions: Vec<usize> = (0..g.arity(b))
            .filter(|&i| {
                let pred = g.input(b, i);
                !g.is_bad(pred) && !reachable.contains(&g.block_of(pred))
            })
            .collect();
        if dead_positions.is_empty() {
            continue;
        }

        let phis: Vec<NodeId> =
            g.live_nodes().filter(|&n| g.is_phi(n) && g.try_block_of(n) == Some(b)).collect();

        for &i in &dead_positions {
            let bad = g.new_bad(Mode::Control);
            g.set_input(b, i, bad);
            for &phi in &phis {
                let bad_value = g.new_bad(g.mode(phi));
                g.set_input(phi, i, bad_value);
            }
            pruned += 1;
        }
    }
    pruned
}
