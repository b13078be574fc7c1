//! Statistics and diagnostics for the control-flow optimization.

use std::fmt;
use std::fmt::Write;

/// Statistics collected during one control-flow optimization run.
///
/// Provides metrics about the optimization's effectiveness: how many
/// blocks were folded away, how many switches degenerated to jumps, how
/// much Phi surgery the rewiring required, and how many fixpoint
/// iterations the driver needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFlowStats {
    /// Blocks folded into their successors (dispensable predecessors and
    /// straightened single-entry blocks).
    pub blocks_removed: usize,

    /// Switch Conds rewritten into unconditional jumps.
    pub switches_simplified: usize,

    /// Control edges into live blocks that were bad-replaced because
    /// their producer became unreachable.
    pub edges_pruned: usize,

    /// Phi nodes whose input vectors were rebuilt during block folding.
    pub phis_rewritten: usize,

    /// Phi nodes hoisted out of a vanishing immediate dominator.
    pub phis_hoisted: usize,

    /// Fixpoint iterations performed by the driver.
    /// 1 means switch simplification found nothing to do.
    pub iterations: usize,
}

impl ControlFlowStats {
    /// Creates empty statistics (no changes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the pass changed the graph at all.
    #[must_use]
    pub const fn had_effect(&self) -> bool {
        self.blocks_removed > 0
            || self.switches_simplified > 0
            || self.edges_pruned > 0
            || self.phis_rewritten > 0
            || self.phis_hoisted > 0
    }

    /// Formats statistics for human-readable display.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn format_report(&self) -> String {
        let mut output = String::with_capacity(256);

        writeln!(output, "📊 Control-flow optimization statistics:").unwrap();
        writeln!(output, "🗑️  Blocks removed: {}", self.blocks_removed).unwrap();
        writeln!(output, "🔀 Switches simplified: {}", self.switches_simplified).unwrap();
        writeln!(output, "✂️  Unreachable edges pruned: {}", self.edges_pruned).unwrap();
        writeln!(output, "🔧 Phis rewritten: {}", self.phis_rewritten).unwrap();
        writeln!(output, "⬆️  Phis hoisted: {}", self.phis_hoisted).unwrap();
        writeln!(output, "🔄 Iterations: {}", self.iterations).unwrap();

        output
    }
}

impl fmt::Display for ControlFlowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlFlowStats {{ blocks: {}, switches: {}, edges: {}, phis: {}, hoisted: {}, iterations: {} }}",
            self.blocks_removed,
            self.switches_simplified,
            self.edges_pruned,
            self.phis_rewritten,
            self.phis_hoisted,
            self.iterations
        )
    }
}
