//! Driver for the control-flow optimization.

use crate::ir::{
    DominanceInfo, Graph, GraphPhase, NodeId, block_walk, equivalent_node,
};
use console::style;
use std::fmt::Write;

use super::blocks::BlockOptimizer;
use super::collector::collect;
use super::stats::ControlFlowStats;
use super::switches::simplify_switches;
use super::unreachable::remove_unreachable_code;
use crate::ir::optimizer::Phase;

/// Control-flow optimization phase.
///
/// Removes empty basic blocks, rewires predecessor chains while
/// preserving Phi semantics, and simplifies degenerate switches. The
/// heavy lifting happens in [`super::blocks`]; this type owns the
/// fixpoint driver, configuration and statistics.
#[derive(Debug, Clone)]
pub struct ControlFlowOptimizer {
    /// Maximum number of fixpoint iterations before stopping.
    pub max_iterations: usize,

    /// Whether to collect and report detailed optimization statistics.
    pub enable_statistics: bool,

    /// Whether to print statistics after each run.
    pub verbose: bool,

    /// Statistics from the last optimization run.
    last_stats: ControlFlowStats,
}

impl ControlFlowOptimizer {
    /// Creates a new optimizer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new optimizer with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if `max_iterations` is 0.
    #[must_use]
    pub fn with_config(max_iterations: usize, enable_statistics: bool, verbose: bool) -> Self {
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self { max_iterations, enable_statistics, verbose, last_stats: ControlFlowStats::default() }
    }

    /// Returns the statistics from the last optimization run.
    #[must_use]
    pub const fn get_statistics(&self) -> &ControlFlowStats {
        &self.last_stats
    }

    /// Runs the whole pass over one graph.
    ///
    /// # Panics
    ///
    /// Panics if the graph is still under construction or not pinned,
    /// and on any internal arity inconsistency (there are no recoverable
    /// errors; a violated invariant is a bug).
    fn optimize_graph(&mut self, g: &mut Graph) -> ControlFlowStats {
        assert_eq!(g.phase(), GraphPhase::Mature, "control-flow optimization requires a mature graph");
        assert!(g.is_pinned(), "control-flow optimization requires a pinned graph");

        let mut stats = ControlFlowStats::new();

        // Fixpoint: turning a switch into a Jmp can empty its block and
        // strand whole chains of blocks, so cleanup and collection run
        // again until the switches settle.
        let mut collection;
        loop {
            stats.iterations += 1;
            stats.edges_pruned += remove_unreachable_code(g);
            collection = collect(g);
            if !simplify_switches(g, &collection, &mut stats) {
                break;
            }
            assert!(
                stats.iterations < self.max_iterations,
                "control-flow fixpoint did not converge within {} iterations",
                self.max_iterations
            );
        }

        let doms = DominanceInfo::compute(g);
        let mut block_opt = BlockOptimizer::new(&mut collection, &doms, &mut stats);
        block_walk(g, |g, b, visited| block_opt.optimize_block(g, b, visited));
        let phis_moved = block_opt.phis_moved();

        // Local identities subsume the remaining trivialities, single
        // Jmp-predecessor straightening above all.
        let blocks: Vec<NodeId> = g.live_nodes().filter(|&n| g.is_block(n)).collect();
        for b in blocks {
            if g.data(b).is_dead() {
                continue;
            }
            let merged = equivalent_node(g, b);
            if merged != b {
                g.exchange(b, merged);
                stats.blocks_removed += 1;
            }
        }
        let end = g.end();
        let new_end = equivalent_node(g, end);
        if new_end != end {
            g.exchange(end, new_end);
        }

        g.remove_bads_and_doublets();

        if phis_moved {
            prune_kept_phis(g);
        }

        stats
    }

    /// Prints optimization statistics.
    #[allow(clippy::unwrap_used)]
    fn print_statistics(&self) {
        let stats = self.get_statistics();
        if stats.had_effect() {
            let mut output = String::with_capacity(256);
            writeln!(output, "\n{}", style("Control-Flow Optimization Statistics:").cyan().bold()).unwrap();
            write!(output, "{}", stats.format_report()).unwrap();
            print!("{output}");
        } else {
            println!("{}", style("No foldable control flow found - graph already optimal").green());
        }
    }
}

impl Default for ControlFlowOptimizer {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            enable_statistics: true,
            verbose: false,
            last_stats: ControlFlowStats::default(),
        }
    }
}

impl Phase for ControlFlowOptimizer {
    fn name(&self) -> &str {
        "Control Flow Optimization"
    }

    fn run(&mut self, graph: &mut Graph) {
        let stats = self.optimize_graph(graph);
        if self.enable_statistics {
            self.last_stats = stats;
        }
        if self.verbose {
            self.print_statistics();
        }
    }
}

/// Hoisting can leave a moved Phi whose only remaining user is the End
/// keep-alive edge that held it in its old block; such entries are
/// dropped.
fn prune_kept_phis(g: &mut Graph) {
    let end = g.end();
    let kept: Vec<NodeId> = g.end_keepalives().to_vec();
    let pruned: Vec<NodeId> = kept
        .iter()
        .copied()
        .filter(|&ka| !g.is_phi(ka) || g.users(ka).iter().any(|&user| user != end && user != ka))
        .collect();
    if pruned.len() != kept.len() {
        g.set_end_keepalives(pruned);
    }
}

/// In-place control-flow optimization of one graph with default
/// settings.
pub fn optimize_cf(g: &mut Graph) {
    ControlFlowOptimizer::new().run(g);
}

/// Named wrapper for pass-manager pipelines.
struct ControlFlowPass {
    name: String,
    inner: ControlFlowOptimizer,
}

impl Phase for ControlFlowPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, graph: &mut Graph) {
        self.inner.run(graph);
    }
}

/// Wraps the optimizer as a pipeline pass; the default name is
/// "optimize_cf".
#[must_use]
pub fn optimize_cf_pass(name: Option<&str>) -> Box<dyn Phase> {
    Box::new(ControlFlowPass {
        name: name.unwrap_or("optimize_cf").to_string(),
        inner: ControlFlowOptimizer::new(),
    })
}
