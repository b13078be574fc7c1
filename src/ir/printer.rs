// src/ir/printer.rs
//! Deterministic textual dump of a graph, for diagnostics and tests.

use super::graph::Graph;
use super::node::{NodeId, NodeKind};
use std::fmt::Write;

/// Renders the live part of a graph block by block, in arena order.
///
/// The output is stable for a given construction order, which makes it
/// suitable for snapshot baselines.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn dump_graph(g: &Graph) -> String {
    let mut out = String::with_capacity(g.node_count() * 32);

    for b in g.live_nodes().filter(|&n| g.is_block(n)) {
        write!(out, "Block {b}").unwrap();
        if b == g.start_block() {
            out.push_str(" (start)");
        }
        if b == g.end_block() {
            out.push_str(" (end)");
        }
        if let Some(entity) = g.block_entity(b) {
            write!(out, " \"{entity}\"").unwrap();
        }
        writeln!(out, ": preds {}", id_list(g.inputs(b))).unwrap();

        for n in g.live_nodes().filter(|&n| g.try_block_of(n) == Some(b)) {
            let data = g.data(n);
            write!(out, "  {n} = {}", payload(data.kind())).unwrap();
            writeln!(out, " {} {}", id_list(data.inputs()), data.mode()).unwrap();
        }
    }

    writeln!(out, "keepalives {}", id_list(g.end_keepalives())).unwrap();
    out
}

fn payload(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Const { value } => format!("Const({value})"),
        NodeKind::Proj { num } => format!("Proj({num})"),
        NodeKind::Cond { default_case } => format!("Cond(default {default_case})"),
        other => other.name().to_string(),
    }
}

fn id_list(ids: &[NodeId]) -> String {
    let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}
