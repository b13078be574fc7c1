// Snapshot tests over the textual graph dump and statistics output.

use sonir::ir::optimizer::{ControlFlowOptimizer, Phase};
use sonir::ir::{Graph, Mode, dump_graph};

#[test]
fn test_linear_graph_dump_snapshot() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ret = g.new_return(a, None);
    g.add_block_input(g.end_block(), ret);
    g.mature();

    let output = dump_graph(&g);
    insta::assert_snapshot!("linear_graph", output);
}

#[test]
fn test_folded_diamond_stats_snapshot() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let sel = g.new_proj(g.start(), Mode::Bool, 0);
    let cond = g.new_cond(a, sel);
    let pt = g.new_proj(cond, Mode::Control, 1);
    let pf = g.new_proj(cond, Mode::Control, 0);
    let b = g.new_block(&[pt]);
    let jb = g.new_jmp(b);
    let c = g.new_block(&[pf]);
    let jc = g.new_jmp(c);
    let d = g.new_block(&[jb, jc]);
    let ret = g.new_return(d, None);
    g.add_block_input(g.end_block(), ret);
    g.mature();

    let mut opt = ControlFlowOptimizer::new();
    opt.run(&mut g);

    let report = opt.get_statistics().to_string();
    insta::assert_snapshot!("diamond_stats", report);
}
