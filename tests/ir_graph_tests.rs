use sonir::ir::{Graph, GraphPhase, Mode, NodeKind};

#[test]
fn test_new_graph_has_start_and_end_skeleton() {
    let g = Graph::new();

    assert!(g.is_block(g.start_block()));
    assert!(g.is_block(g.end_block()));
    assert!(matches!(g.kind(g.start()), NodeKind::Start));
    assert!(matches!(g.kind(g.end()), NodeKind::End));
    assert_eq!(g.block_of(g.start()), g.start_block());
    assert_eq!(g.block_of(g.end()), g.end_block());
    assert_eq!(g.phase(), GraphPhase::Building);
    assert!(g.is_pinned());
}

#[test]
fn test_mature_moves_graph_out_of_building() {
    let mut g = Graph::new();
    g.mature();
    assert_eq!(g.phase(), GraphPhase::Mature);
}

#[test]
fn test_builders_assign_kinds_modes_and_blocks() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let sel = g.new_proj(g.start(), Mode::Bool, 0);
    let cond = g.new_cond(a, sel);
    let pt = g.new_proj(cond, Mode::Control, 1);
    let c7 = g.new_const(Mode::I32, 7);
    let add = g.new_add(a, c7, c7);
    let ret = g.new_return(a, Some(add));
    let bad = g.new_bad(Mode::I32);

    assert_eq!(g.mode(j0), Mode::Control);
    assert_eq!(g.block_of(j0), g.start_block());
    assert_eq!(g.arity(a), 1);
    assert_eq!(g.input(a, 0), j0);
    assert_eq!(g.block_of(cond), a);
    assert_eq!(g.mode(cond), Mode::Tuple);
    assert_eq!(g.proj_num(pt), Some(1));
    assert_eq!(g.block_of(pt), a);
    assert_eq!(g.const_value(c7), Some(7));
    assert_eq!(g.block_of(c7), g.start_block());
    assert_eq!(g.mode(add), Mode::I32);
    assert_eq!(g.inputs(ret), &[add][..]);
    assert!(g.is_bad(bad));
    assert_eq!(g.mode(bad), Mode::I32);
}

#[test]
fn test_switch_builder_records_default_case() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let sel = g.new_proj(g.start(), Mode::I32, 0);
    let sw = g.new_switch(a, sel, 3);

    assert!(g.is_cond(sw));
    assert_eq!(g.cond_default(sw), Some(3));
    assert_eq!(g.cond_default(j0), None);
}

#[test]
fn test_pred_block_resolves_the_producing_block() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ja = g.new_jmp(a);
    let b = g.new_block(&[ja]);

    assert_eq!(g.pred_block(a, 0), g.start_block());
    assert_eq!(g.pred_block(b, 0), a);
}

#[test]
fn test_block_entity_marks_a_label() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);

    assert!(g.block_entity(a).is_none());
    g.set_block_entity(a, "landing_pad".into());
    assert_eq!(g.block_entity(a).map(std::convert::AsRef::as_ref), Some("landing_pad"));
}

#[test]
fn test_phi_arity_must_match_its_block() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let sel = g.new_proj(g.start(), Mode::Bool, 0);
    let cond = g.new_cond(a, sel);
    let pt = g.new_proj(cond, Mode::Control, 1);
    let pf = g.new_proj(cond, Mode::Control, 0);
    let b = g.new_block(&[pt, pf]);
    let v1 = g.new_const(Mode::I32, 1);
    let v2 = g.new_const(Mode::I32, 2);
    let phi = g.new_phi(b, &[v1, v2], Mode::I32);

    assert_eq!(g.arity(phi), g.arity(b));
    assert_eq!(g.input(phi, 1), v2);
}

#[test]
fn test_exchange_redirects_uses_and_tombstones() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let v1 = g.new_const(Mode::I32, 1);
    let v2 = g.new_const(Mode::I32, 2);
    let add = g.new_add(a, v1, v1);

    g.exchange(v1, v2);

    assert_eq!(g.inputs(add), &[v2, v2][..]);
    assert!(g.data(v1).is_dead());
    assert!(g.inputs(v1).is_empty());
    assert!(g.users(v2).contains(&add));
    assert!(g.users(v1).is_empty());
}

#[test]
fn test_exchange_reowns_nodes_of_a_merged_block() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ja = g.new_jmp(a);
    let b = g.new_block(&[ja]);
    let ret = g.new_return(b, None);

    g.exchange(b, a);

    assert_eq!(g.block_of(ret), a);
    assert!(g.data(b).is_dead());
}

#[test]
fn test_keep_alive_and_cleanup() {
    let mut g = Graph::new();
    let v = g.new_const(Mode::I32, 5);
    let bad = g.new_bad(Mode::I32);
    g.keep_alive(v);
    g.keep_alive(bad);
    g.keep_alive(v);

    assert_eq!(g.end_keepalives(), &[v, bad, v][..]);
    g.remove_bads_and_doublets();
    assert_eq!(g.end_keepalives(), &[v][..]);
}

#[test]
fn test_live_nodes_skips_tombstones() {
    let mut g = Graph::new();
    let v1 = g.new_const(Mode::I32, 1);
    let v2 = g.new_const(Mode::I32, 2);
    let before = g.live_nodes().count();

    g.exchange(v1, v2);

    assert_eq!(g.live_nodes().count(), before - 1);
    assert!(!g.live_nodes().any(|n| n == v1));
}
