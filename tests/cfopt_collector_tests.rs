// Control-flow optimization: collection pre-pass contract.

use sonir::ir::optimizer::control_flow::collect;
use sonir::ir::{Graph, Mode};

#[test]
fn test_collection_separates_removable_and_pinned_blocks() {
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
    let v1 = g.new_const(Mode::I32, 1);
    let v2 = g.new_const(Mode::I32, 2);
    let phi = g.new_phi(d, &[v1, v2], Mode::I32);
    let ret = g.new_return(d, Some(phi));
    g.add_block_input(g.end_block(), ret);

    let collection = collect(&g);

    // Jmp-only blocks stay tentatively removable.
    assert!(collection.is_removable(b));
    assert!(collection.is_removable(c));
    // Blocks holding a Cond, a Return, Start or End are pinned.
    assert!(!collection.is_removable(a));
    assert!(!collection.is_removable(d));
    assert!(!collection.is_removable(g.start_block()));
    assert!(!collection.is_removable(g.end_block()));
}

#[test]
fn test_collection_threads_phis_and_projs() {
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
    let ret = g.new_return(b, Some(phi));
    g.add_block_input(g.end_block(), ret);

    let collection = collect(&g);

    assert!(collection.has_phis(b));
    assert_eq!(collection.phis_of(b), &[phi][..]);
    assert!(!collection.has_phis(a));
    let projs = collection.projs_of(cond);
    assert_eq!(projs.len(), 2);
    assert!(projs.contains(&pt));
    assert!(projs.contains(&pf));
}

#[test]
fn test_collection_records_switches_but_not_boolean_conds() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let bsel = g.new_proj(g.start(), Mode::Bool, 0);
    let bcond = g.new_cond(a, bsel);
    let pt = g.new_proj(bcond, Mode::Control, 1);
    let pf = g.new_proj(bcond, Mode::Control, 0);

    let b = g.new_block(&[pt]);
    let isel = g.new_proj(g.start(), Mode::I32, 1);
    let sw = g.new_switch(b, isel, 0);
    let p1 = g.new_proj(sw, Mode::Control, 1);
    let p2 = g.new_proj(sw, Mode::Control, 0);

    let t1 = g.new_block(&[p1]);
    let r1 = g.new_return(t1, None);
    let t2 = g.new_block(&[p2, pf]);
    let r2 = g.new_return(t2, None);
    g.add_block_input(g.end_block(), r1);
    g.add_block_input(g.end_block(), r2);

    let collection = collect(&g);

    assert_eq!(collection.switch_conds(), &[sw][..]);
}

#[test]
fn test_labeled_block_is_never_removable() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ja = g.new_jmp(a);
    let b = g.new_block(&[ja]);
    let ret = g.new_return(b, None);
    g.add_block_input(g.end_block(), ret);
    g.set_block_entity(a, "join".into());

    let collection = collect(&g);

    assert!(!collection.is_removable(a));
}

#[test]
fn test_marking_is_sticky_for_later_queries() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ja = g.new_jmp(a);
    let b = g.new_block(&[ja]);
    let ret = g.new_return(b, None);
    g.add_block_input(g.end_block(), ret);

    let mut collection = collect(&g);
    assert!(collection.is_removable(a));
    collection.mark_non_removable(a);
    assert!(!collection.is_removable(a));
}
