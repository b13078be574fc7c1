use sonir::ir::{Graph, Mode, NodeId, block_walk, reachable_from_start, walk_graph};

fn diamond() -> (Graph, NodeId, NodeId, NodeId, NodeId) {
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
    (g, a, b, c, d)
}

#[test]
fn test_walk_graph_reaches_every_node_once() {
    let (g, a, b, c, d) = diamond();

    let mut seen: Vec<NodeId> = Vec::new();
    walk_graph(&g, |_, n| seen.push(n));

    let unique: std::collections::HashSet<NodeId> = seen.iter().copied().collect();
    assert_eq!(seen.len(), unique.len(), "no node may be visited twice");
    assert_eq!(seen.len(), g.live_nodes().count());
    for block in [a, b, c, d, g.start_block(), g.end_block()] {
        assert!(unique.contains(&block));
    }
    assert!(unique.contains(&g.end()));
    assert!(unique.contains(&g.start()));
}

#[test]
fn test_walk_graph_reaches_keepalives() {
    let mut g = Graph::new();
    let orphan = g.new_const(Mode::I64, 42);
    g.keep_alive(orphan);

    let mut seen: Vec<NodeId> = Vec::new();
    walk_graph(&g, |_, n| seen.push(n));

    assert!(seen.contains(&orphan));
}

#[test]
fn test_block_walk_starts_at_the_end_block() {
    let (mut g, a, b, c, d) = diamond();

    let mut order: Vec<NodeId> = Vec::new();
    block_walk(&mut g, |_, blk, visited| {
        assert!(visited.contains(&blk), "a block is marked visited before its callback runs");
        order.push(blk);
    });

    assert_eq!(order[0], g.end_block());
    for block in [a, b, c, d, g.start_block()] {
        assert!(order.contains(&block));
    }
}

#[test]
fn test_block_walk_skips_bad_predecessors() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let bad = g.new_bad(Mode::Control);
    let a = g.new_block(&[j0, bad]);
    let ret = g.new_return(a, None);
    g.add_block_input(g.end_block(), ret);

    let mut order: Vec<NodeId> = Vec::new();
    block_walk(&mut g, |_, blk, _| order.push(blk));

    assert!(order.contains(&a));
    assert!(order.contains(&g.start_block()));
}

#[test]
fn test_block_walk_visits_keepalive_blocks_last() {
    let mut g = Graph::new();
    let j0 = g.new_jmp(g.start_block());
    let a = g.new_block(&[j0]);
    let ret = g.new_return(a, None);
    g.add_block_input(g.end_block(), ret);

    // A self-loop held alive only through End.
    let je = g.new_jmp(a);
    let looper = g.new_block(&[je]);
    let jl = g.new_jmp(looper);
    g.add_block_input(looper, jl);
    g.keep_alive(looper);

    let mut order: Vec<NodeId> = Vec::new();
    block_walk(&mut g, |_, blk, _| order.push(blk));

    assert_eq!(order[0], g.end_block());
    assert_eq!(order.last(), Some(&looper));
}

#[test]
fn test_reachable_from_start_ignores_detached_blocks() {
    let (mut g, a, b, c, d) = diamond();
    let orphan = g.new_block(&[]);
    let jo = g.new_jmp(orphan);
    let stranded = g.new_block(&[jo]);

    let reachable = reachable_from_start(&g);

    for block in [a, b, c, d, g.start_block(), g.end_block()] {
        assert!(reachable.contains(&block));
    }
    assert!(!reachable.contains(&orphan));
    assert!(!reachable.contains(&stranded));
}
