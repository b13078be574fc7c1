// src/ir/graph.rs
use super::mode::Mode;
use super::node::{NodeData, NodeId, NodeKind};
use std::sync::Arc;

/// Construction state of a graph.
///
/// Optimization passes refuse graphs still under construction; builders
/// work in either phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphPhase {
    Building,
    Mature,
}

/// A function graph: an arena of SSA nodes plus the distinguished Start
/// and End structure every graph carries.
///
/// Blocks are nodes whose inputs are control predecessors; every other
/// node names its owning block. The graph is pinned: owning blocks are
/// semantically meaningful and never inferred.
///
/// Nodes are never deallocated while the graph lives. [`Graph::exchange`]
/// redirects all uses of a node and tombstones it; tombstoned nodes are
/// skipped by walkers and use scans.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<NodeData>,
    start: NodeId,
    start_block: NodeId,
    end: NodeId,
    end_block: NodeId,
    phase: GraphPhase,
    pinned: bool,
}

impl Graph {
    /// Creates an empty graph holding its Start and End skeleton: a start
    /// block owning the Start node and an end block owning the End node.
    #[must_use]
    pub fn new() -> Self {
        let mut g = Self {
            nodes: Vec::new(),
            start: NodeId(0),
            start_block: NodeId(0),
            end: NodeId(0),
            end_block: NodeId(0),
            phase: GraphPhase::Building,
            pinned: true,
        };
        g.start_block = g.alloc(NodeKind::Block { entity: None }, Mode::BlockMode, None, Vec::new());
        g.start = g.alloc(NodeKind::Start, Mode::Tuple, Some(g.start_block), Vec::new());
        g.end_block = g.alloc(NodeKind::Block { entity: None }, Mode::BlockMode, None, Vec::new());
        g.end = g.alloc(NodeKind::End, Mode::Control, Some(g.end_block), Vec::new());
        g
    }

    fn alloc(&mut self, kind: NodeKind, mode: Mode, block: Option<NodeId>, inputs: Vec<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node arena overflow"));
        self.nodes.push(NodeData::new(kind, mode, block, inputs));
        id
    }

    // ------------------------------------------------------------------
    // Graph structure
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    #[must_use]
    pub const fn start_block(&self) -> NodeId {
        self.start_block
    }

    #[must_use]
    pub const fn end(&self) -> NodeId {
        self.end
    }

    #[must_use]
    pub const fn end_block(&self) -> NodeId {
        self.end_block
    }

    #[must_use]
    pub const fn phase(&self) -> GraphPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Finishes construction. Optimization passes assert this was called.
    pub fn mature(&mut self) {
        self.phase = GraphPhase::Mature;
    }

    /// Number of arena slots, live and tombstoned alike.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All live node ids, in arena order.
    pub fn live_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.dead)
            .map(|(i, _)| NodeId(i as u32))
    }

    // ------------------------------------------------------------------
    // Node accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn data(&self, n: NodeId) -> &NodeData {
        &self.nodes[n.index()]
    }

    #[must_use]
    pub fn kind(&self, n: NodeId) -> &NodeKind {
        &self.nodes[n.index()].kind
    }

    #[must_use]
    pub fn mode(&self, n: NodeId) -> Mode {
        self.nodes[n.index()].mode
    }

    /// Owning block of a non-Block node.
    ///
    /// # Panics
    ///
    /// Panics when called on a Block node; blocks own themselves.
    #[must_use]
    pub fn block_of(&self, n: NodeId) -> NodeId {
        self.nodes[n.index()].block.expect("Block nodes have no owning block")
    }

    #[must_use]
    pub fn try_block_of(&self, n: NodeId) -> Option<NodeId> {
        self.nodes[n.index()].block
    }

    #[must_use]
    pub fn inputs(&self, n: NodeId) -> &[NodeId] {
        &self.nodes[n.index()].inputs
    }

    #[must_use]
    pub fn input(&self, n: NodeId, i: usize) -> NodeId {
        self.nodes[n.index()].inputs[i]
    }

    /// Input arity; for blocks this is the control-predecessor count.
    #[must_use]
    pub fn arity(&self, n: NodeId) -> usize {
        self.nodes[n.index()].inputs.len()
    }

    /// Block producing the i-th control predecessor of `b`.
    ///
    /// # Panics
    ///
    /// Panics if the predecessor is a Bad (Bads have no meaningful block).
    #[must_use]
    pub fn pred_block(&self, b: NodeId, i: usize) -> NodeId {
        let pred = self.input(b, i);
        assert!(!self.is_bad(pred), "Bad predecessors have no block");
        self.block_of(pred)
    }

    #[must_use]
    pub fn block_entity(&self, b: NodeId) -> Option<&Arc<str>> {
        match &self.nodes[b.index()].kind {
            NodeKind::Block { entity } => entity.as_ref(),
            _ => None,
        }
    }

    pub fn set_block_entity(&mut self, b: NodeId, entity: Arc<str>) {
        match &mut self.nodes[b.index()].kind {
            NodeKind::Block { entity: slot } => *slot = Some(entity),
            other => panic!("cannot attach an entity to a {} node", other.name()),
        }
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    #[must_use]
    pub fn is_block(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Block { .. })
    }

    #[must_use]
    pub fn is_phi(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Phi)
    }

    #[must_use]
    pub fn is_jmp(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Jmp)
    }

    #[must_use]
    pub fn is_proj(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Proj { .. })
    }

    #[must_use]
    pub fn is_cond(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Cond { .. })
    }

    #[must_use]
    pub fn is_bad(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Bad)
    }

    /// An indirect branch whose targets cannot be enumerated.
    #[must_use]
    pub fn is_unknown_jump(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::IJmp)
    }

    #[must_use]
    pub fn is_const(&self, n: NodeId) -> bool {
        matches!(self.nodes[n.index()].kind, NodeKind::Const { .. })
    }

    /// Compile-time value of `n`, if it has one.
    #[must_use]
    pub fn const_value(&self, n: NodeId) -> Option<i64> {
        match self.nodes[n.index()].kind {
            NodeKind::Const { value } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn proj_num(&self, n: NodeId) -> Option<u64> {
        match self.nodes[n.index()].kind {
            NodeKind::Proj { num } => Some(num),
            _ => None,
        }
    }

    #[must_use]
    pub fn cond_default(&self, n: NodeId) -> Option<u64> {
        match self.nodes[n.index()].kind {
            NodeKind::Cond { default_case } => Some(default_case),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    pub fn new_block(&mut self, preds: &[NodeId]) -> NodeId {
        self.alloc(NodeKind::Block { entity: None }, Mode::BlockMode, None, preds.to_vec())
    }

    pub fn new_jmp(&mut self, block: NodeId) -> NodeId {
        debug_assert!(self.is_block(block));
        self.alloc(NodeKind::Jmp, Mode::Control, Some(block), Vec::new())
    }

    pub fn new_ijmp(&mut self, block: NodeId, target: NodeId) -> NodeId {
        self.alloc(NodeKind::IJmp, Mode::Control, Some(block), vec![target])
    }

    /// Two-way branch; the selector must be Boolean.
    pub fn new_cond(&mut self, block: NodeId, selector: NodeId) -> NodeId {
        debug_assert_eq!(self.mode(selector), Mode::Bool);
        self.alloc(NodeKind::Cond { default_case: 0 }, Mode::Tuple, Some(block), vec![selector])
    }

    /// Multi-way branch; the selector must be an integer value and
    /// `default_case` names the Proj taken when no case matches.
    pub fn new_switch(&mut self, block: NodeId, selector: NodeId, default_case: u64) -> NodeId {
        debug_assert!(self.mode(selector).is_switch_selector());
        self.alloc(NodeKind::Cond { default_case }, Mode::Tuple, Some(block), vec![selector])
    }

    pub fn new_proj(&mut self, pred: NodeId, mode: Mode, num: u64) -> NodeId {
        let block = self.block_of(pred);
        self.alloc(NodeKind::Proj { num }, mode, Some(block), vec![pred])
    }

    /// Value merge in `block`; `inputs` must align with the block's
    /// control predecessors.
    pub fn new_phi(&mut self, block: NodeId, inputs: &[NodeId], mode: Mode) -> NodeId {
        assert_eq!(inputs.len(), self.arity(block), "Phi arity must match its block");
        self.alloc(NodeKind::Phi, mode, Some(block), inputs.to_vec())
    }

    /// Constants live in the start block.
    pub fn new_const(&mut self, mode: Mode, value: i64) -> NodeId {
        let block = self.start_block;
        self.alloc(NodeKind::Const { value }, mode, Some(block), Vec::new())
    }

    pub fn new_add(&mut self, block: NodeId, left: NodeId, right: NodeId) -> NodeId {
        let mode = self.mode(left);
        self.alloc(NodeKind::Add, mode, Some(block), vec![left, right])
    }

    pub fn new_return(&mut self, block: NodeId, value: Option<NodeId>) -> NodeId {
        let inputs = value.into_iter().collect();
        self.alloc(NodeKind::Return, Mode::Control, Some(block), inputs)
    }

    /// Fresh Bad of the given mode. Bads are owned by the start block.
    pub fn new_bad(&mut self, mode: Mode) -> NodeId {
        let block = self.start_block;
        self.alloc(NodeKind::Bad, mode, Some(block), Vec::new())
    }

    /// Appends a control predecessor to a block under construction.
    pub fn add_block_input(&mut self, block: NodeId, pred: NodeId) {
        debug_assert!(self.is_block(block));
        self.nodes[block.index()].inputs.push(pred);
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    pub fn set_inputs(&mut self, n: NodeId, inputs: Vec<NodeId>) {
        self.nodes[n.index()].inputs = inputs;
    }

    pub fn set_input(&mut self, n: NodeId, i: usize, value: NodeId) {
        self.nodes[n.index()].inputs[i] = value;
    }

    /// Re-owns a node; used when hoisting a Phi out of a vanishing block.
    pub fn set_block(&mut self, n: NodeId, block: NodeId) {
        assert!(!self.is_block(n), "blocks cannot be re-owned");
        self.nodes[n.index()].block = Some(block);
    }

    /// Redirects every use of `old` (input edges, owning-block references
    /// and the distinguished graph handles) to `new`, then tombstones
    /// `old`. The classic global use-redirection primitive.
    pub fn exchange(&mut self, old: NodeId, new: NodeId) {
        assert_ne!(old, new, "exchange with itself is meaningless");
        assert!(!self.nodes[old.index()].dead, "exchange of a tombstoned node");
        for i in 0..self.nodes.len() {
            if i == old.index() || self.nodes[i].dead {
                continue;
            }
            for input in &mut self.nodes[i].inputs {
                if *input == old {
                    *input = new;
                }
            }
            if self.nodes[i].block == Some(old) {
                self.nodes[i].block = Some(new);
            }
        }
        if self.start == old {
            self.start = new;
        }
        if self.start_block == old {
            self.start_block = new;
        }
        if self.end == old {
            self.end = new;
        }
        if self.end_block == old {
            self.end_block = new;
        }
        let data = &mut self.nodes[old.index()];
        data.inputs.clear();
        data.block = None;
        data.dead = true;
    }

    /// All live nodes using `n` as an input. Computed by an arena scan;
    /// the graph keeps no persistent reverse-use index.
    #[must_use]
    pub fn users(&self, n: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.dead && d.inputs.contains(&n))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    // ------------------------------------------------------------------
    // Keep-alive edges
    // ------------------------------------------------------------------

    /// Holds `n` live by adding it to the End node's inputs.
    pub fn keep_alive(&mut self, n: NodeId) {
        let end = self.end;
        self.nodes[end.index()].inputs.push(n);
    }

    #[must_use]
    pub fn end_keepalives(&self) -> &[NodeId] {
        self.inputs(self.end)
    }

    pub fn set_end_keepalives(&mut self, keepalives: Vec<NodeId>) {
        let end = self.end;
        self.nodes[end.index()].inputs = keepalives;
    }

    /// Drops Bad and duplicate keep-alive edges from the End node.
    pub fn remove_bads_and_doublets(&mut self) {
        let mut seen = Vec::new();
        let kept: Vec<NodeId> = self
            .inputs(self.end)
            .iter()
            .copied()
            .filter(|&ka| {
                if self.is_bad(ka) || seen.contains(&ka) {
                    false
                } else {
                    seen.push(ka);
                    true
                }
            })
            .collect();
        self.set_end_keepalives(kept);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
