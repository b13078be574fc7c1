// src/ir/mod.rs
mod dominance;
mod graph;
mod identities;
mod mode;
mod node;
mod printer;
mod verifier;
mod walk;
pub mod optimizer;

pub use dominance::DominanceInfo;
pub use graph::{Graph, GraphPhase};
pub use identities::equivalent_node;
pub use mode::Mode;
pub use node::{NodeData, NodeId, NodeKind};
pub use printer::dump_graph;
pub use verifier::verify;
pub use walk::{block_walk, reachable_from_start, walk_graph};
