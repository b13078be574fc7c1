// src/error/ir_error.rs
use crate::ir::NodeId;
use thiserror::Error;

/// Structural defects the graph verifier can report.
///
/// The optimization passes themselves never return these: a pass that
/// produces a malformed graph is a programming error and asserts. The
/// verifier exists so tests and debugging sessions get a diagnosis
/// instead of a downstream panic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrError {
    #[error("Phi {phi} has arity {phi_arity} but its block {block} has arity {block_arity}")]
    PhiArityMismatch { phi: NodeId, block: NodeId, phi_arity: usize, block_arity: usize },

    #[error("Cond {cond} has {live} live Proj successor(s); at least two are required")]
    DegenerateCond { cond: NodeId, live: usize },

    #[error("block {block} has non-control predecessor {pred}")]
    NonControlPred { block: NodeId, pred: NodeId },

    #[error("node {user} references tombstoned node {node}")]
    DanglingTombstone { node: NodeId, user: NodeId },
}
