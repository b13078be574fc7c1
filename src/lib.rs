// src/lib.rs
//! # sonir
//!
//! A sea-of-nodes SSA intermediate representation with a control-flow
//! optimization pass: empty-block removal with Phi-preserving rewiring,
//! switch simplification, dominance analysis and the supporting graph
//! machinery.
//!
//! ## Important modules:
//! * `ir` - Node graph, walkers, dominance, local identities, verifier
//! * `ir::optimizer` - The `Phase` pipeline seam and the control-flow
//!   optimization itself
//! * `error` - Error types reported by the graph verifier
pub mod error;
pub mod ir;
