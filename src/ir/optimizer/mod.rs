pub mod control_flow;
pub mod phase;

pub use control_flow::{ControlFlowOptimizer, ControlFlowStats, optimize_cf, optimize_cf_pass};
pub use phase::{Phase, run_pipeline};
