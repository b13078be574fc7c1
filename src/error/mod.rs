mod ir_error;

pub use ir_error::IrError;
