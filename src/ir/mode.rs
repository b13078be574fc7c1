// src/ir/mode.rs
use std::fmt;

/// Value modes carried by every IR node.
///
/// Modes play the role types play in a conventional IR: they tag a node as
/// control flow, data of a given width, a multi-output tuple, or a block.
/// `Any` is reserved for Bad nodes standing in for something whose mode is
/// no longer meaningful (a removed block, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Control-flow edge produced by Jmp, Proj-of-Cond and friends.
    Control,
    /// Boolean value; the selector mode of a two-way Cond.
    Bool,
    /// 32-bit signed integer.
    #[default]
    I32,
    /// 64-bit signed integer.
    I64,
    /// Multi-output producer (Cond, Start).
    Tuple,
    /// Mode of Block nodes themselves.
    BlockMode,
    /// Mode of a Bad that replaced a node without a meaningful mode.
    Any,
}

impl Mode {
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(self, Mode::Control)
    }

    #[must_use]
    pub const fn is_data(self) -> bool {
        matches!(self, Mode::Bool | Mode::I32 | Mode::I64)
    }

    /// A Cond with a selector of this mode is a multi-way switch rather
    /// than a two-way branch.
    #[must_use]
    pub const fn is_switch_selector(self) -> bool {
        matches!(self, Mode::I32 | Mode::I64)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Control => "X",
            Mode::Bool => "b",
            Mode::I32 => "Is",
            Mode::I64 => "Ls",
            Mode::Tuple => "T",
            Mode::BlockMode => "BB",
            Mode::Any => "ANY",
        };
        write!(f, "{name}")
    }
}
