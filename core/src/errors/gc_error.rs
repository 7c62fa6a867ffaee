use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GcError {
    #[error("stack overflow: root stack is full ({capacity} entries)")]
    #[diagnostic(help("pop values before pushing more"))]
    StackOverflow { capacity: usize },

    #[error("stack underflow: needed {needed} operand(s) but the stack holds {available}")]
    StackUnderflow { needed: usize, available: usize },

    #[error("allocation failure with {live} live objects")]
    AllocationFailure { live: usize },

    #[error("reference to slot {index} does not point at a live object")]
    InvalidReference { index: u32 },

    #[error("object in slot {index} is a leaf, expected a pair")]
    NotAPair { index: u32 },

    #[error("stack slot {index} is out of range (stack holds {len})")]
    InvalidStackSlot { index: usize, len: usize },
}
