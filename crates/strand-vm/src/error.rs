//! VM error types.

use thiserror::Error;

/// Stack operation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StackError {
    /// Tried to pop or peek an empty stack.
    #[error("stack underflow")]
    Underflow,
    /// Exceeded the fixed stack capacity.
    #[error("stack overflow")]
    Overflow,
    /// Indexed access outside the live stack region.
    #[error("stack index {index} out of bounds (depth {depth})")]
    OutOfBounds { index: usize, depth: usize },
    /// Pushed past the call stack capacity.
    #[error("call stack overflow")]
    CallOverflow,
    /// Popped an empty call stack.
    #[error("call stack underflow")]
    CallUnderflow,
}

/// Runtime errors during program execution.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum VmError {
    /// Stack error (underflow, overflow, bad index).
    #[error(transparent)]
    Stack(#[from] StackError),
    /// An operand had the wrong type for the opcode.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Division by exactly zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A jump or call target outside the instruction stream.
    #[error("invalid address {target} (program length {len})")]
    InvalidAddress { target: usize, len: usize },
    /// An instruction argument that must be a non-negative integer was not.
    #[error("invalid instruction argument {0}")]
    InvalidArgument(f64),
}
