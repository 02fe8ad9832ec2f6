//! Runtime error types for the tape interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors or system errors).
//!
//! Errors raised by a step are fatal to that execution: the engine never skips the
//! offending command and carries on. The history variants only concern the
//! [`Interpreter`](crate::interpreter::engine::Interpreter) wrapper.

use std::fmt;

/// Direction of a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A `<` or `>` would move the pointer off the tape
    PointerOutOfRange { pointer: usize, direction: Direction },

    /// A cell outside the tape was addressed
    InvalidCell { index: usize },

    /// Run-to-completion gave up after its step budget
    StepLimitExceeded { limit: u64 },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed (nothing to step back to, end of program, ...)
    HistoryOperationFailed { message: String },
}

impl RuntimeError {
    /// Whether the error was raised by the interpreted program itself
    pub fn is_program_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::PointerOutOfRange { .. } | RuntimeError::InvalidCell { .. }
        )
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::PointerOutOfRange { pointer, direction } => {
                write!(
                    f,
                    "pointer out of range: cannot move {} from cell {}",
                    direction, pointer
                )
            }
            RuntimeError::InvalidCell { index } => {
                write!(f, "pointer out of range: no cell at index {}", index)
            }
            RuntimeError::StepLimitExceeded { limit } => {
                write!(
                    f,
                    "Step limit exceeded: program still running after {} step{}",
                    limit,
                    if *limit == 1 { "" } else { "s" }
                )
            }
            RuntimeError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            RuntimeError::HistoryOperationFailed { message } => {
                write!(f, "History operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
