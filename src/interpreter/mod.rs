//! Tape language execution engine
//!
//! This module provides the core execution logic:
//! - [`machine`]: Resumable machine state and the single-step operation
//! - [`engine`]: [`Interpreter`](engine::Interpreter), a machine plus snapshot history
//! - [`errors`]: Runtime error types
//! - [`constants`]: Tape size and default limits
//!
//! # Execution Model
//!
//! The machine walks the command tree one step at a time: one leaf command, or
//! one loop entry, skip, restart or exit. Callers single-step it, run it to
//! completion, or hand it to the [`Interpreter`](engine::Interpreter), which
//! takes a snapshot after every step so execution can be stepped backward.
//!
//! # Known limitation
//!
//! `,` only reads input supplied up front. With no input left it is a no-op
//! and the current cell keeps its value.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod machine;
