//! Memory model for the tape interpreter
//!
//! - [`tape`]: the fixed-size cell array addressed by the data pointer
//!
//! # Cells
//!
//! A cell is one unsigned byte. Increment and decrement wrap modulo 256, so
//! `-` on a zero cell yields 255 and `+` on 255 yields 0. Every cell value is
//! therefore a valid Unicode code point when written as output.
//!
//! # Bounds
//!
//! The tape never grows and the pointer never wraps: an access outside
//! `[0, TAPE_SIZE)` is reported as a [`RuntimeError`] by the caller that tried
//! to move or read there.
//!
//! [`RuntimeError`]: crate::interpreter::errors::RuntimeError

pub mod tape;

pub use tape::Tape;

/// Storage type of a single tape cell
pub type Cell = u8;
