//! Tape language source parser
//!
//! This module transforms source text into a command tree:
//! - [`lexer`]: Tokenization (source text → command tokens, comments dropped)
//! - [`parse`]: Parsing (tokens → nested [`ast::Command`] sequence)
//! - [`ast`]: Command tree, source locations and the source map
//!
//! # Language
//!
//! Eight commands: `>` `<` `+` `-` `,` `.` and the loop brackets `[` `]`.
//! Every other character is a comment, including inside loops.
//!
//! # Parser Implementation
//!
//! Hand-written single-pass parser with an explicit stack of open loops.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;

pub use parse::{parse, ParseError, ParseErrors, Parser};
