//! # Introduction
//!
//! tapestep parses and executes programs in the eight-command tape language
//! (`>` `<` `+` `-` `,` `.` `[` `]`), one step at a time. Every step can be
//! inspected, and the snapshot history can be navigated forward and backward
//! through a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Command tree → Machine → Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: drops comments and builds the nested command tree, or
//!    reports every bracket error with its position.
//! 2. [`interpreter`]: the resumable [`Machine`] and its single-step
//!    operation, plus the history-keeping
//!    [`Interpreter`](interpreter::engine::Interpreter).
//! 3. [`memory`]: the fixed 3000-cell tape of wrapping bytes.
//! 4. [`snapshot`]: snapshot history with a configurable memory limit.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use tapestep::{parse, step, Machine, StepResult};
//!
//! let commands = parse("+++ add three then print .").unwrap();
//! let mut result = step(Machine::new(commands));
//! let machine = loop {
//!     match result {
//!         StepResult::Continue(m) => result = step(m),
//!         StepResult::Finished(m) => break m,
//!         StepResult::Failed(e) => panic!("{}", e),
//!     }
//! };
//! assert_eq!(machine.output(), "\u{3}");
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

pub use interpreter::errors::RuntimeError;
pub use interpreter::machine::{run, step, Machine, Status, StepResult};
pub use parser::ast::{Command, Program, SourceLocation};
pub use parser::{parse, ParseError, ParseErrors};
