//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source display with command highlighting and the next-command marker
//! - [`tape`]: Tape cells around the data pointer
//! - [`terminal`]: Text written by `.` and read by `,`
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function and, where the pane
//! scrolls, its scroll state type.

pub mod source;
pub mod status;
pub mod tape;
pub mod terminal;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tape::render_tape_pane;
pub use terminal::render_terminal_pane;
