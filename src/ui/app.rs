//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(200);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tape,
    Terminal,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tape -> terminal)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance
    pub interpreter: Interpreter,

    /// The source code being executed
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: super::panes::SourceScrollState,
    pub tape_scroll: usize,
    pub terminal_scroll: usize,

    /// Keep the pointer's row visible in the tape pane
    pub follow_pointer: bool,

    /// Step budget for jumping to the end
    pub max_steps: Option<u64>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    /// Create a new app with the given interpreter and source code
    pub fn new(interpreter: Interpreter, source_code: String, max_steps: Option<u64>) -> Self {
        App {
            interpreter,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: super::panes::SourceScrollState::new(),
            tape_scroll: 0,
            terminal_scroll: 0,
            follow_pointer: true,
            max_steps,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Create layout: 3 panes, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Split into 2 columns
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(pane_area);

        // Left column: Source (top) | Terminal (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let is_error = self.interpreter.error().is_some();
        let machine = self.interpreter.machine();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.interpreter.current_location(),
            is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            machine.output(),
            machine.input_consumed(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        super::panes::render_tape_pane(
            frame,
            columns[1],
            machine,
            is_error,
            self.focused_pane == FocusedPane::Tape,
            self.follow_pointer,
            &mut self.tape_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.interpreter,
            &self.status_message,
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c as usize - '0' as usize;
                let mut stepped = 0;
                for _ in 0..n {
                    if self.step_forward() {
                        stepped += 1;
                    } else {
                        break;
                    }
                }
                if stepped > 0 {
                    self.status_message = format!("Stepped forward {} step(s)", stepped);
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => self.scroll_focused(false),
            KeyCode::Down => self.scroll_focused(true),
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now()
                        .checked_sub(PLAY_INTERVAL)
                        .unwrap_or(Instant::now());
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Enter => {
                // Jump to end of execution
                self.is_playing = false;
                self.follow_pointer = true;
                self.terminal_scroll = usize::MAX;
                self.status_message = match self.interpreter.run_to_end(self.max_steps) {
                    Ok(_) => "Jumped to end".to_string(),
                    Err(e) => Self::describe_error(&e),
                };
            }
            KeyCode::Backspace => {
                // Jump to start of execution
                self.is_playing = false;
                self.follow_pointer = true;
                self.status_message = match self.interpreter.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => Self::describe_error(&e),
                };
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Scroll the focused pane by one row.
    ///
    /// The source pane moves its anchor row instead, so the current line keeps
    /// following execution.
    fn scroll_focused(&mut self, down: bool) {
        let nudge = |value: usize| {
            if down {
                value.saturating_add(1)
            } else {
                value.saturating_sub(1)
            }
        };
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling down moves the current line up the screen
                let anchor = &mut self.source_scroll.target_line_row;
                *anchor = anchor.map(|row| {
                    if down {
                        row.saturating_sub(1)
                    } else {
                        row.saturating_add(1)
                    }
                });
            }
            FocusedPane::Tape => {
                self.follow_pointer = false;
                self.tape_scroll = nudge(self.tape_scroll);
            }
            FocusedPane::Terminal => {
                self.terminal_scroll = nudge(self.terminal_scroll);
            }
        }
    }

    /// Step forward in execution; returns whether a step was taken
    fn step_forward(&mut self) -> bool {
        self.follow_pointer = true;
        // Auto-scroll terminal to bottom
        self.terminal_scroll = usize::MAX;
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = if self.interpreter.is_finished() {
                    "Execution finished".to_string()
                } else {
                    "Stepped forward".to_string()
                };
                true
            }
            Err(e) => {
                self.status_message = Self::describe_error(&e);
                false
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        self.follow_pointer = true;
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = Self::describe_error(&e);
            }
        }
    }

    fn describe_error(err: &RuntimeError) -> String {
        match err {
            RuntimeError::HistoryOperationFailed { message } => {
                format!("Cannot step: {}", message)
            }
            e if e.is_program_error() => format!("Runtime error: {}", e),
            e => e.to_string(),
        }
    }
}
