//! Resumable machine state and the single-step engine
//!
//! A [`Machine`] holds everything needed to continue a program from any point
//! between two commands: the tape, the data pointer, the position in the
//! command tree and the input/output buffers. [`Machine::step`] advances it by
//! exactly one unit of work:
//!
//! - one leaf command (`>` `<` `+` `-` `,` `.`), or
//! - one loop transition: entering or skipping a loop, or the end-of-body
//!   check that either restarts the body or leaves the loop.
//!
//! # Loop frames
//!
//! Nesting is tracked with a heap-allocated stack of [`Frame`]s rather than
//! host recursion. The counter of the enclosing sequence stays on the loop
//! command while its body runs, so a frame only needs its own counter: the body
//! to re-execute is the loop the parent counter points at, and the resume
//! point is the command after it.

use crate::interpreter::constants::TAPE_SIZE;
use crate::interpreter::errors::{Direction, RuntimeError};
use crate::memory::{Cell, Tape};
use crate::parser::ast::{Command, CommandPath, SourceLocation, SourceMap};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// One active loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Next command to execute in the loop body
    pub pc: usize,
    /// Current pass through the body, starting at 1
    pub iteration: u64,
}

/// Outcome of a successful in-place step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Finished,
}

/// Outcome of the state-passing [`step`]
#[derive(Debug, Clone)]
pub enum StepResult {
    /// One command or loop transition was executed
    Continue(Machine),
    /// Nothing remains at any nesting level
    Finished(Machine),
    /// Fatal runtime error; the state that raised it is discarded
    Failed(RuntimeError),
}

/// Resumable execution state of one program run
#[derive(Debug, Clone)]
pub struct Machine {
    program: Arc<[Command]>,
    tape: Tape,
    pointer: usize,

    /// Counter into the top-level sequence
    pc: usize,

    /// Active loops, outermost first
    frames: Vec<Frame>,

    /// Input not yet read by `,`
    pending_input: VecDeque<char>,

    /// Input already read by `,`
    input: String,

    output: String,

    /// Steps that executed a command or transition
    steps: u64,

    finished: bool,
}

impl Machine {
    /// Create a fresh machine: pointer 0, zeroed tape, empty buffers
    pub fn new(commands: Vec<Command>) -> Self {
        Self::with_input(commands, "")
    }

    /// Create a fresh machine whose `,` commands read from `input`
    pub fn with_input(commands: Vec<Command>, input: &str) -> Self {
        Machine {
            program: Arc::from(commands),
            tape: Tape::new(),
            pointer: 0,
            pc: 0,
            frames: Vec::new(),
            pending_input: input.chars().collect(),
            input: String::new(),
            output: String::new(),
            steps: 0,
            finished: false,
        }
    }

    /// Append more text for `,` to read
    pub fn push_input(&mut self, text: &str) {
        self.pending_input.extend(text.chars());
    }

    /// Advance by one command or loop transition.
    ///
    /// On error the machine is left exactly as it was before the call. Once
    /// finished, further calls return [`Status::Finished`] and change nothing.
    pub fn step(&mut self) -> Result<Status, RuntimeError> {
        if self.finished {
            return Ok(Status::Finished);
        }

        let program = Arc::clone(&self.program);
        let sequence = resolve_sequence(&program, self.pc, &self.frames);

        match sequence.get(self.current_pc()) {
            Some(Command::MoveRight) => {
                if self.pointer + 1 >= TAPE_SIZE {
                    return Err(RuntimeError::PointerOutOfRange {
                        pointer: self.pointer,
                        direction: Direction::Right,
                    });
                }
                self.pointer += 1;
                self.advance();
            }
            Some(Command::MoveLeft) => {
                self.pointer = self.pointer.checked_sub(1).ok_or(
                    RuntimeError::PointerOutOfRange {
                        pointer: self.pointer,
                        direction: Direction::Left,
                    },
                )?;
                self.advance();
            }
            Some(Command::Increment) => {
                self.tape.increment(self.pointer)?;
                self.advance();
            }
            Some(Command::Decrement) => {
                self.tape.decrement(self.pointer)?;
                self.advance();
            }
            Some(Command::WriteOutput) => {
                let value = self.tape.read(self.pointer)?;
                self.output.push(char::from(value));
                self.advance();
            }
            Some(Command::ReadInput) => {
                // Without pending input `,` leaves the cell untouched
                if let Some(&c) = self.pending_input.front() {
                    self.tape.write(self.pointer, c as u32 as Cell)?;
                    self.pending_input.pop_front();
                    self.input.push(c);
                }
                self.advance();
            }
            Some(Command::Loop(_)) => {
                if self.tape.read(self.pointer)? == 0 {
                    trace!(depth = self.frames.len(), "loop skipped");
                    self.advance();
                } else {
                    self.frames.push(Frame { pc: 0, iteration: 1 });
                    trace!(depth = self.frames.len(), "loop entered");
                }
            }
            None => match self.frames.last_mut() {
                None => {
                    self.finished = true;
                    debug!(steps = self.steps, "program finished");
                    return Ok(Status::Finished);
                }
                Some(frame) => {
                    if self.tape.read(self.pointer)? == 0 {
                        trace!(iterations = frame.iteration, "loop exited");
                        self.frames.pop();
                        self.advance();
                    } else {
                        frame.pc = 0;
                        frame.iteration += 1;
                    }
                }
            },
        }

        self.steps += 1;
        Ok(Status::Running)
    }

    /// Step until the program finishes.
    ///
    /// Without a budget this never returns for a program that loops forever.
    /// With `Some(limit)`, more than `limit` steps in this call yields
    /// [`RuntimeError::StepLimitExceeded`] and leaves the machine resumable.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<(), RuntimeError> {
        let start = self.steps;
        loop {
            if let Some(limit) = max_steps {
                if self.steps - start >= limit && !self.is_exhausted() {
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
            if self.step()? == Status::Finished {
                return Ok(());
            }
        }
    }

    fn current_pc(&self) -> usize {
        self.frames.last().map_or(self.pc, |frame| frame.pc)
    }

    fn advance(&mut self) {
        match self.frames.last_mut() {
            Some(frame) => frame.pc += 1,
            None => self.pc += 1,
        }
    }

    /// True when the next step can only report the end of the program.
    ///
    /// That step executes no command, so step budgets do not count it.
    pub fn is_exhausted(&self) -> bool {
        self.finished || (self.frames.is_empty() && self.pc >= self.program.len())
    }

    // ========== Accessors ==========

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Full tape contents
    pub fn tape(&self) -> &[Cell] {
        self.tape.cells()
    }

    /// Value under the pointer
    pub fn current_cell(&self) -> Cell {
        self.tape.cells()[self.pointer]
    }

    /// Index of the last non-zero cell, if any
    pub fn highest_used_cell(&self) -> Option<usize> {
        self.tape.highest_used()
    }

    /// Text produced by `.` so far
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Text consumed by `,` so far
    pub fn input_consumed(&self) -> &str {
        &self.input
    }

    pub fn pending_input(&self) -> &VecDeque<char> {
        &self.pending_input
    }

    pub fn program(&self) -> &[Command] {
        &self.program
    }

    /// Number of loops currently executing
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The command the next step will execute, or `None` when the next step
    /// is an end-of-body check or the end of the program
    pub fn next_command(&self) -> Option<&Command> {
        resolve_sequence(&self.program, self.pc, &self.frames).get(self.current_pc())
    }

    /// Path of the next position in the command tree.
    ///
    /// When a loop body is exhausted the last index equals the body length.
    pub fn current_path(&self) -> CommandPath {
        let mut path = Vec::with_capacity(self.frames.len() + 1);
        path.push(self.pc);
        path.extend(self.frames.iter().map(|frame| frame.pc));
        path
    }

    /// Source location of the next step: the next command, or the closing
    /// bracket of the innermost loop when its body is exhausted
    pub fn current_location(&self, source_map: &SourceMap) -> Option<SourceLocation> {
        if self.finished {
            return None;
        }
        let path = self.current_path();
        if self.next_command().is_some() {
            source_map.command(&path)
        } else if !self.frames.is_empty() {
            source_map.loop_end(&path[..path.len() - 1])
        } else {
            None
        }
    }
}

/// The innermost sequence currently executing
fn resolve_sequence<'a>(program: &'a [Command], pc: usize, frames: &[Frame]) -> &'a [Command] {
    let mut sequence = program;
    let mut parent_pc = pc;
    for frame in frames {
        sequence = match sequence.get(parent_pc) {
            Some(Command::Loop(body)) => body,
            _ => unreachable!("loop frame without an enclosing loop command"),
        };
        parent_pc = frame.pc;
    }
    sequence
}

/// Execute one step, passing the state through by value
pub fn step(mut machine: Machine) -> StepResult {
    match machine.step() {
        Ok(Status::Running) => StepResult::Continue(machine),
        Ok(Status::Finished) => StepResult::Finished(machine),
        Err(e) => StepResult::Failed(e),
    }
}

/// Step until finished. Never returns for a non-terminating program.
pub fn run(mut machine: Machine) -> Result<Machine, RuntimeError> {
    machine.run(None)?;
    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Parser};

    fn machine(source: &str) -> Machine {
        Machine::new(parse(source).unwrap())
    }

    #[test]
    fn test_one_command_per_step() {
        let mut m = machine("++");

        assert_eq!(m.step(), Ok(Status::Running));
        assert_eq!(m.step(), Ok(Status::Running));
        assert_eq!(m.step(), Ok(Status::Finished));
        assert_eq!(m.steps(), 2);
        assert_eq!(m.current_cell(), 2);
    }

    #[test]
    fn test_finished_is_terminal() {
        let mut m = machine("+");
        m.run(None).unwrap();

        let before = m.clone();
        assert_eq!(m.step(), Ok(Status::Finished));
        assert_eq!(m.steps(), before.steps());
        assert_eq!(m.tape(), before.tape());
    }

    #[test]
    fn test_move_left_at_origin_fails() {
        let mut m = machine("<");
        let err = m.step().unwrap_err();

        assert_eq!(
            err,
            RuntimeError::PointerOutOfRange {
                pointer: 0,
                direction: Direction::Left
            }
        );
        assert!(err.to_string().starts_with("pointer out of range"));
        // The failing step changed nothing
        assert_eq!(m.pointer(), 0);
        assert_eq!(m.steps(), 0);
        assert_eq!(m.current_path(), vec![0]);
    }

    #[test]
    fn test_move_right_to_last_cell() {
        let mut m = machine(&">".repeat(TAPE_SIZE - 1));
        m.run(None).unwrap();
        assert_eq!(m.pointer(), TAPE_SIZE - 1);

        let mut m = machine(&">".repeat(TAPE_SIZE));
        for _ in 0..TAPE_SIZE - 1 {
            assert_eq!(m.step(), Ok(Status::Running));
        }
        assert!(matches!(
            m.step(),
            Err(RuntimeError::PointerOutOfRange {
                direction: Direction::Right,
                ..
            })
        ));
    }

    #[test]
    fn test_cells_wrap() {
        let mut m = machine("-");
        m.run(None).unwrap();
        assert_eq!(m.current_cell(), 255);

        let mut m = machine(&"+".repeat(256));
        m.run(None).unwrap();
        assert_eq!(m.current_cell(), 0);
    }

    #[test]
    fn test_write_output() {
        let mut m = machine("+++.");
        m.run(None).unwrap();

        assert_eq!(m.output().chars().collect::<Vec<_>>(), vec!['\u{3}']);
    }

    #[test]
    fn test_high_cells_output_latin1() {
        let mut m = machine("-.");
        m.run(None).unwrap();
        assert_eq!(m.output(), "\u{ff}");
    }

    #[test]
    fn test_read_input() {
        let mut m = Machine::with_input(parse(",>,>,").unwrap(), "Aé");
        m.run(None).unwrap();

        assert_eq!(&m.tape()[..3], &[65, 0xe9, 0]);
        assert_eq!(m.input_consumed(), "Aé");
        assert!(m.pending_input().is_empty());
    }

    #[test]
    fn test_read_without_input_is_noop() {
        let mut m = machine("+++,");
        m.run(None).unwrap();

        assert_eq!(m.current_cell(), 3);
        assert_eq!(m.steps(), 4);
        assert!(m.input_consumed().is_empty());
    }

    #[test]
    fn test_push_input() {
        let mut m = machine(",");
        m.push_input("z");
        m.run(None).unwrap();
        assert_eq!(m.current_cell(), b'z');
    }

    #[test]
    fn test_zero_cell_skips_loop_in_one_step() {
        let mut m = machine("[+++]+");

        assert_eq!(m.step(), Ok(Status::Running));
        assert_eq!(m.depth(), 0);
        assert_eq!(m.current_path(), vec![1]);
        assert_eq!(m.step(), Ok(Status::Running));
        assert_eq!(m.step(), Ok(Status::Finished));
        assert_eq!(m.current_cell(), 1);
    }

    #[test]
    fn test_loop_transitions() {
        // + [ - ] : enter, one pass of '-', exit check
        let mut m = machine("+[-]");

        m.step().unwrap(); // +
        m.step().unwrap(); // enter
        assert_eq!(m.depth(), 1);
        assert_eq!(m.next_command(), Some(&Command::Decrement));
        m.step().unwrap(); // -
        assert_eq!(m.next_command(), None);
        m.step().unwrap(); // cell is zero: leave
        assert_eq!(m.depth(), 0);
        assert_eq!(m.step(), Ok(Status::Finished));
        assert_eq!(m.steps(), 4);
    }

    #[test]
    fn test_loop_reentry_counts_iterations() {
        let mut m = machine("++[-]");
        for _ in 0..5 {
            m.step().unwrap();
        }
        // '+', '+', enter, '-', end-of-body check restarts the body
        assert_eq!(m.frames(), &[Frame { pc: 0, iteration: 2 }]);
    }

    #[test]
    fn test_clear_loop_terminates() {
        let mut m = machine("+++[-]");
        m.run(None).unwrap();

        assert!(m.is_finished());
        assert_eq!(m.tape()[0], 0);
    }

    #[test]
    fn test_nested_loops() {
        // 4 * 3 accumulated in cell 2 through cell 1
        let mut m = machine("++++[>+++[>+<-]<-]>>");
        m.run(None).unwrap();

        assert_eq!(&m.tape()[..3], &[0, 0, 12]);
        assert_eq!(m.pointer(), 2);
    }

    #[test]
    fn test_step_limit() {
        let mut m = machine("+[]");
        let err = m.run(Some(100)).unwrap_err();

        assert_eq!(err, RuntimeError::StepLimitExceeded { limit: 100 });
        assert_eq!(m.steps(), 100);
        assert!(!m.is_finished());
    }

    #[test]
    fn test_step_limit_allows_exact_budget() {
        let mut m = machine("++");
        m.run(Some(2)).unwrap();
        assert!(m.is_finished());
    }

    #[test]
    fn test_state_passing_api() {
        let mut result = step(machine("++"));
        let mut continues = 0;
        loop {
            match result {
                StepResult::Continue(m) => {
                    continues += 1;
                    result = step(m);
                }
                StepResult::Finished(m) => {
                    assert_eq!(m.current_cell(), 2);
                    break;
                }
                StepResult::Failed(e) => panic!("unexpected failure: {}", e),
            }
        }
        assert_eq!(continues, 2);

        assert!(matches!(step(machine("<")), StepResult::Failed(_)));
        assert_eq!(run(machine("+.")).unwrap().output(), "\u{1}");
    }

    #[test]
    fn test_current_location() {
        let program = Parser::new("+\n[-]").parse_program().unwrap();
        let map = &program.source_map;
        let mut m = Machine::new(program.commands.clone());

        assert_eq!(m.current_location(map), Some(SourceLocation::new(1, 1)));
        m.step().unwrap();
        assert_eq!(m.current_location(map), Some(SourceLocation::new(2, 1)));
        m.step().unwrap();
        assert_eq!(m.current_location(map), Some(SourceLocation::new(2, 2)));
        m.step().unwrap();
        // End-of-body check points at the closing bracket
        assert_eq!(m.current_location(map), Some(SourceLocation::new(2, 3)));
        m.step().unwrap();
        assert_eq!(m.current_location(map), None);
    }

    #[test]
    fn test_deep_nesting_runs_without_recursion() {
        let depth = 2_000;
        let source = format!("+{}-{}", "[".repeat(depth), "]".repeat(depth));
        let mut m = machine(&source);
        m.run(None).unwrap();

        assert_eq!(m.current_cell(), 0);
        assert!(m.is_finished());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::parser::parse;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pointer_stays_on_tape(source in "[<>+\\-.\\[\\]]{0,64}") {
            if let Ok(commands) = parse(&source) {
                let mut m = Machine::new(commands);
                for _ in 0..2000 {
                    match m.step() {
                        Ok(Status::Running) => prop_assert!(m.pointer() < TAPE_SIZE),
                        Ok(Status::Finished) => break,
                        Err(e) => {
                            prop_assert!(e.is_program_error());
                            break;
                        }
                    }
                }
            }
        }

        #[test]
        fn step_budget_is_respected(source in "[<>+\\-\\[\\]]{0,64}", limit in 1u64..500) {
            if let Ok(commands) = parse(&source) {
                let mut m = Machine::new(commands);
                let _ = m.run(Some(limit));
                prop_assert!(m.steps() <= limit);
            }
        }
    }
}
