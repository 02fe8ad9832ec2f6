// History-keeping interpreter built on the single-step machine

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::machine::{Machine, Status};
use crate::parser::ast::{Program, SourceLocation, SourceMap};
use crate::snapshot::{Snapshot, SnapshotManager};
use tracing::debug;

/// Runs a program one step at a time and records a snapshot after every
/// executed step, so execution can be navigated backward and forward.
///
/// History position N holds the state after N steps; finishing marks the
/// latest snapshot rather than adding one.
pub struct Interpreter {
    /// Locations of the parsed commands
    source_map: SourceMap,

    /// State at the current history position
    machine: Machine,

    /// Snapshot manager for reverse execution
    snapshot_manager: SnapshotManager,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,

    /// Fatal error raised by the step after the last snapshot
    error: Option<RuntimeError>,
}

impl Interpreter {
    /// Create a new interpreter with the parsed program.
    ///
    /// The initial state is recorded as the first snapshot.
    pub fn new(program: Program, snapshot_memory_limit: usize) -> Result<Self, RuntimeError> {
        Self::with_input(program, "", snapshot_memory_limit)
    }

    /// Like [`Interpreter::new`], with text for `,` to read
    pub fn with_input(
        program: Program,
        input: &str,
        snapshot_memory_limit: usize,
    ) -> Result<Self, RuntimeError> {
        let Program {
            commands,
            source_map,
        } = program;

        let mut interpreter = Interpreter {
            source_map,
            machine: Machine::with_input(commands, input),
            snapshot_manager: SnapshotManager::new(snapshot_memory_limit),
            history_position: 0,
            error: None,
        };
        let initial = interpreter.machine.clone();
        interpreter.record(&initial)?;
        Ok(interpreter)
    }

    /// Step forward in execution: replay the next snapshot if we stepped back,
    /// otherwise execute the next step and record it
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if let Some(snapshot) = self.snapshot_manager.get(self.history_position + 1) {
            self.machine = snapshot.machine.clone();
            self.history_position += 1;
            return Ok(());
        }

        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        if self.machine.is_finished() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "program has finished".to_string(),
            });
        }

        let mut next = self.machine.clone();
        match next.step() {
            Ok(Status::Running) => {
                self.record(&next)?;
                self.machine = next;
                Ok(())
            }
            Ok(Status::Finished) => {
                // Reaching the end executes no command: the latest entry is
                // marked finished rather than followed by a duplicate
                let snapshot = Snapshot::new(&next, &self.source_map);
                self.snapshot_manager
                    .replace_last(snapshot)
                    .map_err(|_| self.snapshot_limit_error())?;
                self.machine = next;
                debug!(
                    steps = self.machine.steps(),
                    snapshots = self.snapshot_manager.len(),
                    "execution finished"
                );
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "execution failed");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "already at the beginning of execution".to_string(),
            });
        }

        self.restore(self.history_position - 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore(0)
    }

    /// Step forward until the program finishes or fails.
    ///
    /// `max_steps` bounds the number of steps this call moves through, like
    /// [`Machine::run`]: a program that finishes after exactly `max_steps`
    /// steps is not an error. Without it a non-terminating program never
    /// returns. Returns the number of steps moved through.
    pub fn run_to_end(&mut self, max_steps: Option<u64>) -> Result<u64, RuntimeError> {
        let start = self.machine.steps();
        while !self.is_at_end() {
            if let Some(limit) = max_steps {
                let taken = self.machine.steps() - start;
                if taken >= limit && !self.machine.is_exhausted() {
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
            self.step_forward()?;
        }
        Ok(self.machine.steps() - start)
    }

    /// Append `machine` to the history and move the position onto it.
    ///
    /// Nothing changes when the snapshot does not fit the memory limit.
    fn record(&mut self, machine: &Machine) -> Result<(), RuntimeError> {
        let snapshot = Snapshot::new(machine, &self.source_map);

        self.snapshot_manager
            .push(snapshot)
            .map_err(|_| self.snapshot_limit_error())?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    fn snapshot_limit_error(&self) -> RuntimeError {
        RuntimeError::SnapshotLimitExceeded {
            current: self.snapshot_manager.memory_usage(),
            limit: self.snapshot_manager.memory_limit(),
        }
    }

    /// Restore execution state from the snapshot at `index`
    fn restore(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self.snapshot_manager.get(index).ok_or_else(|| {
            RuntimeError::HistoryOperationFailed {
                message: format!("snapshot {} not found in history", index),
            }
        })?;
        self.machine = snapshot.machine.clone();
        self.history_position = index;
        Ok(())
    }

    // ========== Getter methods for UI ==========

    /// Machine state at the current history position
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Location of the next command to execute
    pub fn current_location(&self) -> Option<SourceLocation> {
        self.snapshot_manager
            .get(self.history_position)
            .and_then(|snapshot| snapshot.source_location)
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    /// Bytes currently held by the snapshot history
    pub fn memory_usage(&self) -> usize {
        self.snapshot_manager.memory_usage()
    }

    /// Whether the current state is the last one recorded
    pub fn is_latest(&self) -> bool {
        self.history_position + 1 == self.snapshot_manager.len()
    }

    /// Check if execution has finished at the current history position
    pub fn is_finished(&self) -> bool {
        self.machine.is_finished()
    }

    /// The fatal error, once the history position reaches the failing step
    pub fn error(&self) -> Option<&RuntimeError> {
        if self.is_latest() {
            self.error.as_ref()
        } else {
            None
        }
    }

    /// No further step can be taken from the current position
    fn is_at_end(&self) -> bool {
        self.is_latest() && (self.machine.is_finished() || self.error.is_some())
    }
}
