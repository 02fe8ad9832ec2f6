// Snapshot management for reverse execution

use crate::interpreter::machine::{Frame, Machine};
use crate::parser::ast::{SourceLocation, SourceMap};

/// Snapshot of execution state after a step
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub machine: Machine,
    pub source_location: Option<SourceLocation>,
}

impl Snapshot {
    pub fn new(machine: &Machine, source_map: &SourceMap) -> Self {
        Snapshot {
            machine: machine.clone(),
            source_location: machine.current_location(source_map),
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // The command tree is shared between snapshots and not counted
        let tape_size = self.machine.tape().len();
        let frames_size = self.machine.depth() * std::mem::size_of::<Frame>();
        let text_size = self.machine.output().len()
            + self.machine.input_consumed().len()
            + self.machine.pending_input().len() * std::mem::size_of::<char>();

        std::mem::size_of::<Snapshot>() + tape_size + frames_size + text_size
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Swap the most recent snapshot for `snapshot`
    pub fn replace_last(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();
        let last = match self.snapshots.last_mut() {
            Some(last) => last,
            None => return Err("No snapshot to replace".to_string()),
        };

        let remaining = self.current_memory - last.estimated_size();
        if remaining + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                remaining, snapshot_size, self.max_memory
            ));
        }

        self.current_memory = remaining + snapshot_size;
        *last = snapshot;
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
