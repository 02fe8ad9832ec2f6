// Fixed-size memory tape

use crate::interpreter::constants::TAPE_SIZE;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Cell;

/// The interpreter's linear memory: `TAPE_SIZE` cells, all starting at zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Cell>,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            cells: vec![0; TAPE_SIZE],
        }
    }

    /// Number of cells (always `TAPE_SIZE`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, for display
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Value of the cell at `index`
    pub fn read(&self, index: usize) -> Result<Cell, RuntimeError> {
        self.cells
            .get(index)
            .copied()
            .ok_or(RuntimeError::InvalidCell { index })
    }

    pub fn write(&mut self, index: usize, value: Cell) -> Result<(), RuntimeError> {
        *self.cell_mut(index)? = value;
        Ok(())
    }

    /// Add one to the cell at `index`, wrapping 255 → 0
    pub fn increment(&mut self, index: usize) -> Result<(), RuntimeError> {
        let cell = self.cell_mut(index)?;
        *cell = cell.wrapping_add(1);
        Ok(())
    }

    /// Subtract one from the cell at `index`, wrapping 0 → 255
    pub fn decrement(&mut self, index: usize) -> Result<(), RuntimeError> {
        let cell = self.cell_mut(index)?;
        *cell = cell.wrapping_sub(1);
        Ok(())
    }

    /// Index of the last non-zero cell, if any
    pub fn highest_used(&self) -> Option<usize> {
        self.cells.iter().rposition(|&c| c != 0)
    }

    fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, RuntimeError> {
        self.cells
            .get_mut(index)
            .ok_or(RuntimeError::InvalidCell { index })
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_is_zeroed() {
        let tape = Tape::new();
        assert_eq!(tape.len(), TAPE_SIZE);
        assert!(tape.cells().iter().all(|&c| c == 0));
        assert_eq!(tape.highest_used(), None);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let mut tape = Tape::new();
        tape.decrement(0).unwrap();
        assert_eq!(tape.read(0).unwrap(), 255);
        tape.increment(0).unwrap();
        assert_eq!(tape.read(0).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut tape = Tape::new();
        assert!(matches!(
            tape.read(TAPE_SIZE),
            Err(RuntimeError::InvalidCell { index }) if index == TAPE_SIZE
        ));
        assert!(tape.increment(TAPE_SIZE).is_err());
        assert!(tape.write(TAPE_SIZE + 5, 1).is_err());
    }

    #[test]
    fn test_highest_used() {
        let mut tape = Tape::new();
        tape.write(7, 3).unwrap();
        tape.write(2, 1).unwrap();
        assert_eq!(tape.highest_used(), Some(7));
    }
}
