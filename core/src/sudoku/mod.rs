//! Sudoku with generated puzzles, live conflict marking and a limited hint budget.

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::*;
pub use generator::*;

mod generator;

pub const SIZE: u8 = 9;

/// Digits of a grid, `0` for an empty cell.
pub type Digits = Array2<u8>;

pub fn empty_digits() -> Digits {
    Array2::zeros((usize::from(SIZE), usize::from(SIZE)))
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn cells_to_remove(self) -> usize {
        match self {
            Self::Easy => 40,
            Self::Medium => 50,
            Self::Hard => 60,
        }
    }

    pub const fn hint_budget(self) -> u8 {
        match self {
            Self::Easy => 5,
            Self::Medium => 3,
            Self::Hard => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub grid: Digits,
    pub solution: Digits,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuCell {
    pub value: u8,
    /// Part of the generated puzzle and therefore fixed.
    pub original: bool,
    /// Shares a row, column or box with the selected cell.
    pub highlighted: bool,
    /// Conflicts with another digit in its row, column or box.
    pub error: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    Entered { conflict: bool },
    Cleared,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sudoku {
    cells: Array2<SudokuCell>,
    solution: Digits,
    difficulty: Difficulty,
    selected: Option<Coord2>,
    hints_left: u8,
    mistakes: u32,
    phase: Phase,
}

impl Persist for Sudoku {
    const KIND: GameKind = GameKind::Sudoku;
}

impl Sudoku {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        Self::from_puzzle(difficulty, generate_puzzle(difficulty, rng))
    }

    pub fn from_puzzle(difficulty: Difficulty, puzzle: Puzzle) -> Self {
        let cells = puzzle.grid.mapv(|value| SudokuCell {
            value,
            original: value != 0,
            ..Default::default()
        });
        Self {
            cells,
            solution: puzzle.solution,
            difficulty,
            selected: None,
            hints_left: difficulty.hint_budget(),
            mistakes: 0,
            phase: Phase::Playing,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<SudokuCell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn cells(&self) -> &Array2<SudokuCell> {
        &self.cells
    }

    pub fn digits(&self) -> Digits {
        self.cells.mapv(|cell| cell.value)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.selected
    }

    pub fn hints_left(&self) -> u8 {
        self.hints_left
    }

    /// Entries that differ from the stored solution. Counted, never shown as errors.
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn select(&mut self, coords: Coord2) -> Result<()> {
        if !in_bounds(coords, (SIZE, SIZE)) {
            return Err(GameError::InvalidCoords);
        }
        self.selected = Some(coords);
        let (row, col) = coords;
        for ((r, c), cell) in self.cells.indexed_iter_mut() {
            let (r, c) = (r as Coord, c as Coord);
            cell.highlighted = r == row || c == col || (r / 3 == row / 3 && c / 3 == col / 3);
        }
        Ok(())
    }

    /// Writes `digit` into the selected cell; `0` clears it.
    pub fn enter(&mut self, digit: u8) -> Result<EntryOutcome> {
        self.phase.check_playing()?;
        if digit > SIZE {
            return Err(GameError::InvalidDigit(digit));
        }
        let coords = self.editable_selection()?;
        let index = coords.to_nd_index();

        self.cells[index].value = digit;
        if digit != 0 && digit != self.solution[index] {
            self.mistakes += 1;
        }
        self.refresh_errors();

        if self.is_complete() {
            self.phase = Phase::Finished;
            return Ok(EntryOutcome::Completed);
        }
        Ok(if digit == 0 {
            EntryOutcome::Cleared
        } else {
            EntryOutcome::Entered {
                conflict: self.cells[index].error,
            }
        })
    }

    /// Reveals the solution digit of the selected cell.
    pub fn hint(&mut self) -> Result<EntryOutcome> {
        self.phase.check_playing()?;
        if self.hints_left == 0 {
            return Err(GameError::NoHintsLeft);
        }
        let coords = self.editable_selection()?;
        let index = coords.to_nd_index();

        self.hints_left -= 1;
        self.cells[index].value = self.solution[index];
        self.refresh_errors();

        if self.is_complete() {
            self.phase = Phase::Finished;
            return Ok(EntryOutcome::Completed);
        }
        Ok(EntryOutcome::Entered {
            conflict: self.cells[index].error,
        })
    }

    fn editable_selection(&self) -> Result<Coord2> {
        let coords = self.selected.ok_or(GameError::NoSelection)?;
        if self.cells[coords.to_nd_index()].original {
            return Err(GameError::OriginalCell);
        }
        Ok(coords)
    }

    fn refresh_errors(&mut self) {
        let digits = self.digits();
        for ((r, c), cell) in self.cells.indexed_iter_mut() {
            cell.error = cell.value != 0
                && !is_valid_placement(&digits, (r as Coord, c as Coord), cell.value);
        }
    }

    /// Every cell filled and free of conflicts; the stored solution is not consulted.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.value != 0 && !cell.error)
    }
}
