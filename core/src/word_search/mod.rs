//! Word search: find the hidden words of a category by selecting straight runs of letters.

use ndarray::Array2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;
pub use generator::*;
pub use words::*;

mod generator;
mod words;

pub const GRID_SIZE: Coord = 16;
pub const MIN_WORDS: u8 = 8;
pub const MAX_WORDS: u8 = 12;

/// Points per letter of a main word.
pub const WORD_POINTS: u32 = 10;
/// Points per letter of a bonus word.
pub const BONUS_POINTS: u32 = 25;

/// Where a word was hidden, reading forward from `start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub word: String,
    pub start: Coord2,
    pub direction: Direction,
    pub bonus: bool,
}

impl Placement {
    pub fn cells(&self) -> Vec<Coord2> {
        self.direction
            .walk(self.start, self.word.len(), (GRID_SIZE, GRID_SIZE))
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordSearchGrid {
    pub grid: Array2<char>,
    /// Main words, all required to finish.
    pub words: Vec<String>,
    pub bonus_words: Vec<String>,
    pub placements: Vec<Placement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Miss,
    Found { word: String, bonus: bool, points: u32 },
    /// The last main word was found.
    Completed { word: String, points: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordSearch {
    category: Category,
    puzzle: WordSearchGrid,
    found: Vec<String>,
    found_cells: Array2<bool>,
    score: u32,
    phase: Phase,
}

impl Persist for WordSearch {
    const KIND: GameKind = GameKind::WordSearch;
}

impl WordSearch {
    pub fn new<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Self {
        Self::from_grid(category, generate_grid(category, rng))
    }

    pub fn from_grid(category: Category, puzzle: WordSearchGrid) -> Self {
        let found_cells = Array2::default(puzzle.grid.raw_dim());
        Self {
            category,
            puzzle,
            found: Vec::new(),
            found_cells,
            score: 0,
            phase: Phase::Playing,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn grid(&self) -> &Array2<char> {
        &self.puzzle.grid
    }

    pub fn words(&self) -> &[String] {
        &self.puzzle.words
    }

    pub fn bonus_words(&self) -> &[String] {
        &self.puzzle.bonus_words
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|found| found == word)
    }

    /// Whether `coords` belongs to a word found so far.
    pub fn is_found_cell(&self, coords: Coord2) -> bool {
        self.found_cells
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cells from `from` to `to` inclusive, if they form a horizontal, vertical or diagonal line.
    pub fn selection_cells(from: Coord2, to: Coord2) -> Result<Vec<Coord2>> {
        let bounds = (GRID_SIZE, GRID_SIZE);
        if !in_bounds(from, bounds) || !in_bounds(to, bounds) {
            return Err(GameError::InvalidCoords);
        }
        if from == to {
            return Ok(vec![from]);
        }
        let direction = Direction::between(from, to).ok_or(GameError::InvalidSelection)?;
        let len = usize::from(from.0.abs_diff(to.0).max(from.1.abs_diff(to.1))) + 1;
        direction
            .walk(from, len, bounds)
            .ok_or(GameError::InvalidSelection)
    }

    /// Checks the run of letters from `from` to `to` against the words not found yet.
    ///
    /// A word matches when read in either direction.
    pub fn select(&mut self, from: Coord2, to: Coord2) -> Result<SelectionOutcome> {
        self.phase.check_playing()?;
        let cells = Self::selection_cells(from, to)?;
        let forward: String = cells
            .iter()
            .map(|&cell| self.puzzle.grid[cell.to_nd_index()])
            .collect();
        let backward: String = forward.chars().rev().collect();

        let matched = self
            .puzzle
            .words
            .iter()
            .map(|word| (word, false))
            .chain(self.puzzle.bonus_words.iter().map(|word| (word, true)))
            .find(|&(word, _)| (*word == forward || *word == backward) && !self.is_found(word))
            .map(|(word, bonus)| (word.clone(), bonus));
        let Some((word, bonus)) = matched else {
            return Ok(SelectionOutcome::Miss);
        };

        let per_letter = if bonus { BONUS_POINTS } else { WORD_POINTS };
        let points = per_letter * word.len() as u32;
        self.score += points;
        for cell in cells {
            self.found_cells[cell.to_nd_index()] = true;
        }
        self.found.push(word.clone());
        log::trace!("found {word} for {points} points");

        if self.puzzle.words.iter().all(|word| self.is_found(word)) {
            self.phase = Phase::Finished;
            return Ok(SelectionOutcome::Completed { word, points });
        }
        Ok(SelectionOutcome::Found {
            word,
            bonus,
            points,
        })
    }
}
