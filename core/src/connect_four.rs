//! Connect Four against a second player or the computer.
//!
//! The board is 6 rows by 7 columns with row 0 at the top; discs fall to the lowest empty row.

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

pub const ROWS: Coord = 6;
pub const COLS: Coord = 7;
pub const CONNECT: usize = 4;

/// Plies searched after the computer's candidate move.
pub const SEARCH_DEPTH: u32 = 4;
pub const FALLBACK_COLUMN: usize = 3;
pub const AI_DELAY: Duration = Duration::from_millis(500);

const WIN_SCORE: i32 = 1000;
const WINDOW_FOUR: i32 = 100;
const WINDOW_THREE: i32 = 10;
const WINDOW_TWO: i32 = 2;
const WINDOW_OPPONENT_THREE: i32 = 80;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disc {
    One,
    Two,
}

impl Disc {
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// The computer always plays the second disc.
pub const AI: Disc = Disc::Two;

pub type Grid = Array2<Option<Disc>>;

pub fn empty_grid() -> Grid {
    Array2::default((ROWS, COLS).to_nd_index())
}

/// Lowest empty row of `col`, if the column is on the board and not full.
pub fn landing_row(grid: &Grid, col: usize) -> Option<Coord> {
    if col >= usize::from(COLS) {
        return None;
    }
    (0..ROWS).rev().find(|&row| grid[[usize::from(row), col]].is_none())
}

pub fn valid_columns(grid: &Grid) -> impl Iterator<Item = usize> + '_ {
    (0..usize::from(COLS)).filter(|&col| grid[[0, col]].is_none())
}

/// The full contiguous run through `placed` if it reaches four, ordered end to end.
///
/// Directions are scanned horizontal, vertical, then both diagonals.
pub fn winning_run(grid: &Grid, placed: Coord2) -> Option<Vec<Coord2>> {
    let disc = grid[placed.to_nd_index()]?;
    let bounds = board_size(grid);
    let same = |coords: &Coord2| grid[coords.to_nd_index()] == Some(disc);

    Direction::AXES.into_iter().find_map(|dir| {
        let mut back: Vec<Coord2> =
            core::iter::successors(dir.opposite().step(placed, bounds), |&c| {
                dir.opposite().step(c, bounds)
            })
            .take_while(same)
            .collect();
        back.reverse();
        let forward = core::iter::successors(dir.step(placed, bounds), |&c| dir.step(c, bounds))
            .take_while(same);

        let mut run = back;
        run.push(placed);
        run.extend(forward);
        (run.len() >= CONNECT).then_some(run)
    })
}

fn drop_disc(grid: &mut Grid, col: usize, disc: Disc) -> Option<Coord2> {
    let row = landing_row(grid, col)?;
    let coords = (row, col.try_into().ok()?);
    grid[coords.to_nd_index()] = Some(disc);
    Some(coords)
}

fn score_window(window: &[Option<Disc>], disc: Disc) -> i32 {
    let own = window.iter().filter(|&&c| c == Some(disc)).count();
    let opponent = window.iter().filter(|&&c| c == Some(disc.opponent())).count();
    let empty = window.len() - own - opponent;

    let mut score = match (own, empty) {
        (4, _) => WINDOW_FOUR,
        (3, 1) => WINDOW_THREE,
        (2, 2) => WINDOW_TWO,
        _ => 0,
    };
    if opponent == 3 && empty == 1 {
        score -= WINDOW_OPPONENT_THREE;
    }
    score
}

/// Heuristic value of the position for `disc`, summed over every 4-cell window.
pub fn evaluate(grid: &Grid, disc: Disc) -> i32 {
    let bounds = board_size(grid);
    let mut score = 0;
    let mut window = Vec::with_capacity(CONNECT);
    for row in 0..ROWS {
        for col in 0..COLS {
            for dir in Direction::AXES {
                let Some(cells) = dir.walk((row, col), CONNECT, bounds) else {
                    continue;
                };
                window.clear();
                window.extend(cells.iter().map(|c| grid[c.to_nd_index()]));
                score += score_window(&window, disc);
            }
        }
    }
    score
}

fn minimax(grid: &mut Grid, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
    let columns: Vec<usize> = valid_columns(grid).collect();
    if depth == 0 || columns.is_empty() {
        return evaluate(grid, AI);
    }

    let (disc, terminal) = if maximizing {
        (AI, WIN_SCORE)
    } else {
        (AI.opponent(), -WIN_SCORE)
    };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for col in columns {
        let Some(placed) = drop_disc(grid, col, disc) else {
            continue;
        };
        let score = if winning_run(grid, placed).is_some() {
            terminal
        } else {
            minimax(grid, depth - 1, alpha, beta, !maximizing)
        };
        grid[placed.to_nd_index()] = None;

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Column the computer plays on `grid`.
///
/// An immediate win is taken without searching. Otherwise each column is searched with
/// alpha-beta minimax and the first column with the strictly highest score is chosen.
pub fn ai_move(grid: &Grid) -> usize {
    let mut scratch = grid.clone();

    for col in valid_columns(grid) {
        if let Some(placed) = drop_disc(&mut scratch, col, AI) {
            let wins = winning_run(&scratch, placed).is_some();
            scratch[placed.to_nd_index()] = None;
            if wins {
                log::debug!("ai takes the immediate win in column {col}");
                return col;
            }
        }
    }

    let mut best_score = i32::MIN;
    let mut best_col = FALLBACK_COLUMN;
    for col in valid_columns(grid) {
        let Some(placed) = drop_disc(&mut scratch, col, AI) else {
            continue;
        };
        let score = minimax(&mut scratch, SEARCH_DEPTH, i32::MIN, i32::MAX, false);
        scratch[placed.to_nd_index()] = None;
        log::trace!("column {col} scores {score}");
        if score > best_score {
            best_score = score;
            best_col = col;
        }
    }
    log::debug!("ai picks column {best_col} with score {best_score}");
    best_col
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Disc(Disc),
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Placed(Coord2),
    Won { disc: Disc, run: Vec<Coord2> },
    Draw,
}

/// Scheduled work for the computer opponent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    AiTurn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectFour {
    grid: Grid,
    current: Disc,
    vs_ai: bool,
    is_thinking: bool,
    phase: Phase,
    winner: Option<Winner>,
    winning_cells: Vec<Coord2>,
    moves: Vec<usize>,
}

impl Persist for ConnectFour {
    const KIND: GameKind = GameKind::ConnectFour;
}

impl ConnectFour {
    pub fn new(vs_ai: bool) -> Self {
        Self {
            grid: empty_grid(),
            current: Disc::One,
            vs_ai,
            is_thinking: false,
            phase: Phase::Playing,
            winner: None,
            winning_cells: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> Disc {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn winning_cells(&self) -> &[Coord2] {
        &self.winning_cells
    }

    pub fn is_thinking(&self) -> bool {
        self.is_thinking
    }

    /// Columns played so far, in order.
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    /// Step to reschedule after restoring a game saved while the computer was thinking.
    pub fn pending_step(&self) -> Option<(Duration, Step)> {
        self.is_thinking.then_some((AI_DELAY, Step::AiTurn))
    }

    /// Human move. When playing the computer, the returned step must be scheduled.
    pub fn play(&mut self, col: usize) -> Result<(DropOutcome, Option<(Duration, Step)>)> {
        if self.is_thinking || (self.vs_ai && self.current == AI) {
            return Err(GameError::Busy);
        }
        let outcome = self.apply(col)?;
        let follow_up = if self.vs_ai && self.phase.is_playing() {
            self.is_thinking = true;
            Some((AI_DELAY, Step::AiTurn))
        } else {
            None
        };
        Ok((outcome, follow_up))
    }

    fn apply(&mut self, col: usize) -> Result<DropOutcome> {
        self.phase.check_playing()?;
        if col >= usize::from(COLS) {
            return Err(GameError::InvalidCoords);
        }
        let disc = self.current;
        let placed = drop_disc(&mut self.grid, col, disc).ok_or(GameError::ColumnFull)?;
        self.moves.push(col);

        if let Some(run) = winning_run(&self.grid, placed) {
            self.phase = Phase::Finished;
            self.winner = Some(Winner::Disc(disc));
            self.winning_cells = run.clone();
            return Ok(DropOutcome::Won { disc, run });
        }
        if valid_columns(&self.grid).next().is_none() {
            self.phase = Phase::Finished;
            self.winner = Some(Winner::Draw);
            return Ok(DropOutcome::Draw);
        }
        self.current = disc.opponent();
        Ok(DropOutcome::Placed(placed))
    }
}

impl Animated for ConnectFour {
    type Step = Step;

    fn advance<R: Rng + ?Sized>(&mut self, step: Step, _rng: &mut R) -> Option<(Duration, Step)> {
        match step {
            Step::AiTurn => {
                if !self.is_thinking {
                    return None;
                }
                self.is_thinking = false;
                if self.phase.is_playing() && self.current == AI {
                    let col = ai_move(&self.grid);
                    if let Err(err) = self.apply(col) {
                        log::warn!("ai move in column {col} rejected: {err}");
                    }
                }
                None
            }
        }
    }
}
