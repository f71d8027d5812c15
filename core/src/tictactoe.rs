//! Tic-Tac-Toe on one to three simultaneous boards for two or three players.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

pub const CELLS: usize = 9;

/// The 8 lines that win a board: rows, columns, then the two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub type Cells = [Option<PlayerId>; CELLS];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub player: PlayerId,
    pub line: [usize; 3],
}

/// Finds a line fully occupied by a single player.
pub fn check_winner(cells: &Cells) -> Option<WinLine> {
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        match (cells[a], cells[b], cells[c]) {
            (Some(x), Some(y), Some(z)) if x == y && y == z => Some(WinLine { player: x, line }),
            _ => None,
        }
    })
}

pub fn is_full(cells: &Cells) -> bool {
    cells.iter().all(Option::is_some)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    Open,
    Won(WinLine),
    Draw,
}

impl BoardStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub cells: Cells,
    pub status: BoardStatus,
}

impl Board {
    fn new() -> Self {
        Self {
            cells: [None; CELLS],
            status: BoardStatus::Open,
        }
    }

    fn refresh_status(&mut self) {
        self.status = if let Some(win) = check_winner(&self.cells) {
            BoardStatus::Won(win)
        } else if is_full(&self.cells) {
            BoardStatus::Draw
        } else {
            BoardStatus::Open
        };
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeConfig {
    pub boards: u8,
    pub players: u8,
    /// Whether the last player in turn order is played by the computer.
    pub vs_ai: bool,
}

impl TicTacToeConfig {
    pub const MAX_BOARDS: u8 = 3;
    pub const MAX_PLAYERS: u8 = 3;

    pub fn new(boards: u8, players: u8, vs_ai: bool) -> Self {
        Self {
            boards: boards.clamp(1, Self::MAX_BOARDS),
            players: players.clamp(2, Self::MAX_PLAYERS),
            vs_ai,
        }
    }
}

impl Default for TicTacToeConfig {
    fn default() -> Self {
        Self::new(1, 2, true)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Placed,
    BoardWon(PlayerId),
    BoardDrawn,
    GameOver(Outcome),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicTacToe {
    config: TicTacToeConfig,
    boards: Vec<Board>,
    current: PlayerId,
    board_wins: Vec<u32>,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Persist for TicTacToe {
    const KIND: GameKind = GameKind::TicTacToe;
}

impl TicTacToe {
    pub fn new(config: TicTacToeConfig) -> Self {
        let config = TicTacToeConfig::new(config.boards, config.players, config.vs_ai);
        Self {
            config,
            boards: (0..config.boards).map(|_| Board::new()).collect(),
            current: 0,
            board_wins: vec![0; config.players.into()],
            phase: Phase::Playing,
            outcome: None,
        }
    }

    pub fn config(&self) -> TicTacToeConfig {
        self.config
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn board_wins(&self) -> &[u32] {
        &self.board_wins
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the player to move is the computer.
    pub fn is_ai_turn(&self) -> bool {
        self.config.vs_ai && self.phase.is_playing() && self.current + 1 == self.config.players
    }

    pub fn play(&mut self, board: usize, cell: usize) -> Result<MoveOutcome> {
        self.phase.check_playing()?;
        let target = self.boards.get(board).ok_or(GameError::InvalidCoords)?;
        if cell >= CELLS {
            return Err(GameError::InvalidCoords);
        }
        if target.status.is_terminal() {
            return Err(GameError::AlreadyEnded);
        }
        if target.cells[cell].is_some() {
            return Err(GameError::CellOccupied);
        }

        let player = self.current;
        let target = &mut self.boards[board];
        target.cells[cell] = Some(player);
        target.refresh_status();
        let status = target.status;
        log::trace!("player {player} took cell {cell} on board {board}");

        if let BoardStatus::Won(win) = status {
            self.board_wins[usize::from(win.player)] += 1;
        }
        self.current = (self.current + 1) % self.config.players;

        if self.boards.iter().all(|b| b.status.is_terminal()) {
            let outcome = strict_leader(&self.board_wins);
            self.phase = Phase::Finished;
            self.outcome = Some(outcome);
            return Ok(MoveOutcome::GameOver(outcome));
        }

        Ok(match status {
            BoardStatus::Won(win) => MoveOutcome::BoardWon(win.player),
            BoardStatus::Draw => MoveOutcome::BoardDrawn,
            BoardStatus::Open => MoveOutcome::Placed,
        })
    }

    /// Picks the computer's move for the current player: win, else block, else random.
    pub fn ai_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, usize)> {
        if !self.phase.is_playing() {
            return None;
        }
        let me = self.current;
        let empties: Vec<(usize, usize)> = self
            .boards
            .iter()
            .enumerate()
            .filter(|(_, board)| !board.status.is_terminal())
            .flat_map(|(b, board)| {
                (0..CELLS)
                    .filter(|&c| board.cells[c].is_none())
                    .map(move |c| (b, c))
            })
            .collect();

        let completes_for = |(b, c): (usize, usize), player: PlayerId| {
            let mut cells = self.boards[b].cells;
            cells[c] = Some(player);
            check_winner(&cells).is_some_and(|win| win.player == player)
        };

        if let Some(&win) = empties.iter().find(|&&pos| completes_for(pos, me)) {
            log::debug!("ai completes a line at {win:?}");
            return Some(win);
        }

        let opponents: Vec<PlayerId> = (0..self.config.players).filter(|&p| p != me).collect();
        if let Some(&block) = empties
            .iter()
            .find(|&&pos| opponents.iter().any(|&opp| completes_for(pos, opp)))
        {
            log::debug!("ai blocks a line at {block:?}");
            return Some(block);
        }

        empties.choose(rng).copied()
    }

    /// Lets the computer play its move if it is its turn.
    pub fn play_ai<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<MoveOutcome>> {
        if !self.is_ai_turn() {
            return Ok(None);
        }
        match self.ai_move(rng) {
            Some((board, cell)) => self.play(board, cell).map(Some),
            None => Ok(None),
        }
    }
}
