//! Dots and boxes: draw edges between dots, close boxes to claim them and move again.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsConfig {
    /// Boxes per side.
    pub size: Coord,
    pub players: u8,
}

impl DotsConfig {
    pub const MIN_SIZE: Coord = 2;
    pub const MAX_SIZE: Coord = 8;
    pub const MAX_PLAYERS: u8 = 4;

    pub fn new(size: Coord, players: u8) -> Self {
        Self {
            size: size.clamp(Self::MIN_SIZE, Self::MAX_SIZE),
            players: players.clamp(2, Self::MAX_PLAYERS),
        }
    }

    pub const fn total_boxes(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for DotsConfig {
    fn default() -> Self {
        Self::new(3, 2)
    }
}

/// An edge between two adjacent dots.
///
/// Horizontal edges sit at `(row in 0..=size, col in 0..size)`, vertical edges at
/// `(row in 0..size, col in 0..=size)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Horizontal(Coord2),
    Vertical(Coord2),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeOutcome {
    /// Boxes closed by this edge, zero to two of them.
    pub completed: Vec<Coord2>,
    pub extra_turn: bool,
    pub outcome: Option<Outcome>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotsAndBoxes {
    config: DotsConfig,
    horizontal: Array2<Option<PlayerId>>,
    vertical: Array2<Option<PlayerId>>,
    boxes: Array2<Option<PlayerId>>,
    scores: Vec<u32>,
    current: PlayerId,
    completed: CellCount,
    moves: u32,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Persist for DotsAndBoxes {
    const KIND: GameKind = GameKind::DotsAndBoxes;
}

impl DotsAndBoxes {
    pub fn new(config: DotsConfig) -> Self {
        let config = DotsConfig::new(config.size, config.players);
        let n = usize::from(config.size);
        Self {
            config,
            horizontal: Array2::default((n + 1, n)),
            vertical: Array2::default((n, n + 1)),
            boxes: Array2::default((n, n)),
            scores: vec![0; config.players.into()],
            current: 0,
            completed: 0,
            moves: 0,
            phase: Phase::Playing,
            outcome: None,
        }
    }

    pub fn config(&self) -> DotsConfig {
        self.config
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn box_owner(&self, coords: Coord2) -> Option<PlayerId> {
        self.boxes.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn edge_owner(&self, edge: Edge) -> Option<PlayerId> {
        let (lines, coords) = self.lines(edge);
        lines.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Every edge not drawn yet.
    pub fn free_edges(&self) -> Vec<Edge> {
        let horizontal = self
            .horizontal
            .indexed_iter()
            .filter(|(_, owner)| owner.is_none())
            .map(|((r, c), _)| Edge::Horizontal((r as Coord, c as Coord)));
        let vertical = self
            .vertical
            .indexed_iter()
            .filter(|(_, owner)| owner.is_none())
            .map(|((r, c), _)| Edge::Vertical((r as Coord, c as Coord)));
        horizontal.chain(vertical).collect()
    }

    fn lines(&self, edge: Edge) -> (&Array2<Option<PlayerId>>, Coord2) {
        match edge {
            Edge::Horizontal(coords) => (&self.horizontal, coords),
            Edge::Vertical(coords) => (&self.vertical, coords),
        }
    }

    fn is_box_closed(&self, (row, col): Coord2) -> bool {
        let (r, c) = (usize::from(row), usize::from(col));
        self.horizontal[[r, c]].is_some()
            && self.horizontal[[r + 1, c]].is_some()
            && self.vertical[[r, c]].is_some()
            && self.vertical[[r, c + 1]].is_some()
    }

    /// The one or two boxes bordered by `edge`.
    fn adjacent_boxes(&self, edge: Edge) -> Vec<Coord2> {
        let size = self.config.size;
        let mut boxes = Vec::with_capacity(2);
        match edge {
            Edge::Horizontal((row, col)) => {
                if row > 0 {
                    boxes.push((row - 1, col));
                }
                if row < size {
                    boxes.push((row, col));
                }
            }
            Edge::Vertical((row, col)) => {
                if col > 0 {
                    boxes.push((row, col - 1));
                }
                if col < size {
                    boxes.push((row, col));
                }
            }
        }
        boxes
    }

    pub fn draw(&mut self, edge: Edge) -> Result<EdgeOutcome> {
        self.phase.check_playing()?;
        let (lines, coords) = self.lines(edge);
        match lines.get(coords.to_nd_index()) {
            None => return Err(GameError::InvalidCoords),
            Some(Some(_)) => return Err(GameError::CellOccupied),
            Some(None) => {}
        }

        let player = self.current;
        match edge {
            Edge::Horizontal(coords) => self.horizontal[coords.to_nd_index()] = Some(player),
            Edge::Vertical(coords) => self.vertical[coords.to_nd_index()] = Some(player),
        }
        self.moves += 1;

        let completed: Vec<Coord2> = self
            .adjacent_boxes(edge)
            .into_iter()
            .filter(|&b| self.boxes[b.to_nd_index()].is_none() && self.is_box_closed(b))
            .collect();
        for &b in &completed {
            self.boxes[b.to_nd_index()] = Some(player);
        }
        self.scores[usize::from(player)] += completed.len() as u32;
        self.completed += completed.len() as CellCount;

        let extra_turn = !completed.is_empty();
        if !extra_turn {
            self.current = (self.current + 1) % self.config.players;
        }
        log::trace!("player {player} drew {edge:?}, closed {}", completed.len());

        let outcome = if self.completed == self.config.total_boxes() {
            let outcome = strict_leader(&self.scores);
            self.phase = Phase::Finished;
            self.outcome = Some(outcome);
            Some(outcome)
        } else {
            None
        };

        Ok(EdgeOutcome {
            completed,
            extra_turn,
            outcome,
        })
    }
}
