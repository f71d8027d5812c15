//! Battleship against the computer on two 10×10 boards.

use ndarray::Array2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;
pub use fleet::*;

mod fleet;

pub const BOARD_SIZE: Coord = 10;
pub const OPPONENT_DELAY: Duration = Duration::from_millis(800);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
    Sunk,
}

impl Cell {
    pub const fn is_targeted(self) -> bool {
        matches!(self, Self::Hit | Self::Miss | Self::Sunk)
    }
}

pub type Board = Array2<Cell>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipKind {
    pub const fn size(self) -> usize {
        use ShipKind::*;
        match self {
            Carrier => 5,
            Battleship => 4,
            Cruiser => 3,
            Submarine => 3,
            Destroyer => 2,
        }
    }
}

/// Ships every fleet carries, in placement order.
pub const FLEET: [ShipKind; 5] = [
    ShipKind::Carrier,
    ShipKind::Battleship,
    ShipKind::Cruiser,
    ShipKind::Submarine,
    ShipKind::Destroyer,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const fn direction(self) -> Direction {
        match self {
            Self::Horizontal => Direction::Right,
            Self::Vertical => Direction::Down,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub kind: ShipKind,
    pub positions: Vec<Coord2>,
    pub hits: Vec<Coord2>,
}

impl Ship {
    pub fn new(kind: ShipKind, positions: Vec<Coord2>) -> Self {
        Self {
            kind,
            positions,
            hits: Vec::new(),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.positions.len() == self.kind.size()
    }

    pub fn is_sunk(&self) -> bool {
        !self.positions.is_empty() && self.hits.len() == self.positions.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    Miss,
    Hit,
    Sunk(ShipKind),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub board: Board,
    pub ships: Vec<Ship>,
}

impl Fleet {
    /// A board with the standard ships still waiting to be placed.
    pub fn unplaced() -> Self {
        Self {
            board: Array2::default((BOARD_SIZE, BOARD_SIZE).to_nd_index()),
            ships: FLEET.iter().map(|&kind| Ship::new(kind, Vec::new())).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ships.iter().all(Ship::is_placed)
    }

    pub fn all_sunk(&self) -> bool {
        let mut placed = self.ships.iter().filter(|ship| !ship.positions.is_empty());
        let mut any = false;
        let all = placed.all(|ship| {
            any = true;
            ship.is_sunk()
        });
        any && all
    }

    /// Moves ship `index` to the given spot, keeping the no-touching rule.
    pub fn place_ship(
        &mut self,
        index: usize,
        start: Coord2,
        orientation: Orientation,
    ) -> Result<()> {
        let ship = self.ships.get(index).ok_or(GameError::InvalidPlacement)?;
        let cells = ship_cells(start, orientation, ship.kind.size())
            .ok_or(GameError::InvalidPlacement)?;

        let mut board = self.board.clone();
        for &old in &ship.positions {
            board[old.to_nd_index()] = Cell::Empty;
        }
        if !can_place(&board, &cells) {
            return Err(GameError::InvalidPlacement);
        }
        for &cell in &cells {
            board[cell.to_nd_index()] = Cell::Ship;
        }
        self.board = board;
        self.ships[index].positions = cells;
        Ok(())
    }

    pub fn receive_shot(&mut self, target: Coord2) -> Result<ShotOutcome> {
        if !in_bounds(target, (BOARD_SIZE, BOARD_SIZE)) {
            return Err(GameError::InvalidCoords);
        }
        match self.board[target.to_nd_index()] {
            Cell::Empty => {
                self.board[target.to_nd_index()] = Cell::Miss;
                Ok(ShotOutcome::Miss)
            }
            Cell::Ship => {
                self.board[target.to_nd_index()] = Cell::Hit;
                let Some(ship) = self
                    .ships
                    .iter_mut()
                    .find(|ship| ship.positions.contains(&target))
                else {
                    return Ok(ShotOutcome::Hit);
                };
                ship.hits.push(target);
                if !ship.is_sunk() {
                    return Ok(ShotOutcome::Hit);
                }
                for &cell in &ship.positions {
                    self.board[cell.to_nd_index()] = Cell::Sunk;
                }
                Ok(ShotOutcome::Sunk(ship.kind))
            }
            Cell::Hit | Cell::Miss | Cell::Sunk => Err(GameError::AlreadyGuessed),
        }
    }

    /// The board as the other side sees it, ships hidden.
    pub fn masked(&self) -> Board {
        self.board.mapv(|cell| match cell {
            Cell::Ship => Cell::Empty,
            other => other,
        })
    }
}

/// Computer targeting: finish off a wounded ship first, otherwise shoot at random.
pub fn choose_target<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coord2> {
    let bounds = board_size(board);
    let untargeted = |cell: &Coord2| !board[cell.to_nd_index()].is_targeted();

    let follow_ups: Vec<Coord2> = board
        .indexed_iter()
        .filter(|(_, cell)| **cell == Cell::Hit)
        .flat_map(|((r, c), _)| {
            let hit = (r as Coord, c as Coord);
            [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
                .into_iter()
                .filter_map(move |dir| dir.step(hit, bounds))
        })
        .filter(untargeted)
        .collect();
    if let Some(&target) = follow_ups.choose(rng) {
        return Some(target);
    }

    let open: Vec<Coord2> = board
        .indexed_iter()
        .map(|((r, c), _)| (r as Coord, c as Coord))
        .filter(untargeted)
        .collect();
    open.choose(rng).copied()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    OpponentTurn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Battleship {
    player: Fleet,
    opponent: Fleet,
    phase: Phase,
    turn: Side,
    opponent_thinking: bool,
    winner: Option<Side>,
    shots_fired: u32,
    last_opponent_shot: Option<Coord2>,
}

impl Persist for Battleship {
    const KIND: GameKind = GameKind::Battleship;
}

impl Battleship {
    /// New game in setup, the computer's fleet already placed.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            player: Fleet::unplaced(),
            opponent: place_fleet(rng),
            phase: Phase::Setup,
            turn: Side::Player,
            opponent_thinking: false,
            winner: None,
            shots_fired: 0,
            last_opponent_shot: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn player_fleet(&self) -> &Fleet {
        &self.player
    }

    pub fn opponent_view(&self) -> Board {
        self.opponent.masked()
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn last_opponent_shot(&self) -> Option<Coord2> {
        self.last_opponent_shot
    }

    pub fn place_ship(
        &mut self,
        index: usize,
        start: Coord2,
        orientation: Orientation,
    ) -> Result<()> {
        self.check_setup()?;
        self.player.place_ship(index, start, orientation)
    }

    pub fn auto_place<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.check_setup()?;
        self.player = place_fleet(rng);
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.check_setup()?;
        if !self.player.is_complete() {
            return Err(GameError::Incomplete);
        }
        self.phase = Phase::Playing;
        Ok(())
    }

    fn check_setup(&self) -> Result<()> {
        match self.phase {
            Phase::Setup => Ok(()),
            Phase::Playing => Err(GameError::WrongPhase),
            Phase::Finished => Err(GameError::AlreadyEnded),
        }
    }

    /// Player shot at the computer's board. Unless the game ended, the returned step must be
    /// scheduled so the computer answers.
    pub fn fire(&mut self, target: Coord2) -> Result<(ShotOutcome, Option<(Duration, Step)>)> {
        self.phase.check_playing()?;
        if self.opponent_thinking || self.turn != Side::Player {
            return Err(GameError::Busy);
        }
        let outcome = self.opponent.receive_shot(target)?;
        self.shots_fired += 1;

        if self.opponent.all_sunk() {
            self.finish(Side::Player);
            return Ok((outcome, None));
        }
        self.turn = Side::Opponent;
        self.opponent_thinking = true;
        Ok((outcome, Some((OPPONENT_DELAY, Step::OpponentTurn))))
    }

    fn finish(&mut self, winner: Side) {
        log::debug!("battleship finished, {winner:?} wins");
        self.phase = Phase::Finished;
        self.winner = Some(winner);
        self.opponent_thinking = false;
    }
}

impl Animated for Battleship {
    type Step = Step;

    fn advance<R: Rng + ?Sized>(&mut self, step: Step, rng: &mut R) -> Option<(Duration, Step)> {
        match step {
            Step::OpponentTurn => {
                if !self.opponent_thinking || !self.phase.is_playing() {
                    return None;
                }
                self.opponent_thinking = false;
                if let Some(target) = choose_target(&self.player.board, rng) {
                    match self.player.receive_shot(target) {
                        Ok(outcome) => {
                            log::trace!("opponent fired at {target:?}: {outcome:?}");
                            self.last_opponent_shot = Some(target);
                        }
                        Err(err) => log::warn!("opponent shot at {target:?} rejected: {err}"),
                    }
                }
                if self.player.all_sunk() {
                    self.finish(Side::Opponent);
                } else {
                    self.turn = Side::Player;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn ready_game(seed: u64) -> (Battleship, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Battleship::new(&mut rng);
        game.auto_place(&mut rng).unwrap();
        game.start().unwrap();
        (game, rng)
    }

    #[test]
    fn manual_setup_requires_every_ship() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut game = Battleship::new(&mut rng);
        assert_eq!(game.start(), Err(GameError::Incomplete));

        for (i, row) in [0, 2, 4, 6, 8].into_iter().enumerate() {
            game.place_ship(i, (row, 0), Orientation::Horizontal).unwrap();
        }
        assert_eq!(
            game.place_ship(4, (1, 0), Orientation::Horizontal),
            Err(GameError::InvalidPlacement)
        );
        // moving a ship ignores its own old cells
        game.place_ship(4, (8, 5), Orientation::Horizontal).unwrap();
        assert_eq!(game.player_fleet().board[[8, 0]], Cell::Empty);

        game.start().unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(
            game.place_ship(0, (0, 5), Orientation::Vertical),
            Err(GameError::WrongPhase)
        );
    }

    #[test]
    fn sinking_marks_every_cell() {
        let mut fleet = Fleet::unplaced();
        fleet.place_ship(4, (3, 3), Orientation::Vertical).unwrap();

        assert_eq!(fleet.receive_shot((0, 0)), Ok(ShotOutcome::Miss));
        assert_eq!(fleet.receive_shot((0, 0)), Err(GameError::AlreadyGuessed));
        assert_eq!(fleet.receive_shot((3, 3)), Ok(ShotOutcome::Hit));
        assert!(!fleet.all_sunk());
        assert_eq!(
            fleet.receive_shot((4, 3)),
            Ok(ShotOutcome::Sunk(ShipKind::Destroyer))
        );
        assert_eq!(fleet.board[[3, 3]], Cell::Sunk);
        assert_eq!(fleet.board[[4, 3]], Cell::Sunk);
        assert!(fleet.all_sunk());
        assert_eq!(fleet.receive_shot((10, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn opponent_answers_after_the_delay() {
        let (mut game, mut rng) = ready_game(11);
        let mut scheduler = Scheduler::new();

        let (_, step) = game.fire((0, 0)).unwrap();
        let (delay, step) = step.unwrap();
        scheduler.schedule(delay, step);
        assert_eq!(game.fire((0, 1)), Err(GameError::Busy));

        scheduler.run_until_idle(&mut game, &mut rng);
        assert_eq!(game.turn(), Side::Player);
        let target = game.last_opponent_shot().unwrap();
        assert!(game.player_fleet().board[target.to_nd_index()].is_targeted());
        assert_eq!(game.fire((0, 0)), Err(GameError::AlreadyGuessed));
    }

    #[test]
    fn opponent_follows_up_on_a_hit() {
        let mut board: Board = Array2::default((BOARD_SIZE, BOARD_SIZE).to_nd_index());
        board[[5, 5]] = Cell::Hit;
        board[[4, 5]] = Cell::Miss;
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..10 {
            let target = choose_target(&board, &mut rng).unwrap();
            assert!([(6, 5), (5, 4), (5, 6)].contains(&target), "{target:?}");
        }
    }

    #[test]
    fn masked_view_hides_ships() {
        let (game, _) = ready_game(2);
        assert!(game.opponent_view().iter().all(|&cell| cell == Cell::Empty));
    }

    #[test]
    fn sinking_the_whole_fleet_wins() {
        let (mut game, mut rng) = ready_game(21);
        let targets: Vec<Coord2> = game
            .opponent
            .ships
            .iter()
            .flat_map(|ship| ship.positions.clone())
            .collect();
        let mut scheduler = Scheduler::new();
        for target in targets {
            let (_, step) = game.fire(target).unwrap();
            if let Some((delay, step)) = step {
                scheduler.schedule(delay, step);
                scheduler.run_until_idle(&mut game, &mut rng);
            }
            if game.phase().is_finished() {
                break;
            }
        }
        assert_eq!(game.winner(), Some(Side::Player));
        assert_eq!(game.shots_fired(), 17);
    }
}
