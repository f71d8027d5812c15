//! Self-contained game-logic engines for the playroom games.
//!
//! Every game lives in its own module and owns a single serializable state record. Mutators
//! take the state plus a player action and either apply it completely or return a
//! [`GameError`] with the state untouched. Timed multi-step sequences such as AI delays or
//! dice tumbling are expressed as [`Animated`] steps run by a [`Scheduler`].

use serde::{Deserialize, Serialize};

pub use error::*;
pub use scheduler::*;
pub use settings::*;
pub use store::*;
pub use types::*;

pub use playroom_protocol::GameKind;

pub mod battleship;
pub mod connect_four;
pub mod dice;
pub mod dots_and_boxes;
pub mod hangman;
pub mod mad_libs;
pub mod scorecard;
pub mod shell_game;
pub mod sudoku;
pub mod tictactoe;
pub mod word_scramble;
pub mod word_search;
pub mod would_you_rather;
pub mod yahtzee;

mod error;
mod scheduler;
mod settings;
mod store;
mod types;

/// Index of a participant in a game's fixed player order.
pub type PlayerId = u8;

/// Coarse lifecycle stage shared by most games.
///
/// Valid transitions:
/// - Setup -> Playing
/// - Playing -> Finished
///
/// Anything else only happens through a reset, which builds a fresh state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Setup,
    Playing,
    Finished,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    pub(crate) fn check_playing(self) -> Result<()> {
        match self {
            Self::Playing => Ok(()),
            Self::Finished => Err(GameError::AlreadyEnded),
            Self::Setup => Err(GameError::WrongPhase),
        }
    }
}

/// Final result of a game between several players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(PlayerId),
    Tie,
}

/// Picks the player with strictly the most points, or a tie when the best score is shared.
pub fn strict_leader(scores: &[u32]) -> Outcome {
    let Some(&best) = scores.iter().max() else {
        return Outcome::Tie;
    };
    let mut leaders = scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == best)
        .map(|(player, _)| player);
    match (leaders.next(), leaders.next()) {
        (Some(player), None) => PlayerId::try_from(player)
            .map(Outcome::Winner)
            .unwrap_or(Outcome::Tie),
        _ => Outcome::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_leader_needs_a_unique_maximum() {
        assert_eq!(strict_leader(&[1, 3, 2]), Outcome::Winner(1));
        assert_eq!(strict_leader(&[2, 2, 1]), Outcome::Tie);
        assert_eq!(strict_leader(&[0, 0]), Outcome::Tie);
        assert_eq!(strict_leader(&[]), Outcome::Tie);
    }

    #[test]
    fn finished_phase_rejects_moves() {
        assert_eq!(Phase::Finished.check_playing(), Err(GameError::AlreadyEnded));
        assert_eq!(Phase::Setup.check_playing(), Err(GameError::WrongPhase));
        assert_eq!(Phase::Playing.check_playing(), Ok(()));
    }
}
