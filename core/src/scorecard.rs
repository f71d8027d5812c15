//! Scorecard for games played away from the screen: named players and an undoable score log.

use serde::{Deserialize, Serialize};

use crate::*;

pub const MAX_PLAYERS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub player: PlayerId,
    pub points: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    players: Vec<String>,
    history: Vec<ScoreEvent>,
}

impl Persist for Scorecard {
    const KIND: GameKind = GameKind::Scorecard;
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut card = Self::new();
        for name in names {
            card.add_player(name)?;
        }
        Ok(card)
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Every score in entry order.
    pub fn history(&self) -> &[ScoreEvent] {
        &self.history
    }

    pub fn add_player(&mut self, name: &str) -> Result<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyInput);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::TooManyPlayers);
        }
        self.players.push(name.to_owned());
        Ok((self.players.len() - 1) as PlayerId)
    }

    pub fn add_score(&mut self, player: PlayerId, points: i64) -> Result<i64> {
        if usize::from(player) >= self.players.len() {
            return Err(GameError::UnknownPlayer);
        }
        self.history.push(ScoreEvent { player, points });
        Ok(self.total(player))
    }

    /// Removes the newest score.
    pub fn undo(&mut self) -> Result<ScoreEvent> {
        self.history.pop().ok_or(GameError::NothingToUndo)
    }

    pub fn total(&self, player: PlayerId) -> i64 {
        self.history
            .iter()
            .filter(|event| event.player == player)
            .map(|event| event.points)
            .sum()
    }

    pub fn totals(&self) -> Vec<i64> {
        let mut totals = vec![0; self.players.len()];
        for event in &self.history {
            if let Some(total) = totals.get_mut(usize::from(event.player)) {
                *total += event.points;
            }
        }
        totals
    }

    /// Player with the strictly highest total, once anything has been scored.
    pub fn leader(&self) -> Option<Outcome> {
        if self.history.is_empty() {
            return None;
        }
        let totals = self.totals();
        let best = totals.iter().copied().max()?;
        let mut leaders = totals
            .iter()
            .enumerate()
            .filter(|&(_, &total)| total == best)
            .map(|(player, _)| player);
        Some(match (leaders.next(), leaders.next()) {
            (Some(player), None) => Outcome::Winner(player as PlayerId),
            _ => Outcome::Tie,
        })
    }

    /// Clears the scores but keeps the players.
    pub fn reset_scores(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_follow_the_history() {
        let mut card = Scorecard::with_players(["Ann", "Ben", "Cy"]).unwrap();
        assert_eq!(card.leader(), None);
        card.add_score(0, 10).unwrap();
        card.add_score(1, 7).unwrap();
        assert_eq!(card.add_score(0, -4), Ok(6));
        assert_eq!(card.totals(), vec![6, 7, 0]);
        assert_eq!(card.leader(), Some(Outcome::Winner(1)));

        card.add_score(2, 7).unwrap();
        assert_eq!(card.leader(), Some(Outcome::Tie));
    }

    #[test]
    fn undo_removes_the_newest_score() {
        let mut card = Scorecard::with_players(["Ann", "Ben"]).unwrap();
        card.add_score(0, 5).unwrap();
        card.add_score(1, 3).unwrap();
        assert_eq!(card.undo(), Ok(ScoreEvent { player: 1, points: 3 }));
        assert_eq!(card.totals(), vec![5, 0]);
        card.undo().unwrap();
        assert_eq!(card.undo(), Err(GameError::NothingToUndo));
    }

    #[test]
    fn players_are_validated() {
        let mut card = Scorecard::new();
        assert_eq!(card.add_player("  "), Err(GameError::EmptyInput));
        for i in 0..MAX_PLAYERS {
            card.add_player(&format!("P{i}")).unwrap();
        }
        assert_eq!(card.add_player("extra"), Err(GameError::TooManyPlayers));
        assert_eq!(card.add_score(8, 1), Err(GameError::UnknownPlayer));
    }
}
