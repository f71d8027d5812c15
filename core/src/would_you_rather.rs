//! Would you rather: a shuffled deck of dilemmas with a running vote tally for each.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

pub const QUESTIONS: &[(&str, &str)] = &[
    ("be able to fly", "be able to breathe underwater"),
    ("live without music", "live without movies"),
    ("always be ten minutes late", "always be twenty minutes early"),
    ("have a pet dragon", "have a pet unicorn"),
    ("explore outer space", "explore the deep ocean"),
    ("speak every language", "play every instrument"),
    ("never feel cold again", "never feel hot again"),
    ("read minds", "be invisible"),
    ("live in a treehouse", "live in a castle"),
    ("eat only pizza", "eat only ice cream"),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    First,
    Second,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dilemma {
    pub first: String,
    pub second: String,
    pub votes: [u32; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WouldYouRather {
    deck: Vec<Dilemma>,
    position: usize,
    phase: Phase,
}

impl Persist for WouldYouRather {
    const KIND: GameKind = GameKind::WouldYouRather;
}

impl WouldYouRather {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck: Vec<Dilemma> = QUESTIONS
            .iter()
            .map(|&(first, second)| Dilemma {
                first: first.to_owned(),
                second: second.to_owned(),
                votes: [0; 2],
            })
            .collect();
        deck.shuffle(rng);
        Self {
            deck,
            position: 0,
            phase: Phase::Playing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn current(&self) -> Option<&Dilemma> {
        if self.phase.is_playing() {
            self.deck.get(self.position)
        } else {
            None
        }
    }

    /// Dilemmas answered so far, with their tallies.
    pub fn answered(&self) -> &[Dilemma] {
        &self.deck[..self.position.min(self.deck.len())]
    }

    pub fn vote(&mut self, choice: Choice) -> Result<[u32; 2]> {
        self.phase.check_playing()?;
        let dilemma = self
            .deck
            .get_mut(self.position)
            .ok_or(GameError::AlreadyEnded)?;
        let slot = match choice {
            Choice::First => 0,
            Choice::Second => 1,
        };
        dilemma.votes[slot] += 1;
        Ok(dilemma.votes)
    }

    /// Moves to the next dilemma; the game finishes after the last one.
    pub fn next_dilemma(&mut self) -> Result<Option<&Dilemma>> {
        self.phase.check_playing()?;
        self.position += 1;
        if self.position >= self.deck.len() {
            self.phase = Phase::Finished;
            log::trace!("deck of {} dilemmas exhausted", self.deck.len());
        }
        Ok(self.current())
    }
}
