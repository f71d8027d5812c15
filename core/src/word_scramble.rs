//! Word scramble: unscramble ten words, optionally buying letters as hints.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::*;

pub const ROUND_LEN: usize = 10;
pub const POINTS_PER_LETTER: u32 = 10;
pub const HINT_COST: u32 = 5;
/// Reshuffles tried before accepting a scramble that spells the word.
pub const RESHUFFLE_ATTEMPTS: usize = 10;

pub const WORDS: &[&str] = &[
    "PUZZLE", "GARDEN", "ROCKET", "PLANET", "CASTLE", "DRAGON", "BASKET", "WINDOW", "MARKET",
    "JUNGLE", "PILLOW", "SUMMER", "WINTER", "TRAVEL", "BRIDGE", "SILVER", "ORANGE", "CANDLE",
    "MIRROR", "FOREST", "ISLAND", "LADDER", "PENCIL", "TURTLE",
];

/// Letters of `word` in random order, different from `word` whenever it has two distinct letters.
pub fn scramble<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    let distinct = letters.iter().any(|&c| Some(&c) != letters.first());
    for _ in 0..RESHUFFLE_ATTEMPTS {
        letters.shuffle(rng);
        let candidate: String = letters.iter().collect();
        if !distinct || candidate != word {
            return candidate;
        }
    }
    // the last shuffle spelled the word, and a rotation of it cannot unless all letters match
    letters.rotate_left(1);
    letters.iter().collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub word: String,
    pub scrambled: String,
    pub hints: usize,
    pub solved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { points: u32 },
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordScramble {
    rounds: Vec<Round>,
    current: usize,
    score: u32,
    phase: Phase,
}

impl Persist for WordScramble {
    const KIND: GameKind = GameKind::WordScramble;
}

impl WordScramble {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let words: Vec<&str> = WORDS.choose_multiple(rng, ROUND_LEN).copied().collect();
        Self::with_words(&words, rng)
    }

    pub fn with_words<R: Rng + ?Sized>(words: &[&str], rng: &mut R) -> Self {
        let rounds: Vec<Round> = words
            .iter()
            .map(|word| {
                let word = word.trim().to_uppercase();
                Round {
                    scrambled: scramble(&word, rng),
                    word,
                    hints: 0,
                    solved: false,
                }
            })
            .collect();
        let phase = if rounds.is_empty() {
            Phase::Finished
        } else {
            Phase::Playing
        };
        Self {
            rounds,
            current: 0,
            score: 0,
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Zero-based index of the word being played.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Round> {
        if self.phase.is_playing() {
            self.rounds.get(self.current)
        } else {
            None
        }
    }

    /// Revealed prefix of the current word.
    pub fn hint_text(&self) -> Option<&str> {
        self.current().map(|round| {
            let end = round
                .word
                .char_indices()
                .nth(round.hints)
                .map_or(round.word.len(), |(index, _)| index);
            &round.word[..end]
        })
    }

    fn current_mut(&mut self) -> Result<&mut Round> {
        self.phase.check_playing()?;
        self.rounds
            .get_mut(self.current)
            .ok_or(GameError::AlreadyEnded)
    }

    pub fn guess(&mut self, answer: &str) -> Result<GuessOutcome> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GameError::EmptyInput);
        }
        let round = self.current_mut()?;
        if round.word != answer.to_uppercase() {
            return Ok(GuessOutcome::Wrong);
        }
        round.solved = true;
        let points = POINTS_PER_LETTER * round.word.chars().count() as u32;
        self.score += points;
        self.next();
        Ok(GuessOutcome::Correct { points })
    }

    /// Reveals one more letter of the current word for [`HINT_COST`] points.
    pub fn hint(&mut self) -> Result<&str> {
        let round = self.current_mut()?;
        if round.hints >= round.word.chars().count() {
            return Err(GameError::NoHintsLeft);
        }
        round.hints += 1;
        self.score = self.score.saturating_sub(HINT_COST);
        Ok(self.hint_text().unwrap_or_default())
    }

    pub fn skip(&mut self) -> Result<()> {
        let round = self.current_mut()?;
        log::trace!("skipped {}", round.word);
        self.next();
        Ok(())
    }

    fn next(&mut self) {
        self.current += 1;
        if self.current >= self.rounds.len() {
            self.phase = Phase::Finished;
            log::debug!("word scramble finished with {}", self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn scramble_never_returns_the_word() {
        let mut rng = SmallRng::seed_from_u64(0);
        for word in WORDS.iter().chain(&["AB", "NOON"]) {
            for _ in 0..20 {
                let scrambled = scramble(word, &mut rng);
                assert_ne!(&scrambled, word);
                let mut a: Vec<char> = scrambled.chars().collect();
                let mut b: Vec<char> = word.chars().collect();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b);
            }
        }
        assert_eq!(scramble("AAA", &mut rng), "AAA");
    }

    #[test]
    fn correct_guess_is_case_insensitive() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut game = WordScramble::with_words(&["garden", "castle"], &mut rng);
        assert_eq!(game.guess("  "), Err(GameError::EmptyInput));
        assert_eq!(game.guess("danger"), Ok(GuessOutcome::Wrong));
        assert_eq!(game.guess("Garden"), Ok(GuessOutcome::Correct { points: 60 }));
        assert_eq!(game.current().unwrap().word, "CASTLE");
    }

    #[test]
    fn hints_cost_points_but_never_go_negative() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut game = WordScramble::with_words(&["ab", "pencil"], &mut rng);
        assert_eq!(game.hint(), Ok("A"));
        assert_eq!(game.score(), 0);
        assert_eq!(game.hint(), Ok("AB"));
        assert_eq!(game.hint(), Err(GameError::NoHintsLeft));

        game.guess("ab").unwrap();
        assert_eq!(game.score(), 20);
        assert_eq!(game.hint(), Ok("P"));
        assert_eq!(game.score(), 15);
    }

    #[test]
    fn hints_reveal_whole_letters() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut game = WordScramble::with_words(&["café"], &mut rng);
        assert_eq!(game.current().unwrap().word, "CAFÉ");
        assert_eq!(game.hint(), Ok("C"));
        assert_eq!(game.hint(), Ok("CA"));
        assert_eq!(game.hint(), Ok("CAF"));
        assert_eq!(game.hint(), Ok("CAFÉ"));
        assert_eq!(game.hint(), Err(GameError::NoHintsLeft));
        assert_eq!(game.guess("Café"), Ok(GuessOutcome::Correct { points: 40 }));
    }

    #[test]
    fn skipping_the_last_word_finishes() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut game = WordScramble::new(&mut rng);
        assert_eq!(game.rounds().len(), ROUND_LEN);
        for _ in 0..ROUND_LEN {
            game.skip().unwrap();
        }
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.skip(), Err(GameError::AlreadyEnded));
        assert!(game.rounds().iter().all(|round| !round.solved));
    }
}
