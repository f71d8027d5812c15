//! Hangman: guess the hidden word one letter at a time before six misses.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MAX_MISSES: u8 = 6;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Animals,
    Countries,
    Food,
    Movies,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Animals,
        Category::Countries,
        Category::Food,
        Category::Movies,
    ];

    pub const fn words(self) -> &'static [&'static str] {
        match self {
            Self::Animals => &[
                "ELEPHANT", "GIRAFFE", "PENGUIN", "KANGAROO", "CROCODILE", "BUTTERFLY", "SQUIRREL",
                "HEDGEHOG",
            ],
            Self::Countries => &[
                "AUSTRALIA", "BRAZIL", "CANADA", "DENMARK", "EGYPT", "FINLAND", "GERMANY", "JAPAN",
            ],
            Self::Food => &[
                "SPAGHETTI", "PANCAKE", "BURRITO", "SANDWICH", "AVOCADO", "PRETZEL", "LASAGNA",
                "OMELETTE",
            ],
            Self::Movies => &[
                "CASABLANCA", "INCEPTION", "GLADIATOR", "TITANIC", "JAWS", "ROCKY", "VERTIGO",
                "AMADEUS",
            ],
        }
    }
}

/// Uppercase form of a letter, kept as is when it has no single-char uppercase.
fn fold(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => letter,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter occurs this many times.
    Hit(usize),
    Miss,
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hangman {
    category: Category,
    word: String,
    guessed: Vec<char>,
    misses: u8,
    phase: Phase,
    won: bool,
}

impl Persist for Hangman {
    const KIND: GameKind = GameKind::Hangman;
}

impl Hangman {
    pub fn new<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Self {
        let word = category.words().choose(rng).copied().unwrap_or("HANGMAN");
        Self::with_word(category, word)
    }

    pub fn with_word(category: Category, word: &str) -> Self {
        Self {
            category,
            word: word.trim().chars().map(fold).collect(),
            guessed: Vec::new(),
            misses: 0,
            phase: Phase::Playing,
            won: false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn misses(&self) -> u8 {
        self.misses
    }

    pub fn misses_left(&self) -> u8 {
        MAX_MISSES - self.misses
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Letters guessed so far, in guessing order.
    pub fn guessed(&self) -> &[char] {
        &self.guessed
    }

    /// The word once the game is over.
    pub fn answer(&self) -> Option<&str> {
        self.phase.is_finished().then_some(self.word.as_str())
    }

    fn is_revealed(&self, c: char) -> bool {
        !c.is_alphabetic() || self.guessed.contains(&c)
    }

    /// The word with unguessed letters shown as `_`. Spaces and punctuation are always shown.
    pub fn masked(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.is_revealed(c) { c } else { '_' })
            .collect()
    }

    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome> {
        self.phase.check_playing()?;
        if !letter.is_alphabetic() {
            return Err(GameError::NotALetter);
        }
        let letter = fold(letter);
        if self.guessed.contains(&letter) {
            return Err(GameError::AlreadyGuessed);
        }
        self.guessed.push(letter);

        let hits = self.word.chars().filter(|&c| c == letter).count();
        if hits == 0 {
            self.misses += 1;
            if self.misses >= MAX_MISSES {
                self.phase = Phase::Finished;
                log::debug!("hangman lost on {}", self.word);
                return Ok(GuessOutcome::Lost);
            }
            return Ok(GuessOutcome::Miss);
        }

        if self.word.chars().all(|c| self.is_revealed(c)) {
            self.phase = Phase::Finished;
            self.won = true;
            return Ok(GuessOutcome::Won);
        }
        Ok(GuessOutcome::Hit(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revealing_every_letter_wins() {
        let mut game = Hangman::with_word(Category::Food, "pancake");
        assert_eq!(game.guess('a'), Ok(GuessOutcome::Hit(2)));
        assert_eq!(game.masked(), "_A___A_");
        assert_eq!(game.answer(), None);
        for letter in ['P', 'N', 'C', 'K'] {
            assert_eq!(game.guess(letter), Ok(GuessOutcome::Hit(1)));
        }
        assert_eq!(game.guess('e'), Ok(GuessOutcome::Won));
        assert!(game.is_won());
        assert_eq!(game.answer(), Some("PANCAKE"));
    }

    #[test]
    fn six_misses_lose() {
        let mut game = Hangman::with_word(Category::Animals, "JAWS");
        for letter in ['B', 'C', 'D', 'E', 'F'] {
            assert_eq!(game.guess(letter), Ok(GuessOutcome::Miss));
        }
        assert_eq!(game.misses_left(), 1);
        assert_eq!(game.guess('G'), Ok(GuessOutcome::Lost));
        assert!(!game.is_won());
        assert_eq!(game.guess('J'), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn invalid_and_repeated_guesses_are_free() {
        let mut game = Hangman::with_word(Category::Movies, "ROCKY");
        assert_eq!(game.guess('7'), Err(GameError::NotALetter));
        game.guess('z').unwrap();
        assert_eq!(game.guess('Z'), Err(GameError::AlreadyGuessed));
        assert_eq!(game.misses(), 1);
    }

    #[test]
    fn accented_letters_can_be_guessed() {
        let mut game = Hangman::with_word(Category::Food, "crème brûlée");
        assert_eq!(game.masked(), "_____ ______");
        for letter in ['c', 'r', 'è', 'm', 'e', 'b', 'û', 'l'] {
            assert!(matches!(game.guess(letter), Ok(GuessOutcome::Hit(_))), "{letter}");
        }
        assert_eq!(game.masked(), "CRÈME BRÛL_E");
        assert_eq!(game.guess('É'), Ok(GuessOutcome::Won));
        assert_eq!(game.answer(), Some("CRÈME BRÛLÉE"));
    }
}
