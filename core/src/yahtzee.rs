//! Solitaire Yahtzee: three rolls per round with held dice, thirteen categories to fill.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

pub const DICE: usize = 5;
pub const ROLLS_PER_ROUND: u8 = 3;
pub const UPPER_BONUS_THRESHOLD: u32 = 63;
pub const UPPER_BONUS: u32 = 35;

pub type Dice = [u8; DICE];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Face counted by an upper-section category.
    pub const fn face(self) -> Option<u8> {
        match self {
            Self::Ones => Some(1),
            Self::Twos => Some(2),
            Self::Threes => Some(3),
            Self::Fours => Some(4),
            Self::Fives => Some(5),
            Self::Sixes => Some(6),
            _ => None,
        }
    }

    pub const fn is_upper(self) -> bool {
        self.face().is_some()
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// How many dice show each face, indexed by face value.
fn face_counts(dice: &Dice) -> [u8; 7] {
    let mut counts = [0; 7];
    for &die in dice {
        if let Some(count) = counts.get_mut(usize::from(die)) {
            *count += 1;
        }
    }
    counts
}

/// Whether every face of `run` shows up at least once.
fn has_run(counts: &[u8; 7], run: core::ops::RangeInclusive<usize>) -> bool {
    run.into_iter().all(|face| counts[face] > 0)
}

/// Points `dice` would earn in `category`.
pub fn score(category: Category, dice: &Dice) -> u32 {
    let counts = face_counts(dice);
    let sum: u32 = dice.iter().map(|&die| u32::from(die)).sum();
    let most = counts[1..].iter().copied().max().unwrap_or(0);

    match category {
        Category::ThreeOfAKind if most >= 3 => sum,
        Category::FourOfAKind if most >= 4 => sum,
        Category::FullHouse => {
            let mut shape: Vec<u8> = counts[1..].iter().copied().filter(|&n| n > 0).collect();
            shape.sort_unstable();
            if shape == [2, 3] { 25 } else { 0 }
        }
        Category::SmallStraight
            if has_run(&counts, 1..=4) || has_run(&counts, 2..=5) || has_run(&counts, 3..=6) =>
        {
            30
        }
        Category::LargeStraight if has_run(&counts, 1..=5) || has_run(&counts, 2..=6) => 40,
        Category::Yahtzee if most == 5 => 50,
        Category::Chance => sum,
        upper => match upper.face() {
            Some(face) => u32::from(counts[usize::from(face)]) * u32::from(face),
            None => 0,
        },
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Yahtzee {
    dice: Dice,
    held: [bool; DICE],
    rolls_left: u8,
    scores: [Option<u32>; 13],
    round: u8,
    phase: Phase,
}

impl Persist for Yahtzee {
    const KIND: GameKind = GameKind::Yahtzee;
}

impl Default for Yahtzee {
    fn default() -> Self {
        Self::new()
    }
}

impl Yahtzee {
    pub fn new() -> Self {
        Self {
            dice: [1; DICE],
            held: [false; DICE],
            rolls_left: ROLLS_PER_ROUND,
            scores: [None; 13],
            round: 1,
            phase: Phase::Playing,
        }
    }

    pub fn dice(&self) -> Dice {
        self.dice
    }

    pub fn held(&self) -> [bool; DICE] {
        self.held
    }

    pub fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    pub fn has_rolled(&self) -> bool {
        self.rolls_left < ROLLS_PER_ROUND
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn category_score(&self, category: Category) -> Option<u32> {
        self.scores[category.index()]
    }

    /// What the current dice would score in an open category.
    pub fn preview(&self, category: Category) -> Option<u32> {
        (self.has_rolled() && self.scores[category.index()].is_none())
            .then(|| score(category, &self.dice))
    }

    pub fn upper_subtotal(&self) -> u32 {
        Category::ALL
            .into_iter()
            .filter(|category| category.is_upper())
            .filter_map(|category| self.scores[category.index()])
            .sum()
    }

    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().flatten().sum::<u32>() + self.upper_bonus()
    }

    /// Rerolls every die that is not held.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Dice> {
        self.phase.check_playing()?;
        if self.rolls_left == 0 {
            return Err(GameError::NoRollsLeft);
        }
        for (die, held) in self.dice.iter_mut().zip(self.held) {
            if !held {
                *die = rng.random_range(1..=6);
            }
        }
        self.rolls_left -= 1;
        log::trace!("rolled {:?}, {} rolls left", self.dice, self.rolls_left);
        Ok(self.dice)
    }

    pub fn toggle_hold(&mut self, die: usize) -> Result<bool> {
        self.phase.check_playing()?;
        if !self.has_rolled() {
            return Err(GameError::NotRolled);
        }
        let held = self.held.get_mut(die).ok_or(GameError::InvalidCoords)?;
        *held = !*held;
        Ok(*held)
    }

    /// Scores the current dice in `category` and starts the next round.
    pub fn choose(&mut self, category: Category) -> Result<u32> {
        self.phase.check_playing()?;
        if !self.has_rolled() {
            return Err(GameError::NotRolled);
        }
        let slot = &mut self.scores[category.index()];
        if slot.is_some() {
            return Err(GameError::CategoryFilled);
        }
        let points = score(category, &self.dice);
        *slot = Some(points);

        self.held = [false; DICE];
        self.rolls_left = ROLLS_PER_ROUND;
        if self.scores.iter().all(Option::is_some) {
            self.phase = Phase::Finished;
            log::debug!("yahtzee finished with {}", self.total());
        } else {
            self.round += 1;
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn lower_section_scores() {
        assert_eq!(score(Category::FullHouse, &[2, 2, 2, 5, 5]), 25);
        assert_eq!(score(Category::FullHouse, &[2, 2, 2, 2, 5]), 0);
        assert_eq!(score(Category::FullHouse, &[4, 4, 4, 4, 4]), 0);
        assert_eq!(score(Category::SmallStraight, &[1, 2, 3, 4, 4]), 30);
        assert_eq!(score(Category::SmallStraight, &[6, 4, 3, 5, 1]), 30);
        assert_eq!(score(Category::SmallStraight, &[1, 2, 3, 5, 6]), 0);
        assert_eq!(score(Category::LargeStraight, &[2, 3, 4, 5, 6]), 40);
        assert_eq!(score(Category::LargeStraight, &[1, 2, 3, 4, 6]), 0);
        assert_eq!(score(Category::Yahtzee, &[6, 6, 6, 6, 6]), 50);
        assert_eq!(score(Category::Yahtzee, &[6, 6, 6, 6, 5]), 0);
        assert_eq!(score(Category::ThreeOfAKind, &[3, 3, 3, 1, 2]), 12);
        assert_eq!(score(Category::FourOfAKind, &[3, 3, 3, 1, 2]), 0);
        assert_eq!(score(Category::Chance, &[1, 2, 3, 4, 6]), 16);
    }

    #[test]
    fn upper_section_counts_faces() {
        assert_eq!(score(Category::Threes, &[3, 3, 4, 5, 3]), 9);
        assert_eq!(score(Category::Sixes, &[1, 2, 3, 4, 5]), 0);
    }

    #[test]
    fn holding_and_scoring_need_a_roll() {
        let mut game = Yahtzee::new();
        assert_eq!(game.toggle_hold(0), Err(GameError::NotRolled));
        assert_eq!(game.choose(Category::Chance), Err(GameError::NotRolled));
    }

    #[test]
    fn held_dice_survive_rerolls() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut game = Yahtzee::new();
        let first = game.roll(&mut rng).unwrap();
        game.toggle_hold(0).unwrap();
        game.toggle_hold(3).unwrap();
        for _ in 0..2 {
            let dice = game.roll(&mut rng).unwrap();
            assert_eq!((dice[0], dice[3]), (first[0], first[3]));
        }
        assert_eq!(game.roll(&mut rng), Err(GameError::NoRollsLeft));
    }

    #[test]
    fn filled_categories_never_change() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut game = Yahtzee::new();
        game.roll(&mut rng).unwrap();
        let points = game.choose(Category::Chance).unwrap();
        assert_eq!(game.rolls_left(), ROLLS_PER_ROUND);
        assert_eq!(game.held(), [false; DICE]);

        game.roll(&mut rng).unwrap();
        let before = game.clone();
        assert_eq!(game.choose(Category::Chance), Err(GameError::CategoryFilled));
        assert_eq!(game, before);
        assert_eq!(game.category_score(Category::Chance), Some(points));
    }

    #[test]
    fn saved_card_survives_a_reload() {
        let mut rng = SmallRng::seed_from_u64(30);
        let mut store = MemoryStore::new();
        let mut game = Yahtzee::new();
        game.roll(&mut rng).unwrap();
        game.choose(Category::Chance).unwrap();
        game.save_to(&mut store);

        let restored = load_or_else(&store, Yahtzee::new);
        assert_eq!(restored, game);
        Yahtzee::delete_from(&mut store);
        assert_eq!(load_or_else(&store, Yahtzee::new), Yahtzee::new());
    }

    #[test]
    fn full_card_finishes_with_the_upper_bonus() {
        let mut game = Yahtzee::new();
        for category in Category::ALL {
            // five of the face for every upper category keeps the subtotal well over 63
            game.dice = [category.face().unwrap_or(6); DICE];
            game.rolls_left = 2;
            game.choose(category).unwrap();
        }
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.upper_subtotal(), 5 * (1 + 2 + 3 + 4 + 5 + 6));
        assert_eq!(game.upper_bonus(), UPPER_BONUS);
        // 105 upper, 30 + 30 three and four of a kind, 50 yahtzee, 30 chance
        assert_eq!(game.total(), 105 + UPPER_BONUS + 30 + 30 + 50 + 30);
        assert_eq!(game.round(), 13);
    }
}
