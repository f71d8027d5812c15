//! Shell game: watch the ball go under a shell, follow the swaps, then pick the right shell.

use rand::Rng;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

pub const SHELLS: usize = 3;
pub const ROUNDS: u8 = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn swaps(self) -> u8 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 15,
        }
    }

    pub const fn swap_delay(self) -> Duration {
        Duration::from_millis(match self {
            Self::Easy => 600,
            Self::Medium => 400,
            Self::Hard => 250,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellPhase {
    /// Ball visible, waiting for the first round to start.
    #[default]
    Waiting,
    Shuffling,
    Guessing,
    /// Round over, ball visible again.
    Revealed,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// One exchange of two shells during the given round.
    Swap { round: u8 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellGame {
    difficulty: Difficulty,
    phase: ShellPhase,
    /// Slot currently covering the ball.
    ball: usize,
    swaps_left: u8,
    last_swap: Option<(usize, usize)>,
    round: u8,
    score: u8,
    last_guess: Option<(usize, bool)>,
}

impl Persist for ShellGame {
    const KIND: GameKind = GameKind::ShellGame;
}

impl ShellGame {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            phase: ShellPhase::Waiting,
            ball: SHELLS / 2,
            swaps_left: 0,
            last_swap: None,
            round: 0,
            score: 0,
            last_guess: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    /// Where the ball is, hidden while the shells are moving or awaiting a guess.
    pub fn ball(&self) -> Option<usize> {
        match self.phase {
            ShellPhase::Shuffling | ShellPhase::Guessing => None,
            _ => Some(self.ball),
        }
    }

    /// The two slots exchanged by the latest swap.
    pub fn last_swap(&self) -> Option<(usize, usize)> {
        self.last_swap
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    /// Slot picked in the current round and whether it hid the ball.
    pub fn last_guess(&self) -> Option<(usize, bool)> {
        self.last_guess
    }

    /// Hides the ball and starts shuffling the next round. The returned step must be scheduled.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(Duration, Step)> {
        match self.phase {
            ShellPhase::Waiting | ShellPhase::Revealed => {}
            ShellPhase::Shuffling => return Err(GameError::Busy),
            ShellPhase::Guessing => return Err(GameError::WrongPhase),
            ShellPhase::Finished => return Err(GameError::AlreadyEnded),
        }
        self.round += 1;
        self.ball = rng.random_range(0..SHELLS);
        self.swaps_left = self.difficulty.swaps();
        self.last_swap = None;
        self.last_guess = None;
        self.phase = ShellPhase::Shuffling;
        log::trace!("round {} starts with the ball under {}", self.round, self.ball);
        Ok((self.difficulty.swap_delay(), self.swap_step()))
    }

    fn swap_step(&self) -> Step {
        Step::Swap { round: self.round }
    }

    /// Step to reschedule after restoring a game saved mid-shuffle.
    pub fn pending_step(&self) -> Option<(Duration, Step)> {
        (self.phase == ShellPhase::Shuffling)
            .then(|| (self.difficulty.swap_delay(), self.swap_step()))
    }

    pub fn guess(&mut self, slot: usize) -> Result<bool> {
        match self.phase {
            ShellPhase::Guessing => {}
            ShellPhase::Shuffling => return Err(GameError::Busy),
            ShellPhase::Finished => return Err(GameError::AlreadyEnded),
            _ => return Err(GameError::WrongPhase),
        }
        if slot >= SHELLS {
            return Err(GameError::InvalidCoords);
        }
        let correct = slot == self.ball;
        if correct {
            self.score += 1;
        }
        self.last_guess = Some((slot, correct));
        self.phase = if self.round >= ROUNDS {
            ShellPhase::Finished
        } else {
            ShellPhase::Revealed
        };
        Ok(correct)
    }
}

impl Animated for ShellGame {
    type Step = Step;

    fn advance<R: Rng + ?Sized>(&mut self, step: Step, rng: &mut R) -> Option<(Duration, Step)> {
        match step {
            Step::Swap { round } => {
                if round != self.round
                    || self.phase != ShellPhase::Shuffling
                    || self.swaps_left == 0
                {
                    return None;
                }
                let a = rng.random_range(0..SHELLS);
                let b = (a + rng.random_range(1..SHELLS)) % SHELLS;
                if self.ball == a {
                    self.ball = b;
                } else if self.ball == b {
                    self.ball = a;
                }
                self.last_swap = Some((a, b));
                self.swaps_left -= 1;

                if self.swaps_left == 0 {
                    self.phase = ShellPhase::Guessing;
                    None
                } else {
                    Some((self.difficulty.swap_delay(), self.swap_step()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn shuffled(game: &mut ShellGame, rng: &mut SmallRng) -> usize {
        let mut scheduler = Scheduler::new();
        let (delay, step) = game.start(rng).unwrap();
        scheduler.schedule(delay, step);
        let swaps = scheduler.run_until_idle(game, rng);
        assert_eq!(game.phase(), ShellPhase::Guessing);
        swaps
    }

    #[test]
    fn swap_count_follows_difficulty() {
        let mut rng = SmallRng::seed_from_u64(3);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut game = ShellGame::new(difficulty);
            assert_eq!(shuffled(&mut game, &mut rng), usize::from(difficulty.swaps()));
            let (a, b) = game.last_swap().unwrap();
            assert_ne!(a, b);
            assert_eq!(game.ball(), None);
        }
    }

    #[test]
    fn ball_follows_its_shell() {
        let mut rng = SmallRng::seed_from_u64(12);
        let mut game = ShellGame::new(Difficulty::Hard);
        let (_, step) = game.start(&mut rng).unwrap();
        for _ in 0..Difficulty::Hard.swaps() {
            let before = game.ball;
            game.advance(step, &mut rng);
            let (a, b) = game.last_swap.unwrap();
            let expected = if before == a {
                b
            } else if before == b {
                a
            } else {
                before
            };
            assert_eq!(game.ball, expected);
        }
        assert_eq!(game.advance(step, &mut rng), None);
    }

    #[test]
    fn swaps_from_an_earlier_round_are_ignored() {
        let mut rng = SmallRng::seed_from_u64(14);
        let mut game = ShellGame::new(Difficulty::Easy);
        let (_, stale) = game.start(&mut rng).unwrap();
        game.phase = ShellPhase::Revealed;

        let (_, current) = game.start(&mut rng).unwrap();
        assert_eq!(current, Step::Swap { round: 2 });
        let before = game.clone();
        assert_eq!(game.advance(stale, &mut rng), None);
        assert_eq!(game, before);

        assert!(game.advance(current, &mut rng).is_some());
        assert_eq!(game.swaps_left, Difficulty::Easy.swaps() - 1);
    }

    #[test]
    fn five_rounds_then_finished() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut game = ShellGame::new(Difficulty::Easy);
        assert_eq!(game.guess(0), Err(GameError::WrongPhase));

        for round in 1..=ROUNDS {
            shuffled(&mut game, &mut rng);
            let ball = game.ball;
            assert_eq!(game.guess(ball), Ok(true));
            assert_eq!(game.round(), round);
        }
        assert_eq!(game.score(), ROUNDS);
        assert_eq!(game.phase(), ShellPhase::Finished);
        assert_eq!(game.start(&mut rng), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn input_while_shuffling_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut game = ShellGame::new(Difficulty::Medium);
        game.start(&mut rng).unwrap();
        assert_eq!(game.guess(1), Err(GameError::Busy));
        assert_eq!(game.start(&mut rng), Err(GameError::Busy));
        assert!(game.pending_step().is_some());
    }

    #[test]
    fn wrong_guess_scores_nothing() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut game = ShellGame::new(Difficulty::Easy);
        shuffled(&mut game, &mut rng);
        let wrong = (game.ball + 1) % SHELLS;
        assert_eq!(game.guess(wrong), Ok(false));
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), ShellPhase::Revealed);
        assert_eq!(game.ball(), Some(game.ball));
        assert_eq!(game.guess(3), Err(GameError::WrongPhase));
    }
}
