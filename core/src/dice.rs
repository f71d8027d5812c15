//! Dice roller for tabletop formulas such as `2d6+1d4-1`, with a short tumbling animation.

use core::fmt;
use core::str::FromStr;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use web_time::Duration;

use crate::*;

pub const MAX_DICE: u32 = 100;
pub const MIN_SIDES: u32 = 2;
pub const MAX_SIDES: u32 = 1000;
pub const HISTORY_LEN: usize = 10;

/// `count` dice with `sides` faces each, added or subtracted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceGroup {
    pub count: u32,
    pub sides: u32,
    pub negative: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub groups: Vec<DiceGroup>,
    /// Sum of the constant terms.
    pub modifier: i64,
}

fn invalid(reason: impl Into<String>) -> GameError {
    GameError::InvalidFormula(reason.into())
}

fn parse_number(text: &str, what: &str) -> Result<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("expected {what}, found `{text}`")));
    }
    text.parse()
        .map_err(|_| invalid(format!("{what} `{text}` is too large")))
}

impl FromStr for Formula {
    type Err = GameError;

    fn from_str(input: &str) -> Result<Self> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if compact.is_empty() {
            return Err(invalid("empty formula"));
        }

        let mut terms = Vec::new();
        let mut start = 0;
        for (i, c) in compact.char_indices() {
            if i > 0 && (c == '+' || c == '-') {
                terms.push(&compact[start..i]);
                start = i;
            }
        }
        terms.push(&compact[start..]);

        let mut formula = Formula {
            groups: Vec::new(),
            modifier: 0,
        };
        for term in terms {
            let (negative, body) = match term.strip_prefix('-') {
                Some(body) => (true, body),
                None => (false, term.strip_prefix('+').unwrap_or(term)),
            };
            match body.split_once('d') {
                Some((count, sides)) => {
                    let count = if count.is_empty() {
                        1
                    } else {
                        parse_number(count, "a dice count")?
                    };
                    let sides = parse_number(sides, "a number of sides")?;
                    if !(1..=MAX_DICE).contains(&count) {
                        return Err(invalid(format!("dice count must be 1 to {MAX_DICE}")));
                    }
                    if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
                        return Err(invalid(format!(
                            "dice need {MIN_SIDES} to {MAX_SIDES} sides"
                        )));
                    }
                    formula.groups.push(DiceGroup {
                        count,
                        sides,
                        negative,
                    });
                }
                None => {
                    let value = i64::from(parse_number(body, "a number")?);
                    formula.modifier += if negative { -value } else { value };
                }
            }
        }

        if formula.groups.is_empty() {
            return Err(invalid("formula rolls no dice"));
        }
        Ok(formula)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if group.negative {
                f.write_str("-")?;
            } else if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{}d{}", group.count, group.sides)?;
        }
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoll {
    pub group: DiceGroup,
    pub faces: Vec<u32>,
}

impl GroupRoll {
    pub fn subtotal(&self) -> i64 {
        let sum: i64 = self.faces.iter().map(|&face| i64::from(face)).sum();
        if self.group.negative { -sum } else { sum }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub formula: String,
    pub groups: Vec<GroupRoll>,
    pub modifier: i64,
    pub total: i64,
}

impl Formula {
    pub fn dice_count(&self) -> u32 {
        self.groups.iter().map(|group| group.count).sum()
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> RollRecord {
        let groups: Vec<GroupRoll> = self
            .groups
            .iter()
            .map(|&group| GroupRoll {
                group,
                faces: (0..group.count)
                    .map(|_| rng.random_range(1..=group.sides))
                    .collect(),
            })
            .collect();
        let total = groups.iter().map(GroupRoll::subtotal).sum::<i64>() + self.modifier;
        RollRecord {
            formula: self.to_string(),
            groups,
            modifier: self.modifier,
            total,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollerConfig {
    /// Random faces shown before the dice settle.
    pub tumble_frames: u8,
    pub frame_delay_ms: u64,
}

impl RollerConfig {
    pub const MAX_FRAMES: u8 = 30;
    pub const MAX_FRAME_DELAY_MS: u64 = 500;

    pub fn new(tumble_frames: u8, frame_delay_ms: u64) -> Self {
        Self {
            tumble_frames: tumble_frames.min(Self::MAX_FRAMES),
            frame_delay_ms: frame_delay_ms.min(Self::MAX_FRAME_DELAY_MS),
        }
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self::new(8, 60)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Tumble,
    Settle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Rolling {
    formula: Formula,
    frames_left: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiceRoller {
    config: RollerConfig,
    rolling: Option<Rolling>,
    /// Faces on display while tumbling.
    tumbling: Vec<u32>,
    history: VecDeque<RollRecord>,
}

impl Persist for DiceRoller {
    const KIND: GameKind = GameKind::DiceRoller;
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(RollerConfig::default())
    }
}

impl DiceRoller {
    pub fn new(config: RollerConfig) -> Self {
        Self {
            config: RollerConfig::new(config.tumble_frames, config.frame_delay_ms),
            rolling: None,
            tumbling: Vec::new(),
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling.is_some()
    }

    pub fn tumbling(&self) -> &[u32] {
        &self.tumbling
    }

    /// Newest roll first.
    pub fn history(&self) -> impl Iterator<Item = &RollRecord> {
        self.history.iter()
    }

    pub fn last(&self) -> Option<&RollRecord> {
        self.history.front()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Starts rolling `input`. The returned step must be scheduled.
    pub fn roll(&mut self, input: &str) -> Result<(Duration, Step)> {
        if self.is_rolling() {
            return Err(GameError::Busy);
        }
        let formula: Formula = input.parse()?;
        log::trace!("rolling {formula}");
        self.rolling = Some(Rolling {
            formula,
            frames_left: self.config.tumble_frames,
        });
        Ok(self.next_step())
    }

    /// Step to reschedule after restoring a roller saved mid-roll.
    pub fn pending_step(&self) -> Option<(Duration, Step)> {
        self.is_rolling().then(|| self.next_step())
    }

    fn next_step(&self) -> (Duration, Step) {
        let frames_left = self.rolling.as_ref().map_or(0, |rolling| rolling.frames_left);
        let step = if frames_left > 0 {
            Step::Tumble
        } else {
            Step::Settle
        };
        (self.config.frame_delay(), step)
    }
}

impl Animated for DiceRoller {
    type Step = Step;

    fn advance<R: Rng + ?Sized>(&mut self, step: Step, rng: &mut R) -> Option<(Duration, Step)> {
        let rolling = self.rolling.as_mut()?;
        match step {
            Step::Tumble => {
                if rolling.frames_left == 0 {
                    return None;
                }
                rolling.frames_left -= 1;
                self.tumbling = rolling
                    .formula
                    .groups
                    .iter()
                    .flat_map(|group| (0..group.count).map(|_| group.sides))
                    .map(|sides| rng.random_range(1..=sides))
                    .collect();
                Some(self.next_step())
            }
            Step::Settle => {
                let record = rolling.formula.roll(rng);
                log::debug!("{} rolled {}", record.formula, record.total);
                self.rolling = None;
                self.tumbling.clear();
                self.history.push_front(record);
                self.history.truncate(HISTORY_LEN);
                None
            }
        }
    }
}
