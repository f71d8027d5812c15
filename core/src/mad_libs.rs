//! Mad libs: fill in the blanks of a story template without seeing it, then read the result.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub title: &'static str,
    /// Story text with `{label}` placeholders.
    pub text: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        title: "A Day at the Zoo",
        text: "Today I went to the zoo and saw a {adjective} {animal} eating {food}. \
               It looked at me and started to {verb}. I laughed so hard that my {body part} hurt.",
    },
    Template {
        title: "The Space Mission",
        text: "Captain {name} climbed into the {adjective} rocket with a {noun} in hand. \
               After {number} days in orbit the crew landed on {planet} and began to {verb}.",
    },
    Template {
        title: "Breakfast Disaster",
        text: "I tried to cook {food} for breakfast, but the {noun} was {adjective}. \
               The kitchen filled with {plural noun}, so I ran outside and shouted {exclamation}!",
    },
];

/// One piece of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Text(String),
    Blank(String),
}

/// Splits `text` into literal text and `{label}` blanks. An unclosed brace is kept as text.
pub fn parse_template(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_owned()));
        }
        segments.push(Segment::Blank(rest[open + 1..close].trim().to_owned()));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_owned()));
    }
    segments
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MadLibs {
    title: String,
    segments: Vec<Segment>,
    answers: Vec<Option<String>>,
    phase: Phase,
}

impl Persist for MadLibs {
    const KIND: GameKind = GameKind::MadLibs;
}

impl MadLibs {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
        Self::from_template(template.title, template.text)
    }

    pub fn from_template(title: &str, text: &str) -> Self {
        let segments = parse_template(text);
        let blanks = segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Blank(_)))
            .count();
        Self {
            title: title.to_owned(),
            segments,
            answers: vec![None; blanks],
            phase: Phase::Playing,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Labels of the blanks, in story order.
    pub fn blanks(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Blank(label) => Some(label.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn answer(&self, blank: usize) -> Option<&str> {
        self.answers.get(blank)?.as_deref()
    }

    pub fn filled(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    pub fn fill(&mut self, blank: usize, answer: &str) -> Result<()> {
        self.phase.check_playing()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GameError::EmptyInput);
        }
        let slot = self.answers.get_mut(blank).ok_or(GameError::InvalidCoords)?;
        *slot = Some(answer.to_owned());
        Ok(())
    }

    /// Assembles the story once every blank has an answer.
    pub fn reveal(&mut self) -> Result<String> {
        if !self.is_complete() {
            return Err(GameError::Incomplete);
        }
        let mut answers = self.answers.iter().flatten();
        let mut story = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => story.push_str(text),
                Segment::Blank(_) => story.push_str(answers.next().map_or("", String::as_str)),
            }
        }
        self.phase = Phase::Finished;
        Ok(story)
    }
}
