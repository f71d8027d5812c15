use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dice::RollerConfig;
use crate::dots_and_boxes::DotsConfig;
use crate::tictactoe::TicTacToeConfig;
use crate::{hangman, shell_game, sudoku, word_search};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("could not write settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectFourSettings {
    pub vs_ai: bool,
}

impl Default for ConnectFourSettings {
    fn default() -> Self {
        Self { vs_ai: true }
    }
}

/// Preferred options for every game, as chosen on the home screen.
///
/// Every section and field is optional in the serialized form; missing parts take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sudoku: sudoku::Difficulty,
    pub word_search: word_search::Category,
    pub hangman: hangman::Category,
    pub shell_game: shell_game::Difficulty,
    pub tictactoe: TicTacToeConfig,
    pub connect_four: ConnectFourSettings,
    pub dots_and_boxes: DotsConfig,
    pub dice: RollerConfig,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        Ok(settings.normalized())
    }

    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.normalized())
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string(self)?)
    }

    /// Clamps every numeric option into its legal range.
    pub fn normalized(self) -> Self {
        let Self {
            tictactoe,
            dots_and_boxes,
            dice,
            ..
        } = self;
        Self {
            tictactoe: TicTacToeConfig::new(tictactoe.boards, tictactoe.players, tictactoe.vs_ai),
            dots_and_boxes: DotsConfig::new(dots_and_boxes.size, dots_and_boxes.players),
            dice: RollerConfig::new(dice.tumble_frames, dice.frame_delay_ms),
            ..self
        }
    }
}
