//! Serializable types shared between the game engines, the local store and the persistence API.

use chrono::{DateTime, Utc};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key of a game, one per game type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
    Battleship,
    Sudoku,
    WordSearch,
    Hangman,
    Yahtzee,
    DiceRoller,
    DotsAndBoxes,
    ShellGame,
    MadLibs,
    WordScramble,
    Scorecard,
    WouldYouRather,
}

impl GameKind {
    pub const ALL: [GameKind; 14] = [
        GameKind::TicTacToe,
        GameKind::ConnectFour,
        GameKind::Battleship,
        GameKind::Sudoku,
        GameKind::WordSearch,
        GameKind::Hangman,
        GameKind::Yahtzee,
        GameKind::DiceRoller,
        GameKind::DotsAndBoxes,
        GameKind::ShellGame,
        GameKind::MadLibs,
        GameKind::WordScramble,
        GameKind::Scorecard,
        GameKind::WouldYouRather,
    ];

    pub const fn as_str(self) -> &'static str {
        use GameKind::*;
        match self {
            TicTacToe => "tic-tac-toe",
            ConnectFour => "connect-four",
            Battleship => "battleship",
            Sudoku => "sudoku",
            WordSearch => "word-search",
            Hangman => "hangman",
            Yahtzee => "yahtzee",
            DiceRoller => "dice-roller",
            DotsAndBoxes => "dots-and-boxes",
            ShellGame => "shell-game",
            MadLibs => "mad-libs",
            WordScramble => "word-scramble",
            Scorecard => "scorecard",
            WouldYouRather => "would-you-rather",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownGameKind(pub String);

impl fmt::Display for UnknownGameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game type: {}", self.0)
    }
}

impl FromStr for GameKind {
    type Err = UnknownGameKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownGameKind(s.into()))
    }
}

/// An active saved game as listed by the local store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub game_type: GameKind,
    pub last_modified: DateTime<Utc>,
    pub state: Value,
}

/// One entry of a per-game top score list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_label: String,
    pub score: i64,
    pub completed_at: DateTime<Utc>,
}

/// Row of the `game_states` table as returned by `GET /api/game-states`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateRecord {
    pub id: u64,
    pub game_type: GameKind,
    pub game_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub last_played: DateTime<Utc>,
    pub is_active: bool,
}

/// Body of `POST /api/game-states` and `PUT /api/game-states/:id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGameState {
    pub game_type: GameKind,
    pub game_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Body of `POST /api/scores`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub game_type: GameKind,
    pub player_name: String,
    pub score: i64,
}

/// Query string of `GET /api/scores/:gameType`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoresQuery {
    #[serde(default = "ScoresQuery::default_limit")]
    pub limit: usize,
}

impl ScoresQuery {
    pub const MAX_LIMIT: usize = 10;

    const fn default_limit() -> usize {
        Self::MAX_LIMIT
    }

    /// Requested limit clamped into `1..=MAX_LIMIT`.
    pub fn effective_limit(self) -> usize {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for ScoresQuery {
    fn default() -> Self {
        Self {
            limit: Self::MAX_LIMIT,
        }
    }
}

impl GameStateRecord {
    pub fn to_saved_game(&self) -> Option<SavedGame> {
        self.is_active.then(|| SavedGame {
            game_type: self.game_type,
            last_modified: self.last_played,
            state: self.game_data.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_kind_round_trips_through_its_key() {
        for kind in GameKind::ALL {
            assert_eq!(kind.as_str().parse::<GameKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!("chess".parse::<GameKind>().is_err());
    }

    #[test]
    fn upsert_defaults_to_active() {
        let body: UpsertGameState =
            serde_json::from_str(r#"{"gameType":"sudoku","gameData":{"a":1}}"#).unwrap();
        assert!(body.is_active);
        assert_eq!(body.game_type, GameKind::Sudoku);
        assert_eq!(body.user_id, None);
    }

    #[test]
    fn scores_query_limit_is_clamped() {
        let query: ScoresQuery = serde_json::from_str(r#"{"limit":50}"#).unwrap();
        assert_eq!(query.effective_limit(), 10);
        let query: ScoresQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert_eq!(ScoresQuery { limit: 0 }.effective_limit(), 1);
    }

    #[test]
    fn inactive_record_is_not_a_saved_game() {
        let record = GameStateRecord {
            id: 1,
            game_type: GameKind::Hangman,
            game_data: Value::Null,
            user_id: None,
            last_played: DateTime::<Utc>::MIN_UTC,
            is_active: false,
        };
        assert_eq!(record.to_saved_game(), None);
    }
}
