use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use playroom_protocol::{GameKind, SavedGame, ScoreEntry};

/// Number of entries kept per game in the local top-score list.
pub const TOP_SCORES: usize = 10;

/// Key-value persistence collaborator used by the game engines.
///
/// Writes are best-effort from the engines' point of view: nothing here reports failure, and
/// a missing entry is indistinguishable from one that was never saved.
pub trait GameStore {
    /// Overwrites the saved state for `game`, stamping it and marking it active.
    fn save(&mut self, game: GameKind, state: Value);

    /// Saved state for `game`, only while it is active.
    fn load(&self, game: GameKind) -> Option<Value>;

    fn delete(&mut self, game: GameKind);

    /// Active saved games, most recently modified first.
    fn list_active(&self) -> Vec<SavedGame>;

    fn record_score(&mut self, game: GameKind, player_label: &str, score: i64);

    /// Highest scores for `game`, best first.
    fn top_scores(&self, game: GameKind, limit: usize) -> Vec<ScoreEntry>;
}

/// Source of timestamps for saved games and scores.
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> WallClock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

#[derive(Clone, Debug)]
struct StoredState {
    state: Value,
    last_modified: DateTime<Utc>,
    active: bool,
    revision: u64,
}

/// In-process [`GameStore`], the reference implementation the browser storage mirrors.
#[derive(Debug)]
pub struct MemoryStore<C = SystemWallClock> {
    clock: C,
    states: HashMap<GameKind, StoredState>,
    scores: HashMap<GameKind, Vec<ScoreEntry>>,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(SystemWallClock)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: WallClock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            states: HashMap::new(),
            scores: HashMap::new(),
            revision: 0,
        }
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

impl<C: WallClock> GameStore for MemoryStore<C> {
    fn save(&mut self, game: GameKind, state: Value) {
        let revision = self.next_revision();
        let last_modified = self.clock.now();
        self.states.insert(
            game,
            StoredState {
                state,
                last_modified,
                active: true,
                revision,
            },
        );
    }

    fn load(&self, game: GameKind) -> Option<Value> {
        self.states
            .get(&game)
            .filter(|stored| stored.active)
            .map(|stored| stored.state.clone())
    }

    fn delete(&mut self, game: GameKind) {
        if let Some(stored) = self.states.get_mut(&game) {
            stored.active = false;
        }
    }

    fn list_active(&self) -> Vec<SavedGame> {
        let mut active: Vec<_> = self
            .states
            .iter()
            .filter(|(_, stored)| stored.active)
            .collect();
        active.sort_by(|(_, a), (_, b)| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| b.revision.cmp(&a.revision))
        });
        active
            .into_iter()
            .map(|(&game_type, stored)| SavedGame {
                game_type,
                last_modified: stored.last_modified,
                state: stored.state.clone(),
            })
            .collect()
    }

    fn record_score(&mut self, game: GameKind, player_label: &str, score: i64) {
        let completed_at = self.clock.now();
        let entries = self.scores.entry(game).or_default();
        // ties keep the earlier entry ahead
        let at = entries.partition_point(|entry| entry.score >= score);
        if at >= TOP_SCORES {
            log::debug!("{game} score {score} did not make the top {TOP_SCORES}");
            return;
        }
        entries.insert(
            at,
            ScoreEntry {
                player_label: player_label.into(),
                score,
                completed_at,
            },
        );
        entries.truncate(TOP_SCORES);
    }

    fn top_scores(&self, game: GameKind, limit: usize) -> Vec<ScoreEntry> {
        self.scores
            .get(&game)
            .map(|entries| entries.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

/// A game state record that knows its storage key.
pub trait Persist: Serialize + DeserializeOwned {
    const KIND: GameKind;

    fn save_to<S: GameStore + ?Sized>(&self, store: &mut S) {
        save_state(store, Self::KIND, self);
    }

    fn load_from<S: GameStore + ?Sized>(store: &S) -> Option<Self> {
        load_state(store, Self::KIND)
    }

    fn delete_from<S: GameStore + ?Sized>(store: &mut S) {
        store.delete(Self::KIND);
    }
}

/// Serializes and saves `state`; a state that cannot be serialized is logged and skipped.
pub fn save_state<S, T>(store: &mut S, game: GameKind, state: &T)
where
    S: GameStore + ?Sized,
    T: Serialize + ?Sized,
{
    match serde_json::to_value(state) {
        Ok(value) => store.save(game, value),
        Err(err) => log::error!("Could not save {game} to the store: {err:?}"),
    }
}

/// Loads and deserializes a saved state; missing or corrupt data yields `None`.
pub fn load_state<S, T>(store: &S, game: GameKind) -> Option<T>
where
    S: GameStore + ?Sized,
    T: DeserializeOwned,
{
    let value = store.load(game)?;
    match serde_json::from_value(value) {
        Ok(state) => Some(state),
        Err(err) => {
            log::warn!("Discarding corrupt saved state for {game}: {err}");
            None
        }
    }
}

/// Saved state of `T`, or a fresh one from `init` when nothing usable was stored.
pub fn load_or_else<S, T, F>(store: &S, init: F) -> T
where
    S: GameStore + ?Sized,
    T: Persist,
    F: FnOnce() -> T,
{
    T::load_from(store).unwrap_or_else(init)
}
