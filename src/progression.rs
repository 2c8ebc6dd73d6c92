//! Player progression: experience, leveling, currency, ownership, stats.
//!
//! All state that must survive a reload lives in `PlayerState`; every public
//! mutation on `ProgressionStore` writes the full snapshot back to storage
//! before returning (save-after-every-mutation, no batching).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_AVATAR_ID, LEVEL_UP_COINS, SAVE_KEY, STARTING_COINS, XP_BASE};
use crate::error::{GameError, GameResult};
use crate::persistence::KeyValueStore;

/// Experience required to clear `level` and reach the next one.
///
/// Quadratic on purpose: early levels come fast, later levels cost
/// disproportionately more. Pure function of `level`, no hidden state.
pub fn req_xp(level: u32) -> u64 {
    XP_BASE * u64::from(level) * u64::from(level)
}

/// Lifetime answer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStats {
    pub total_correct: u64,
    pub total_answered: u64,
}

/// The persisted player snapshot (save format v3, camelCase field names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub coins: u64,
    /// Experience toward the current level; always `< xp_to_next`.
    pub xp: u64,
    pub level: u32,
    /// Derived from `level` via `req_xp`; re-derived on load.
    pub xp_to_next: u64,
    pub current_streak: u32,
    /// When the player last spun the daily wheel. The spin logic itself lives
    /// in the presentation layer; the store only keeps the outcome.
    #[serde(rename = "lastSpinISO")]
    pub last_spin_iso: Option<String>,
    /// Must reference an id in `owned_avatar_ids`.
    pub equipped_avatar: String,
    pub owned_avatar_ids: BTreeSet<String>,
    pub stats: AnswerStats,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            xp: 0,
            level: 1,
            xp_to_next: req_xp(1),
            current_streak: 0,
            last_spin_iso: None,
            equipped_avatar: DEFAULT_AVATAR_ID.to_string(),
            owned_avatar_ids: BTreeSet::from([DEFAULT_AVATAR_ID.to_string()]),
            stats: AnswerStats::default(),
        }
    }
}

/// Emitted once per level transition during an experience award, in
/// ascending level order, so the presentation layer can animate each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub new_level: u32,
    pub coins_awarded: u64,
}

/// Owns the player snapshot and the storage it persists through.
pub struct ProgressionStore<S> {
    state: PlayerState,
    storage: S,
}

impl<S: KeyValueStore> ProgressionStore<S> {
    /// Load the saved snapshot, falling back to the default state when the
    /// save is absent, unreadable, or malformed. Never fails.
    pub fn load(storage: S) -> Self {
        let state = match storage.get(SAVE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<PlayerState>(&json) {
                Ok(mut state) => {
                    // Older saves may carry a stale derived field.
                    state.xp_to_next = req_xp(state.level);
                    log::info!("Loaded save at level {}", state.level);
                    state
                }
                Err(e) => {
                    log::warn!("Corrupt save discarded: {e}");
                    PlayerState::default()
                }
            },
            Ok(None) => {
                log::info!("No save found, starting fresh");
                PlayerState::default()
            }
            Err(e) => {
                log::warn!("Save storage unavailable: {e}");
                PlayerState::default()
            }
        };
        Self { state, storage }
    }

    /// Current player snapshot.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Write the full current snapshot to storage.
    pub fn persist(&mut self) -> GameResult<()> {
        let json = serde_json::to_string(&self.state)
            .map_err(|e| GameError::Persistence(e.to_string()))?;
        self.storage.set(SAVE_KEY, &json)
    }

    /// Add experience, carrying overflow into level-ups.
    ///
    /// Each level gained grants the fixed coin bonus and emits one event;
    /// events come back in ascending level order. The carry loop terminates
    /// because `req_xp` is strictly positive and grows with `level`. State is
    /// persisted exactly once, after the loop.
    ///
    /// `amount == 0` is a persisted no-op; a negative amount is rejected with
    /// `InvalidArgument` and changes nothing.
    pub fn award_experience(&mut self, amount: i64) -> GameResult<Vec<LevelUpEvent>> {
        if amount < 0 {
            return Err(GameError::InvalidArgument(format!(
                "negative experience award: {amount}"
            )));
        }
        self.state.xp += amount as u64;

        let mut events = Vec::new();
        while self.state.xp >= self.state.xp_to_next {
            self.state.xp -= self.state.xp_to_next;
            self.state.level += 1;
            self.state.coins += LEVEL_UP_COINS;
            self.state.xp_to_next = req_xp(self.state.level);
            events.push(LevelUpEvent {
                new_level: self.state.level,
                coins_awarded: LEVEL_UP_COINS,
            });
        }

        self.persist()?;
        Ok(events)
    }

    /// Equip an owned avatar. `NotOwned` leaves the current equip unchanged.
    pub fn equip_avatar(&mut self, avatar_id: &str) -> GameResult<()> {
        if !self.state.owned_avatar_ids.contains(avatar_id) {
            return Err(GameError::NotOwned(avatar_id.to_string()));
        }
        self.state.equipped_avatar = avatar_id.to_string();
        self.persist()
    }

    /// Shop purchase: deduct `cost` and add the avatar to the owned set.
    ///
    /// `Ok(false)` when the avatar was already owned (nothing is charged);
    /// `CannotAfford` when coins fall short.
    pub fn unlock_avatar(&mut self, avatar_id: &str, cost: u64) -> GameResult<bool> {
        if self.state.owned_avatar_ids.contains(avatar_id) {
            return Ok(false);
        }
        if self.state.coins < cost {
            return Err(GameError::CannotAfford {
                cost,
                coins: self.state.coins,
            });
        }
        self.state.coins -= cost;
        self.state.owned_avatar_ids.insert(avatar_id.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Record one answered question.
    pub fn record_answer(&mut self, correct: bool) -> GameResult<()> {
        self.state.stats.total_answered += 1;
        if correct {
            self.state.stats.total_correct += 1;
        }
        self.persist()
    }

    /// Store the outcome of a daily spin. The wheel itself (eligibility,
    /// streak rules, prize table) belongs to the presentation layer.
    pub fn record_daily_spin(
        &mut self,
        timestamp_iso: String,
        new_streak: u32,
        coins_won: u64,
    ) -> GameResult<()> {
        self.state.last_spin_iso = Some(timestamp_iso);
        self.state.current_streak = new_streak;
        self.state.coins += coins_won;
        self.persist()
    }
}
