//! QuizQuest Core - progression and content engine for a casual quiz game
//!
//! Core modules:
//! - `progression`: player state, leveling curve, reward issuance
//! - `catalog`: avatar/quiz-set catalog with idempotent bundle merge
//! - `content`: built-in avatars and quiz sets
//! - `persistence`: LocalStorage-backed key-value save layer
//! - `session`: wiring between the core and the presentation layer
//! - `notify`: capability traits the presentation layer implements

pub mod catalog;
pub mod content;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod progression;
pub mod session;

pub use catalog::{Avatar, ContentBundle, ContentCatalog, MergeReport, Question, QuizSet};
pub use error::{GameError, GameResult};
pub use progression::{LevelUpEvent, PlayerState, ProgressionStore, req_xp};
pub use session::GameSession;

/// Game balance and storage constants
pub mod consts {
    /// Experience required per level is `XP_BASE * level * level`.
    pub const XP_BASE: u64 = 25;
    /// Coins granted on each level-up.
    pub const LEVEL_UP_COINS: u64 = 10;
    /// Coins a brand-new player starts with.
    pub const STARTING_COINS: u64 = 250;
    /// Avatar every player owns and equips from the start.
    pub const DEFAULT_AVATAR_ID: &str = "smiley_0";
    /// Versioned LocalStorage key for the save snapshot.
    pub const SAVE_KEY: &str = "qq-save-v3";
    /// Suggested filename for exported content bundles.
    pub const BUNDLE_FILE_NAME: &str = "quizquest-content.json";
    /// Experience granted per correct answer.
    pub const XP_PER_CORRECT: i64 = 10;
}
