//! Error types for the progression and content engines.
//!
//! Every variant is recoverable; the presentation layer turns the boundary
//! ones (`InvalidFormat`, `Unreadable`, `Persistence`) into toasts and keeps
//! running.

use thiserror::Error;

/// Result type for core game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors the core can report to the presentation layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Bad input to an operation (e.g. a negative experience award).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Equip attempt on an avatar the player does not own.
    #[error("avatar not owned: {0}")]
    NotOwned(String),

    /// Shop purchase the player cannot pay for.
    #[error("cannot afford: costs {cost} coins, have {coins}")]
    CannotAfford { cost: u64, coins: u64 },

    /// Structurally wrong import bundle (missing top-level arrays).
    #[error("invalid bundle structure: {0}")]
    InvalidFormat(String),

    /// Import file could not be parsed at all.
    #[error("unreadable content file: {0}")]
    Unreadable(String),

    /// The underlying key-value store failed to read or write.
    #[error("persistence failure: {0}")]
    Persistence(String),
}
