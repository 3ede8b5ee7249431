//! Player profile storage contract and its in-memory implementation.
//!
//! Profiles are read once when a battle starts. The only write a battle ever
//! makes is clearing the one-shot rest buff, and a failed write never blocks
//! or aborts the battle.
mod memory;

use async_trait::async_trait;
use battle_core::{CombatantId, PlayerProfile};
use thiserror::Error;

pub use memory::{InMemoryPlayerRepository, ProfileRecord};

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no profile for player {0}")]
    UnknownPlayer(CombatantId),

    #[error("player repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Persistent player attributes, owned outside the battle system.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Snapshot of the player's profile for a new battle.
    async fn get_profile(&self, id: CombatantId) -> Result<PlayerProfile>;

    /// Clears the player's rest buff after it was applied to a battle.
    async fn consume_rest_buff(&self, id: CombatantId) -> Result<()>;
}
