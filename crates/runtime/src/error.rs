//! Unified error type surfaced by the runtime API.
use battle_core::{ArenaId, ExecuteError, SetupError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} already hosts a battle")]
    ArenaBusy(ArenaId),

    #[error("no battle in {0}")]
    NoSession(ArenaId),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("runtime requires a player repository before building")]
    MissingRepository,

    #[error("arena worker command channel closed")]
    CommandChannelClosed,

    #[error("arena worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("arena worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// The rules rejection behind this error, if it is one.
    pub fn execute_error(&self) -> Option<&ExecuteError> {
        match self {
            RuntimeError::Execute(error) => Some(error),
            _ => None,
        }
    }
}
