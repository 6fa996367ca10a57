//! Error types for game service operations.

use thiserror::Error;

use crate::game::{GameId, Violation};
use crate::store::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No game was created or stored under this id.
    #[error("game {0} not found")]
    GameNotFound(GameId),
    /// The game turned the command down.
    #[error("rejected: {0}")]
    Rejected(#[from] Violation),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("dice lock poisoned")]
    DicePoisoned,
}

impl ServiceError {
    /// The business-rule rejection, if that is what this is.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            ServiceError::Rejected(violation) => Some(*violation),
            _ => None,
        }
    }
}
