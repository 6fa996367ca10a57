use thiserror::Error;

use crate::game::{GameId, ReplayError};
use crate::record::PayloadError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("concurrent write detected for game {id} (expected version {expected}, got {actual})")]
    ConcurrentWrite {
        id: GameId,
        expected: u64,
        actual: u64,
    },
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),
}
