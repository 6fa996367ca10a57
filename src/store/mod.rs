mod error;
mod hash_map;

pub use error::RepositoryError;
pub use hash_map::HashMapEventStore;

use crate::game::GameId;
use crate::record::EventRecord;

/// Append-only storage of game event streams.
pub trait EventStore: Send + Sync {
    /// Full stream for `id`, oldest first. Unknown ids yield an empty stream.
    fn load(&self, id: &GameId) -> Result<Vec<EventRecord>, RepositoryError>;

    /// Append `records` to the stream, provided it currently holds exactly
    /// `expected_version` events.
    fn append(
        &self,
        id: &GameId,
        expected_version: u64,
        records: &[EventRecord],
    ) -> Result<(), RepositoryError>;

    /// Ids of every non-empty stream.
    fn ids(&self) -> Result<Vec<GameId>, RepositoryError>;
}
