use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{EventStore, RepositoryError};
use crate::game::GameId;
use crate::record::EventRecord;

/// In-memory event store. Clones share the same storage.
#[derive(Clone, Default)]
pub struct HashMapEventStore {
    storage: Arc<RwLock<HashMap<GameId, Vec<EventRecord>>>>,
}

impl HashMapEventStore {
    pub fn new() -> Self {
        HashMapEventStore::default()
    }
}

impl EventStore for HashMapEventStore {
    fn load(&self, id: &GameId) -> Result<Vec<EventRecord>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(storage.get(id).cloned().unwrap_or_default())
    }

    fn append(
        &self,
        id: &GameId,
        expected_version: u64,
        records: &[EventRecord],
    ) -> Result<(), RepositoryError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;

        let stream = storage.entry(id.clone()).or_default();
        let actual = stream.len() as u64;
        if actual != expected_version {
            return Err(RepositoryError::ConcurrentWrite {
                id: id.clone(),
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(records);
        debug!(game_id = %id, appended = records.len(), version = stream.len(), "events appended");
        Ok(())
    }

    fn ids(&self) -> Result<Vec<GameId>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        let mut ids: Vec<GameId> = storage
            .iter()
            .filter(|(_, stream)| !stream.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
