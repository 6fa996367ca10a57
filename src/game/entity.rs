use super::{GameEvent, GameId};

/// Stream bookkeeping shared by every game state: identity, how many events
/// have been applied, and which of those have not been persisted yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: GameId,
    version: u64,
    uncommitted: Vec<GameEvent>,
}

impl Entity {
    pub fn with_id(id: GameId) -> Self {
        Entity {
            id,
            version: 0,
            uncommitted: Vec::new(),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version of the last event known to be persisted.
    pub fn committed_version(&self) -> u64 {
        self.version - self.uncommitted.len() as u64
    }

    /// Returns events applied since the last commit.
    pub fn new_events(&self) -> &[GameEvent] {
        &self.uncommitted
    }

    /// Record an applied event.
    pub fn digest(&mut self, event: GameEvent) {
        self.uncommitted.push(event);
        self.version += 1;
    }

    /// Forget the buffered events. Called after they were durably appended.
    pub fn mark_committed(&mut self) {
        self.uncommitted.clear();
    }
}
