use tracing::debug;

use crate::game::{Game, GameEvent, GameId};
use crate::record::EventRecord;
use crate::store::{EventStore, RepositoryError};

/// Loads games by replaying their streams and persists their uncommitted
/// events.
pub struct GameRepository<S> {
    store: S,
}

impl<S: EventStore> GameRepository<S> {
    pub fn new(store: S) -> Self {
        GameRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `None` when nothing was ever committed for `id`.
    pub fn get(&self, id: &GameId) -> Result<Option<Game>, RepositoryError> {
        let records = self.store.load(id)?;
        if records.is_empty() {
            return Ok(None);
        }

        let events = records
            .iter()
            .map(GameEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Game::replay(id.clone(), events)?))
    }

    /// Append the game's buffered events, then hand it back with an empty
    /// buffer. Nothing to persist is a no-op.
    pub fn commit(&self, game: Game) -> Result<Game, RepositoryError> {
        if game.new_events().is_empty() {
            return Ok(game);
        }

        let expected = game.committed_version();
        let records = game
            .new_events()
            .iter()
            .zip(expected + 1..)
            .map(|(event, sequence)| event.to_record(sequence))
            .collect::<Result<Vec<EventRecord>, _>>()?;

        self.store.append(game.id(), expected, &records)?;
        debug!(
            game_id = %game.id(),
            events = records.len(),
            version = game.version(),
            "game committed"
        );
        Ok(game.mark_committed())
    }

    pub fn ids(&self) -> Result<Vec<GameId>, RepositoryError> {
        self.store.ids()
    }
}
