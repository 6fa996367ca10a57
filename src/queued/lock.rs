use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use crate::game::GameId;
use crate::store::RepositoryError;

struct Lock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl Lock {
    fn new() -> Self {
        Lock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    fn lock(&self) -> Result<(), RepositoryError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("game lock"))?;
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .map_err(|_| RepositoryError::LockPoisoned("game lock"))?;
        }
        *locked = true;
        Ok(())
    }

    fn unlock(&self) {
        // A poisoned flag is still a flag; release it regardless.
        let mut locked = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
    }

    fn is_locked(&self) -> bool {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// One lock per game id. Holders of different ids never wait on each other.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<GameId, Arc<Lock>>>,
}

/// Held while a game is being mutated; releases on drop.
///
/// The last guard or waiter for an id also drops its entry from the map.
pub struct GameGuard<'a> {
    locks: &'a KeyedLocks,
    id: GameId,
    lock: Arc<Lock>,
}

impl Drop for GameGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
        self.locks.release(&self.id, &self.lock);
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        KeyedLocks::default()
    }

    /// Block until `id` is free, then hold it until the guard drops.
    pub fn acquire(&self, id: &GameId) -> Result<GameGuard<'_>, RepositoryError> {
        let lock = self.ensure_lock(id)?;
        if let Err(err) = lock.lock() {
            self.release(id, &lock);
            return Err(err);
        }
        Ok(GameGuard {
            locks: self,
            id: id.clone(),
            lock,
        })
    }

    pub fn is_locked(&self, id: &GameId) -> Result<bool, RepositoryError> {
        let locks = self
            .locks
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("lock map"))?;
        Ok(locks.get(id).map(|lock| lock.is_locked()).unwrap_or(false))
    }

    fn ensure_lock(&self, id: &GameId) -> Result<Arc<Lock>, RepositoryError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("lock map"))?;
        Ok(locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Lock::new()))
            .clone())
    }

    // Clones are only handed out under the map lock, so a count of two
    // (map + caller) means nobody else holds or waits on this id.
    fn release(&self, id: &GameId, lock: &Arc<Lock>) {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let idle = locks
            .get(id)
            .is_some_and(|held| Arc::ptr_eq(held, lock) && Arc::strong_count(lock) == 2);
        if idle {
            locks.remove(id);
        }
    }
}
