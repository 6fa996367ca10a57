//! Runs commands and countdown ticks against stored games, one mutation
//! in flight per game id.

use std::collections::BTreeSet;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::error::ServiceError;
use crate::config::GameConfig;
use crate::dice::Dice;
use crate::game::{Command, Game, GameId, PlayerId};
use crate::queued::KeyedLocks;
use crate::repository::GameRepository;
use crate::store::{EventStore, RepositoryError};

/// Load, decide, commit. Every mutation of a given game happens under that
/// game's lock, so two callers can never both build on the same snapshot.
pub struct GameService<S, D> {
    repo: GameRepository<S>,
    locks: KeyedLocks,
    config: GameConfig,
    dice: Mutex<D>,
    created: Mutex<BTreeSet<GameId>>,
    running: Mutex<BTreeSet<GameId>>,
}

impl<S: EventStore, D: Dice> GameService<S, D> {
    pub fn new(store: S, dice: D, config: GameConfig) -> Self {
        GameService {
            repo: GameRepository::new(store),
            locks: KeyedLocks::new(),
            config,
            dice: Mutex::new(dice),
            created: Mutex::new(BTreeSet::new()),
            running: Mutex::new(BTreeSet::new()),
        }
    }

    /// Scan the store once and pick up every stream that is still running,
    /// so a service opened over existing games keeps their clocks going.
    /// Returns how many running games were found.
    pub fn resume_running(&self) -> Result<usize, ServiceError> {
        let mut found = 0;
        for id in self.repo.ids()? {
            let game = self.load(&id)?;
            if game.is_running() {
                self.track(&game)?;
                found += 1;
            }
        }
        debug!(found, "running games resumed");
        Ok(found)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn repository(&self) -> &GameRepository<S> {
        &self.repo
    }

    /// Reserve a fresh id. Nothing is stored until the game starts.
    pub fn create_game(&self) -> Result<GameId, ServiceError> {
        let id = GameId::new();
        self.created
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("created games"))?
            .insert(id.clone());
        debug!(game_id = %id, "game created");
        Ok(id)
    }

    /// Current state, without taking the game's lock.
    pub fn game(&self, id: &GameId) -> Result<Game, ServiceError> {
        self.load(id)
    }

    pub fn start_game(&self, id: &GameId, players: Vec<PlayerId>) -> Result<Game, ServiceError> {
        self.execute(id, Command::StartGame { players })
    }

    pub fn roll_dice(&self, id: &GameId, player: PlayerId) -> Result<Game, ServiceError> {
        self.execute(id, Command::RollDice { player })
    }

    pub fn execute(&self, id: &GameId, command: Command) -> Result<Game, ServiceError> {
        let _guard = self.locks.acquire(id)?;
        let game = self.load(id)?;

        let next = {
            let mut dice = self.dice.lock().map_err(|_| ServiceError::DicePoisoned)?;
            game.handle_command(command, self.config.turn_timeout_secs, &mut *dice)
        };
        let next = match next {
            Ok(next) => next,
            Err(violation) => {
                debug!(game_id = %id, %violation, "command rejected");
                return Err(violation.into());
            }
        };

        let was_running = game.is_running();
        let committed = self.repo.commit(next)?;
        self.forget_created(id)?;
        self.track(&committed)?;
        self.log_transition(was_running, &committed);
        Ok(committed)
    }

    /// One countdown step for one game.
    pub fn tick(&self, id: &GameId) -> Result<Game, ServiceError> {
        let _guard = self.locks.acquire(id)?;
        let game = self.load(id)?;
        let ticked = game.tick_countdown(self.config.turn_timeout_secs);
        let committed = self.repo.commit(ticked)?;
        self.track(&committed)?;
        self.log_transition(game.is_running(), &committed);
        Ok(committed)
    }

    /// Tick every running game. Failures on individual games are logged
    /// and skipped; returns how many games were ticked.
    pub fn tick_running(&self) -> Result<usize, ServiceError> {
        let ids: Vec<GameId> = self
            .running
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("running games"))?
            .iter()
            .cloned()
            .collect();
        let mut ticked = 0;
        for id in ids {
            match self.tick_if_running(&id) {
                Ok(true) => ticked += 1,
                Ok(false) => {}
                Err(err) => warn!(game_id = %id, error = %err, "countdown tick failed"),
            }
        }
        Ok(ticked)
    }

    fn tick_if_running(&self, id: &GameId) -> Result<bool, ServiceError> {
        let _guard = self.locks.acquire(id)?;
        let game = self.load(id)?;
        if !game.is_running() {
            self.track(&game)?;
            return Ok(false);
        }
        let committed = self
            .repo
            .commit(game.tick_countdown(self.config.turn_timeout_secs))?;
        self.track(&committed)?;
        self.log_transition(true, &committed);
        Ok(true)
    }

    fn load(&self, id: &GameId) -> Result<Game, ServiceError> {
        if let Some(game) = self.repo.get(id)? {
            return Ok(game);
        }
        let created = self
            .created
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("created games"))?;
        if created.contains(id) {
            Ok(Game::create(id.clone()))
        } else {
            Err(ServiceError::GameNotFound(id.clone()))
        }
    }

    fn forget_created(&self, id: &GameId) -> Result<(), ServiceError> {
        self.created
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("created games"))?
            .remove(id);
        Ok(())
    }

    fn track(&self, game: &Game) -> Result<(), ServiceError> {
        let mut running = self
            .running
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("running games"))?;
        if game.is_running() {
            running.insert(game.id().clone());
        } else {
            running.remove(game.id());
        }
        Ok(())
    }

    fn log_transition(&self, was_running: bool, game: &Game) {
        match game {
            Game::Running(state) if !was_running => {
                info!(game_id = %game.id(), players = state.players().len(), "game started");
            }
            Game::Finished(state) if was_running => {
                let winners: Vec<&str> = state.winners().iter().map(|p| p.as_str()).collect();
                info!(game_id = %game.id(), ?winners, "game finished");
            }
            _ => {}
        }
    }
}
