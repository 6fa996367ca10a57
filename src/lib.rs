//! Event-sourced aggregate for a turn-based multiplayer dice game.
//!
//! A [`Game`] is a pure value: commands and countdown ticks turn one state
//! into the next and buffer the events that caused it. Persistence, locking
//! and the clock live outside the aggregate, in [`GameRepository`],
//! [`GameService`] and [`CountdownWorker`].

mod config;
mod countdown;
mod dice;
mod game;
mod queued;
mod record;
mod repository;
mod service;
mod store;

pub use config::{ConfigError, GameConfig, TICK_INTERVAL_ENV, TURN_TIMEOUT_ENV};
pub use countdown::{CountdownStats, CountdownWorker};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use game::{
    best_players, Command, Entity, Finished, Game, GameEvent, GameId, PlayerId, ReplayError,
    Running, Turn, Uninitialized, Violation, DICE_MAX, DICE_MIN,
};
pub use queued::{GameGuard, KeyedLocks};
pub use record::{EventRecord, PayloadError};
pub use repository::GameRepository;
pub use service::{GameService, ServiceError};
pub use store::{EventStore, HashMapEventStore, RepositoryError};
