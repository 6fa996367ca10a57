mod aggregate;
mod entity;
mod event;
mod ids;
mod turn;
mod violation;

pub use aggregate::{
    best_players, Command, Finished, Game, ReplayError, Running, Uninitialized, DICE_MAX,
    DICE_MIN,
};
pub use entity::Entity;
pub use event::GameEvent;
pub use ids::{GameId, PlayerId};
pub use turn::Turn;
pub use violation::Violation;
