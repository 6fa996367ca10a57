use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{PlayerId, Turn};

/// Every state change a game can go through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        players: Vec<PlayerId>,
        initial_turn: Turn,
    },
    DiceRolled {
        value: u8,
    },
    TurnChanged {
        new_turn: Turn,
    },
    TurnCountdownUpdated {
        seconds_left: u32,
    },
    TurnTimedOut,
    GameFinished {
        winners: BTreeSet<PlayerId>,
    },
}

impl GameEvent {
    pub const GAME_STARTED: &'static str = "GameStarted";
    pub const DICE_ROLLED: &'static str = "DiceRolled";
    pub const TURN_CHANGED: &'static str = "TurnChanged";
    pub const TURN_COUNTDOWN_UPDATED: &'static str = "TurnCountdownUpdated";
    pub const TURN_TIMED_OUT: &'static str = "TurnTimedOut";
    pub const GAME_FINISHED: &'static str = "GameFinished";

    /// Stable name used when the event is stored.
    pub fn event_name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => Self::GAME_STARTED,
            GameEvent::DiceRolled { .. } => Self::DICE_ROLLED,
            GameEvent::TurnChanged { .. } => Self::TURN_CHANGED,
            GameEvent::TurnCountdownUpdated { .. } => Self::TURN_COUNTDOWN_UPDATED,
            GameEvent::TurnTimedOut => Self::TURN_TIMED_OUT,
            GameEvent::GameFinished { .. } => Self::GAME_FINISHED,
        }
    }
}
