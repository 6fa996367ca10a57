use serde::{Deserialize, Serialize};

use super::PlayerId;

/// The window in which one player may roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub current_player: PlayerId,
    pub seconds_left: u32,
}

impl Turn {
    pub fn new(current_player: PlayerId, seconds_left: u32) -> Self {
        Turn {
            current_player,
            seconds_left,
        }
    }

    /// True once a tick would leave no time on the clock.
    pub fn expires_on_tick(&self) -> bool {
        self.seconds_left <= 1
    }
}
