use std::collections::BTreeSet;

use super::{EventRecord, PayloadError};
use crate::game::{GameEvent, PlayerId, Turn, DICE_MAX, DICE_MIN};

impl GameEvent {
    /// Encode into a storage record at position `sequence` of its stream.
    pub fn to_record(&self, sequence: u64) -> Result<EventRecord, PayloadError> {
        let name = self.event_name();
        match self {
            GameEvent::GameStarted {
                players,
                initial_turn,
            } => EventRecord::encode(name, &(players, initial_turn), sequence),
            GameEvent::DiceRolled { value } => EventRecord::encode(name, value, sequence),
            GameEvent::TurnChanged { new_turn } => EventRecord::encode(name, new_turn, sequence),
            GameEvent::TurnCountdownUpdated { seconds_left } => {
                EventRecord::encode(name, seconds_left, sequence)
            }
            GameEvent::TurnTimedOut => Ok(EventRecord::new(name, Vec::new(), sequence)),
            GameEvent::GameFinished { winners } => EventRecord::encode(name, winners, sequence),
        }
    }
}

impl TryFrom<&EventRecord> for GameEvent {
    type Error = PayloadError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        match record.event_name.as_str() {
            GameEvent::GAME_STARTED => {
                let (players, initial_turn): (Vec<PlayerId>, Turn) = record.decode()?;
                Ok(GameEvent::GameStarted {
                    players,
                    initial_turn,
                })
            }
            GameEvent::DICE_ROLLED => {
                let value: u8 = record.decode()?;
                if !(DICE_MIN..=DICE_MAX).contains(&value) {
                    return Err(PayloadError::new(format!(
                        "dice value {value} outside {DICE_MIN}..={DICE_MAX}"
                    )));
                }
                Ok(GameEvent::DiceRolled { value })
            }
            GameEvent::TURN_CHANGED => Ok(GameEvent::TurnChanged {
                new_turn: record.decode()?,
            }),
            GameEvent::TURN_COUNTDOWN_UPDATED => Ok(GameEvent::TurnCountdownUpdated {
                seconds_left: record.decode()?,
            }),
            GameEvent::TURN_TIMED_OUT => Ok(GameEvent::TurnTimedOut),
            GameEvent::GAME_FINISHED => {
                let winners: BTreeSet<PlayerId> = record.decode()?;
                Ok(GameEvent::GameFinished { winners })
            }
            other => Err(PayloadError::new(format!("unknown event: {other}"))),
        }
    }
}

impl TryFrom<EventRecord> for GameEvent {
    type Error = PayloadError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        GameEvent::try_from(&record)
    }
}
