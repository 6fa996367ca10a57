use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::warn;

use super::{Entity, GameEvent, GameId, PlayerId, Turn, Violation};
use crate::dice::Dice;

pub const DICE_MIN: u8 = 1;
pub const DICE_MAX: u8 = 6;

/// Input accepted by [`Game::handle_command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Seats players in the given order. Repeated ids keep their first
    /// seat only, so the roster in `GameStarted` may be shorter than
    /// `players`, and fewer than two distinct ids is `NotEnoughPlayers`.
    StartGame { players: Vec<PlayerId> },
    RollDice { player: PlayerId },
}

/// An event was fed to a state that can never receive it. This is misuse of
/// the fold, not a business rejection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("event {event} cannot be applied to a {state} game")]
    IllegalEvent {
        state: &'static str,
        event: &'static str,
    },
}

impl ReplayError {
    fn illegal(state: &'static str, event: &GameEvent) -> Self {
        ReplayError::IllegalEvent {
            state,
            event: event.event_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uninitialized {
    entity: Entity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Running {
    entity: Entity,
    players: Vec<PlayerId>,
    turn: Turn,
    rolled_numbers: BTreeMap<PlayerId, u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finished {
    entity: Entity,
    players: Vec<PlayerId>,
    winners: BTreeSet<PlayerId>,
}

/// One game instance, as a state machine folded from its events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Game {
    Uninitialized(Uninitialized),
    Running(Running),
    Finished(Finished),
}

impl Uninitialized {
    const NAME: &'static str = "Uninitialized";

    fn apply(self, event: &GameEvent) -> Result<Game, ReplayError> {
        match event {
            GameEvent::GameStarted {
                players,
                initial_turn,
            } => Ok(Game::Running(Running {
                entity: self.entity,
                players: players.clone(),
                turn: initial_turn.clone(),
                rolled_numbers: BTreeMap::new(),
            })),
            other => Err(ReplayError::illegal(Self::NAME, other)),
        }
    }
}

impl Running {
    const NAME: &'static str = "Running";

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn rolled_numbers(&self) -> &BTreeMap<PlayerId, u8> {
        &self.rolled_numbers
    }

    /// The player after the current one in seating order. `None` once the
    /// last seat has had its turn; there is no wraparound.
    fn next_player(&self) -> Option<&PlayerId> {
        let position = self
            .players
            .iter()
            .position(|player| *player == self.turn.current_player)?;
        self.players.get(position + 1)
    }

    fn apply(mut self, event: &GameEvent) -> Result<Game, ReplayError> {
        match event {
            GameEvent::TurnChanged { new_turn } => {
                self.turn = new_turn.clone();
            }
            GameEvent::DiceRolled { value } => {
                self.rolled_numbers
                    .insert(self.turn.current_player.clone(), *value);
            }
            GameEvent::TurnCountdownUpdated { seconds_left } => {
                self.turn.seconds_left = *seconds_left;
            }
            GameEvent::TurnTimedOut => {}
            GameEvent::GameFinished { winners } => {
                return Ok(Game::Finished(Finished {
                    entity: self.entity,
                    players: self.players,
                    winners: winners.clone(),
                }));
            }
            GameEvent::GameStarted { .. } => {
                return Err(ReplayError::illegal(Self::NAME, event));
            }
        }
        Ok(Game::Running(self))
    }
}

impl Finished {
    const NAME: &'static str = "Finished";

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn winners(&self) -> &BTreeSet<PlayerId> {
        &self.winners
    }

    fn apply(self, event: &GameEvent) -> Result<Game, ReplayError> {
        Err(ReplayError::illegal(Self::NAME, event))
    }
}

/// Everyone holding the highest roll. An empty roll map has a highest value
/// of 0, which nobody holds, so nobody wins.
pub fn best_players(rolled_numbers: &BTreeMap<PlayerId, u8>) -> BTreeSet<PlayerId> {
    let highest = rolled_numbers.values().copied().max().unwrap_or(0);
    rolled_numbers
        .iter()
        .filter(|(_, value)| **value == highest)
        .map(|(player, _)| player.clone())
        .collect()
}

impl Game {
    pub fn create(id: GameId) -> Self {
        Game::Uninitialized(Uninitialized {
            entity: Entity::with_id(id),
        })
    }

    /// Rebuild a game from its full history. The result has nothing left to
    /// commit.
    pub fn replay(
        id: GameId,
        events: impl IntoIterator<Item = GameEvent>,
    ) -> Result<Self, ReplayError> {
        Ok(Game::create(id).apply_events(events)?.mark_committed())
    }

    fn entity(&self) -> &Entity {
        match self {
            Game::Uninitialized(state) => &state.entity,
            Game::Running(state) => &state.entity,
            Game::Finished(state) => &state.entity,
        }
    }

    fn entity_mut(&mut self) -> &mut Entity {
        match self {
            Game::Uninitialized(state) => &mut state.entity,
            Game::Running(state) => &mut state.entity,
            Game::Finished(state) => &mut state.entity,
        }
    }

    pub fn id(&self) -> &GameId {
        self.entity().id()
    }

    pub fn version(&self) -> u64 {
        self.entity().version()
    }

    pub fn committed_version(&self) -> u64 {
        self.entity().committed_version()
    }

    /// Events applied since the last [`Game::mark_committed`].
    pub fn new_events(&self) -> &[GameEvent] {
        self.entity().new_events()
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            Game::Uninitialized(_) => Uninitialized::NAME,
            Game::Running(_) => Running::NAME,
            Game::Finished(_) => Finished::NAME,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Game::Running(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Game::Finished(_))
    }

    pub fn players(&self) -> &[PlayerId] {
        match self {
            Game::Uninitialized(_) => &[],
            Game::Running(state) => state.players(),
            Game::Finished(state) => state.players(),
        }
    }

    pub fn turn(&self) -> Option<&Turn> {
        match self {
            Game::Running(state) => Some(state.turn()),
            Game::Uninitialized(_) | Game::Finished(_) => None,
        }
    }

    pub fn winners(&self) -> Option<&BTreeSet<PlayerId>> {
        match self {
            Game::Finished(state) => Some(state.winners()),
            Game::Uninitialized(_) | Game::Running(_) => None,
        }
    }

    /// Validate a command and derive the next state. Never touches `self`;
    /// a rejection leaves the caller holding the unchanged game.
    pub fn handle_command<D: Dice + ?Sized>(
        &self,
        command: Command,
        turn_timeout: u32,
        dice: &mut D,
    ) -> Result<Game, Violation> {
        match command {
            Command::StartGame { players } => self.start(players, turn_timeout),
            Command::RollDice { player } => self.roll(&player, turn_timeout, dice),
        }
    }

    fn start(&self, players: Vec<PlayerId>, turn_timeout: u32) -> Result<Game, Violation> {
        match self {
            Game::Uninitialized(_) => {}
            Game::Running(_) | Game::Finished(_) => return Err(Violation::GameAlreadyStarted),
        }

        let mut seen = BTreeSet::new();
        let players: Vec<PlayerId> = players
            .into_iter()
            .filter(|player| seen.insert(player.clone()))
            .collect();
        if players.len() < 2 {
            return Err(Violation::NotEnoughPlayers);
        }

        let initial_turn = Turn::new(players[0].clone(), turn_timeout);
        Ok(self.clone().derive([GameEvent::GameStarted {
            players,
            initial_turn,
        }]))
    }

    fn roll<D: Dice + ?Sized>(
        &self,
        player: &PlayerId,
        turn_timeout: u32,
        dice: &mut D,
    ) -> Result<Game, Violation> {
        let running = match self {
            Game::Running(state) => state,
            Game::Uninitialized(_) | Game::Finished(_) => return Err(Violation::GameNotRunning),
        };
        if *player != running.turn.current_player {
            return Err(Violation::NotCurrentPlayer);
        }

        let rolled = GameEvent::DiceRolled {
            value: dice.roll(DICE_MIN, DICE_MAX),
        };

        match running.next_player() {
            Some(next) => {
                let changed = GameEvent::TurnChanged {
                    new_turn: Turn::new(next.clone(), turn_timeout),
                };
                Ok(self.clone().derive([rolled, changed]))
            }
            None => {
                let after_roll = self.clone().derive([rolled]);
                let winners = match &after_roll {
                    Game::Running(state) => best_players(&state.rolled_numbers),
                    Game::Uninitialized(_) | Game::Finished(_) => BTreeSet::new(),
                };
                Ok(after_roll.derive([GameEvent::GameFinished { winners }]))
            }
        }
    }

    /// Advance the turn clock by one second. Expiry passes the turn on, or
    /// finishes the game when the last seat times out. Only meaningful on a
    /// running game; any other state is returned untouched.
    pub fn tick_countdown(&self, turn_timeout: u32) -> Game {
        let running = match self {
            Game::Running(state) => state,
            Game::Uninitialized(_) | Game::Finished(_) => {
                warn!(
                    game_id = %self.id(),
                    state = self.state_name(),
                    "countdown tick on a game that is not running"
                );
                return self.clone();
            }
        };

        let mut events = vec![GameEvent::TurnCountdownUpdated {
            seconds_left: running.turn.seconds_left.saturating_sub(1),
        }];

        if running.turn.expires_on_tick() {
            events.push(GameEvent::TurnTimedOut);
            match running.next_player() {
                Some(next) => events.push(GameEvent::TurnChanged {
                    new_turn: Turn::new(next.clone(), turn_timeout),
                }),
                None => events.push(GameEvent::GameFinished {
                    winners: best_players(&running.rolled_numbers),
                }),
            }
        }

        self.clone().derive(events)
    }

    /// Fold one event into the state and buffer it as uncommitted.
    pub fn apply_event(self, event: GameEvent) -> Result<Game, ReplayError> {
        let mut game = match self {
            Game::Uninitialized(state) => state.apply(&event)?,
            Game::Running(state) => state.apply(&event)?,
            Game::Finished(state) => state.apply(&event)?,
        };
        game.entity_mut().digest(event);
        Ok(game)
    }

    pub fn apply_events(
        self,
        events: impl IntoIterator<Item = GameEvent>,
    ) -> Result<Game, ReplayError> {
        events
            .into_iter()
            .try_fold(self, |game, event| game.apply_event(event))
    }

    /// Clear the uncommitted buffer once the caller has persisted it.
    pub fn mark_committed(mut self) -> Game {
        self.entity_mut().mark_committed();
        self
    }

    // Events derived here were chosen for the current state, so rejection
    // means the state machine itself is broken.
    fn derive(self, events: impl IntoIterator<Item = GameEvent>) -> Game {
        match self.apply_events(events) {
            Ok(game) => game,
            Err(err) => panic!("derived event rejected by its own state: {err}"),
        }
    }
}
