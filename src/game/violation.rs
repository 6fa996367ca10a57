use thiserror::Error;

/// Why a command was turned down. The game is left exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("game has already been started")]
    GameAlreadyStarted,
    #[error("at least two players are required to start a game")]
    NotEnoughPlayers,
    #[error("game is not running")]
    GameNotRunning,
    #[error("it is not this player's turn")]
    NotCurrentPlayer,
}
