use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{Phase, PlayerId};

/// Errors that can occur while driving a game. Every failure is returned as
/// a value and leaves the state it was applied to untouched.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("{0} is not seated at this table")]
    NotSeated(PlayerId),
    #[error("not your turn")]
    NotYourTurn,
    #[error("bet and raise amounts must be positive whole chips")]
    InvalidAmount,
    #[error("{0}")]
    IllegalAction(String),
    #[error("need at least {0} players with chips")]
    InsufficientPlayers(usize),
    #[error("not allowed during the {0} phase")]
    WrongPhase(Phase),
    #[error("the betting round is closed")]
    RoundClosed,
    #[error("unknown action type: {0:?}")]
    UnknownAction(String),
    // Indicates a caller bug rather than a player mistake.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
