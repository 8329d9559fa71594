//! Core game engine: entities, hand evaluation, the generic wagering
//! engine, and the Hold'em module behind the platform's game contract.

pub mod betting;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod holdem;
pub mod module;
pub mod rng;

pub use entities::{
    ActionOptions, Card, Chips, GameAction, HandCategory, HandScore, Phase, PlayerId, PlayerView,
    Pot, PublicView, Seat, ShowdownResult, Suit,
};
pub use errors::GameError;
pub use holdem::{HoldemGame, HoldemOptions, HoldemState};
pub use module::{GameModule, Snapshot};
