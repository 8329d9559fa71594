//! # cardroom
//!
//! Authoritative core for an online multiplayer card platform. The first
//! game is No-Limit Texas Hold'em for 2 to 6 seats; the table layer is
//! game-agnostic behind the [`GameModule`] contract.
//!
//! ## Architecture
//!
//! - [`game`]: pure rules — entities, hand evaluation, the cardless
//!   wagering engine, and the Hold'em phase machine. Every transition is a
//!   function from state to state; deals are reproducible from
//!   (seed, hand number).
//! - [`table`]: one actor per table owns the state, applies actions in
//!   arrival order, and publishes a public view plus one private view per
//!   seat after every mutation.
//!
//! Hidden information never leaves the core: public views carry no hole
//! cards and no deck order, and a seat's private view carries only its own
//! cards.
//!
//! ## Example
//!
//! ```
//! use cardroom::game::{GameAction, GameModule, HoldemGame, HoldemOptions, PlayerId};
//!
//! let module = HoldemGame;
//! let players = [PlayerId::new("alice"), PlayerId::new("bob")];
//! let state = module
//!     .create_initial_state(&players, HoldemOptions::default())
//!     .unwrap();
//! let state = module
//!     .apply_action(&state, &players[0], &GameAction::StartHand)
//!     .unwrap();
//! assert_eq!(module.public_view(&state).hand_number, 1);
//! ```

/// Core game rules and the game-module contract.
pub mod game;

/// Table mediation: actors, configuration, and view fan-out.
pub mod table;

pub use game::{
    GameAction, GameError, GameModule, HoldemGame, HoldemOptions, HoldemState, PlayerId,
    PlayerView, PublicView, Snapshot,
};
pub use table::{TableActor, TableConfig, TableError, TableHandle, TableManager};
