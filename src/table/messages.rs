//! Table actor message types.

use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::game::module::Snapshot;
use crate::game::{GameAction, GameError, PlayerId, PlayerView, PublicView};

/// Messages that can be sent to a table actor
#[derive(Debug)]
pub enum TableMessage<S> {
    /// A player action to validate and apply
    Act {
        player_id: PlayerId,
        action: GameAction,
        respond: oneshot::Sender<Result<(), TableError>>,
    },

    /// Read the last-published views; never mutates
    GetViews {
        respond: oneshot::Sender<TableViews>,
    },

    /// Read one seat's last-published view; never mutates
    GetPlayerView {
        player_id: PlayerId,
        respond: oneshot::Sender<Result<PlayerView, TableError>>,
    },

    /// Attach a subscriber: it receives the current views immediately,
    /// then everything else through the table's publisher
    Subscribe {
        respond: oneshot::Sender<TableViews>,
    },

    /// Persistence envelope of the current state
    GetSnapshot {
        respond: oneshot::Sender<Snapshot<S>>,
    },

    /// Shut the table down
    Close { respond: oneshot::Sender<()> },
}

/// The projections computed after the most recent mutation: the shared
/// public view plus one private view per seated player.
#[derive(Clone, Debug)]
pub struct TableViews {
    pub public: PublicView,
    pub players: HashMap<PlayerId, PlayerView>,
}

/// Failures surfaced by the table layer.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error("table is closed")]
    Closed,
    #[error("table is busy, retry")]
    Busy,
    #[error(transparent)]
    Game(#[from] GameError),
}
