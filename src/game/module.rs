//! The contract between game implementations and the table layer.
//!
//! A game module is a bundle of pure functions over an opaque state value.
//! The table mediator owns the state, feeds actions through `apply_action`,
//! and projects views after every successful mutation. Keeping the seam here
//! lets the platform host games other than Hold'em without touching the
//! table layer.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::entities::{GameAction, PlayerId, PlayerView, PublicView, ShowdownResult};
use super::errors::GameError;

pub trait GameModule: Send + Sync + 'static {
    /// Complete game state: a serializable tree of plain values with
    /// structural equality, so snapshots round-trip and replays compare.
    type State: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Options: Default;

    fn game_id(&self) -> &'static str;
    fn game_version(&self) -> &'static str;

    fn create_initial_state(
        &self,
        players: &[PlayerId],
        options: Self::Options,
    ) -> Result<Self::State, GameError>;

    /// Validate and apply one action, returning the successor state. The
    /// input state is never modified; failures leave nothing to roll back.
    fn apply_action(
        &self,
        state: &Self::State,
        player: &PlayerId,
        action: &GameAction,
    ) -> Result<Self::State, GameError>;

    fn public_view(&self, state: &Self::State) -> PublicView;

    fn player_view(&self, state: &Self::State, player: &PlayerId) -> PlayerView;

    /// True once at most one seat still holds chips.
    fn is_game_over(&self, state: &Self::State) -> bool;

    fn result(&self, state: &Self::State) -> Option<ShowdownResult>;

    /// Wrap the state for the external store.
    fn snapshot(&self, state: &Self::State) -> Snapshot<Self::State> {
        Snapshot {
            game_id: self.game_id().to_string(),
            game_version: self.game_version().to_string(),
            state: state.clone(),
        }
    }
}

/// Persistence envelope. The store keeps it as JSON; restoring is just
/// handing the deserialized state back to the module's functions.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Snapshot<S> {
    pub game_id: String,
    pub game_version: String,
    pub state: S,
}
