//! Outbound seam: where views go after every successful mutation.

use crate::game::{PlayerId, PlayerView, PublicView};

use super::TableId;

/// Receives the projections the mediator computes after each mutation. The
/// real-time transport implements this; delivery, rooms, and reconnection
/// are its problem, not the table's.
pub trait ViewPublisher: Send + Sync {
    /// The shared-display projection. Never contains hidden information.
    fn publish_public(&self, table_id: TableId, view: &PublicView);

    /// One seat's private projection; deliver to that seat only.
    fn publish_player(&self, table_id: TableId, player: &PlayerId, view: &PlayerView);
}

/// Publisher that drops everything. Useful for tables without an attached
/// transport and for tests that only inspect state.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPublisher;

impl ViewPublisher for NullPublisher {
    fn publish_public(&self, _table_id: TableId, _view: &PublicView) {}

    fn publish_player(&self, _table_id: TableId, _player: &PlayerId, _view: &PlayerView) {}
}
