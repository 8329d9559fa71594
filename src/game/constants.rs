//! Structural limits for tables and hands.

/// Fewest seats that can contest a hand.
pub const MIN_SEATS: usize = 2;

/// Most seats a table supports.
pub const MAX_SEATS: usize = 6;

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Private cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;

/// Community cards once the river is out.
pub const BOARD_SIZE: usize = 5;

/// Default shuffle seed when a table does not supply one.
pub const DEFAULT_SEED: u64 = 1;

/// Oldest action-log lines are dropped past this count.
pub const MAX_ACTION_LOG_ENTRIES: usize = 256;
