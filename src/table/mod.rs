//! Per-table mediation and view fan-out.
//!
//! One actor owns each table's state and is its only mutator. Requests are
//! serialized through the actor's inbox; after every successful mutation
//! the actor projects the public view plus one private view per seat and
//! hands them to the transport through [`ViewPublisher`].

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;
pub mod transport;

/// Identifier for one table across the platform.
pub type TableId = uuid::Uuid;

pub use actor::{TableActor, TableHandle};
pub use config::{ConfigError, TableConfig};
pub use manager::TableManager;
pub use messages::{TableError, TableMessage, TableViews};
pub use transport::{NullPublisher, ViewPublisher};
