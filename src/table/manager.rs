//! Spawns and tracks table actors.

use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::game::module::GameModule;
use crate::game::{GameError, PlayerId};

use super::actor::{TableActor, TableHandle};
use super::messages::TableError;
use super::transport::ViewPublisher;
use super::TableId;

/// In-memory registry of running tables. Each table runs in its own task,
/// so independent tables make progress in parallel while every single table
/// stays strictly serialized.
pub struct TableManager<M: GameModule> {
    module: M,
    publisher: Arc<dyn ViewPublisher>,
    tables: RwLock<HashMap<TableId, TableHandle<M>>>,
}

impl<M: GameModule + Clone> TableManager<M> {
    pub fn new(module: M, publisher: Arc<dyn ViewPublisher>) -> Self {
        Self {
            module,
            publisher,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Create a table, spawn its actor, and return its id.
    pub async fn create_table(
        &self,
        players: &[PlayerId],
        options: M::Options,
    ) -> Result<TableId, GameError> {
        let (actor, handle) = TableActor::new(
            self.module.clone(),
            players,
            options,
            self.publisher.clone(),
        )?;
        let table_id = handle.table_id();

        let mut tables = self.tables.write().await;
        tables.insert(table_id, handle);
        drop(tables);

        tokio::spawn(actor.run());
        info!("created and spawned table {table_id}");
        Ok(table_id)
    }

    pub async fn table(&self, table_id: TableId) -> Option<TableHandle<M>> {
        let tables = self.tables.read().await;
        tables.get(&table_id).cloned()
    }

    /// Close a table and forget its handle.
    pub async fn close_table(&self, table_id: TableId) -> Result<(), TableError> {
        let handle = {
            let mut tables = self.tables.write().await;
            tables.remove(&table_id)
        };
        let handle = handle.ok_or(TableError::Closed)?;
        handle.close().await;
        info!("closed table {table_id}");
        Ok(())
    }

    pub async fn active_table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }
}
