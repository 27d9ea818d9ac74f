//! In-process table store.
//!
//! Used when no database URL is configured and by the integration tests.
//! Contents are lost when the process exits.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{TableStore, TableStoreError};
use crate::domain::tables::{Table, TableName};

/// Table store keeping every table in memory.
///
/// Clones share the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryTableStore {
    tables: Arc<RwLock<HashMap<TableName, Table>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTableStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the store reachable or not. An unreachable store fails every call
    /// with [`TableStoreError::Connection`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), TableStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TableStoreError::connection("in-memory store marked unavailable"))
        }
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn ensure_available(&self) -> Result<(), TableStoreError> {
        self.check_available()
    }

    async fn read_table(&self, name: TableName) -> Result<Option<Table>, TableStoreError> {
        self.check_available()?;
        Ok(self.tables.read().await.get(&name).cloned())
    }

    async fn replace_table(&self, name: TableName, table: &Table) -> Result<(), TableStoreError> {
        self.check_available()?;
        self.tables.write().await.insert(name, table.clone());
        Ok(())
    }
}
