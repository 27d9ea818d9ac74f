//! Port for the tabular backing store.
//!
//! The store holds named tables, each a fixed header row followed by data
//! rows. Adapters only move whole tables in and out; all interpretation of
//! cells happens in the codec.

use async_trait::async_trait;

use crate::domain::tables::{Table, TableName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by table store adapters.
    pub enum TableStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "table store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "table store query failed: {message}",
    }
}

/// Whole-table access to the backing store.
///
/// Callers serialise access through the store lock, so adapters need not
/// guard against interleaved saves and loads themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Check that the store can serve requests.
    async fn ensure_available(&self) -> Result<(), TableStoreError>;

    /// Read a table with its header.
    ///
    /// Returns `None` when the table has never been written.
    async fn read_table(&self, name: TableName) -> Result<Option<Table>, TableStoreError>;

    /// Replace the whole contents of a table, creating it when absent.
    async fn replace_table(&self, name: TableName, table: &Table) -> Result<(), TableStoreError>;
}
