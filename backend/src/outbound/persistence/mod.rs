//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! - `DieselTableStore` implements the `TableStore` port over one generic
//!   `sheet_rows` table.
//! - `DbPool` wraps `diesel-async` and `bb8`.
//! - `run_migrations` applies the embedded schema at startup.
//!
//! Diesel row structs and schema definitions stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use state_backend::outbound::persistence::{DbPool, DieselTableStore, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/state")).await?;
//! let store = DieselTableStore::new(pool);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_table_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_table_store::DieselTableStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
