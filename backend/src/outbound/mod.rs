//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local table store, the default when no database is
//!   configured.
//! - **persistence**: PostgreSQL-backed table store using Diesel ORM.
//!
//! Adapters translate between domain tables and storage representations.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
