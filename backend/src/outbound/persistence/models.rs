//! Internal Diesel row structs for database operations.
//!
//! These never leave the persistence layer.

use diesel::prelude::*;
use serde_json::Value;

use super::schema::sheet_rows;

/// Row struct for reading from `sheet_rows`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sheet_rows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SheetRowRecord {
    pub row_index: i32,
    pub cells: Value,
}

/// Insertable struct for writing `sheet_rows`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sheet_rows)]
pub(crate) struct NewSheetRow<'a> {
    pub table_name: &'a str,
    pub row_index: i32,
    pub cells: Value,
}
