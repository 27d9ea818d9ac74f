//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly.

diesel::table! {
    /// Every stored table, one database row per sheet row.
    ///
    /// Row 0 of each `table_name` holds the header; data rows start at 1.
    sheet_rows (table_name, row_index) {
        /// Name of the logical table (`users`, `properties`, `masters`).
        table_name -> Text,
        /// Zero-based position within the logical table.
        row_index -> Int4,
        /// Cells as a JSON array of strings, numbers and nulls.
        cells -> Jsonb,
    }
}
