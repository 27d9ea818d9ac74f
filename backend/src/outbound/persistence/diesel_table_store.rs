//! PostgreSQL-backed `TableStore` implementation using Diesel ORM.
//!
//! Every logical table lives in `sheet_rows`, keyed by table name and row
//! position. Row 0 is the header. Cells are stored as a JSON array so a row
//! keeps its mixed text and numeric cells exactly as written.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{TableStore, TableStoreError};
use crate::domain::tables::{Row, Table, TableName};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSheetRow, SheetRowRecord};
use super::pool::DbPool;
use super::schema::sheet_rows;

/// PostgreSQL caps bind parameters per statement; three per row keeps
/// batches well under it.
const INSERT_BATCH_ROWS: usize = 1_000;

/// Diesel-backed implementation of the `TableStore` port.
#[derive(Clone)]
pub struct DieselTableStore {
    pool: DbPool,
}

impl DieselTableStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn header_cells(table: &Table) -> Value {
    Value::Array(
        table
            .header()
            .iter()
            .map(|column| Value::String(column.clone()))
            .collect(),
    )
}

fn to_records<'a>(name: &'a str, table: &Table) -> Result<Vec<NewSheetRow<'a>>, TableStoreError> {
    let mut records = Vec::with_capacity(table.rows().len() + 1);
    records.push(NewSheetRow {
        table_name: name,
        row_index: 0,
        cells: header_cells(table),
    });
    for (position, row) in table.rows().iter().enumerate() {
        let row_index = i32::try_from(position + 1)
            .map_err(|_| TableStoreError::query(format!("table {name} has too many rows")))?;
        let cells = serde_json::to_value(row)
            .map_err(|err| TableStoreError::query(format!("row {row_index} not storable: {err}")))?;
        records.push(NewSheetRow {
            table_name: name,
            row_index,
            cells,
        });
    }
    Ok(records)
}

fn parse_header(cells: Value) -> Vec<String> {
    match cells {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn from_records(
    name: TableName,
    records: Vec<SheetRowRecord>,
) -> Result<Option<Table>, TableStoreError> {
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Ok(None);
    }
    let header = match records.next_if(|record| record.row_index == 0) {
        Some(record) => parse_header(record.cells),
        None => name.columns().iter().map(|&column| column.to_owned()).collect(),
    };
    let rows = records
        .map(|record| {
            serde_json::from_value::<Row>(record.cells).map_err(|err| {
                TableStoreError::query(format!(
                    "row {} of {name} is not a cell array: {err}",
                    record.row_index
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Table::from_parts(header, rows)))
}

#[async_trait]
impl TableStore for DieselTableStore {
    async fn ensure_available(&self) -> Result<(), TableStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn read_table(&self, name: TableName) -> Result<Option<Table>, TableStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let records: Vec<SheetRowRecord> = sheet_rows::table
            .filter(sheet_rows::table_name.eq(name.as_str()))
            .order_by(sheet_rows::row_index)
            .select(SheetRowRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(table = %name, rows = records.len(), "table read");
        from_records(name, records)
    }

    async fn replace_table(&self, name: TableName, table: &Table) -> Result<(), TableStoreError> {
        let records = to_records(name.as_str(), table)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Delete and insert in one transaction.
        conn.transaction(|conn| {
            async move {
                diesel::delete(sheet_rows::table.filter(sheet_rows::table_name.eq(name.as_str())))
                    .execute(conn)
                    .await?;
                for batch in records.chunks(INSERT_BATCH_ROWS) {
                    diesel::insert_into(sheet_rows::table)
                        .values(batch)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;
        debug!(table = %name, rows = table.rows().len(), "table replaced");
        Ok(())
    }
}
