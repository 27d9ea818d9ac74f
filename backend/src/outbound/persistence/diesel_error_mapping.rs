//! Diesel and pool error mapping for the table store.

use tracing::debug;

use crate::domain::ports::TableStoreError;

use super::pool::PoolError;

/// Map pool failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> TableStoreError {
    TableStoreError::connection(error.into_message())
}

/// Map Diesel failures to store errors.
///
/// Details are logged at debug level and kept out of the returned message.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> TableStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TableStoreError::connection("database connection error")
        }
        DieselError::BrokenTransactionManager => {
            TableStoreError::connection("database transaction state lost")
        }
        DieselError::QueryBuilderError(_) => TableStoreError::query("database query error"),
        DieselError::DeserializationError(_) => {
            TableStoreError::query("stored row could not be read")
        }
        _ => TableStoreError::query("database error"),
    }
}
