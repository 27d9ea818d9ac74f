//! Rebuild an [`ApplicationState`] from stored tables.
//!
//! Each table has its own recovery policy for rows it cannot read:
//!
//! | Table        | Unreadable `data`/`value`                    |
//! |--------------|----------------------------------------------|
//! | `users`      | rebuild the user from the `id`/`name`/`pass`/`role` columns |
//! | `properties` | drop the row                                 |
//! | `masters`    | keep the field's default                     |
//!
//! Recoveries never fail the load; they are reported in
//! [`DecodeReport::field_failures`] so the caller can log them.

use serde_json::Value;

use crate::domain::state::{
    ApplicationState, DEFAULT_MASTER_TAB, DEFAULT_ROLE, Property, User, normalize_zoom,
};
use crate::domain::tables::{Cell, Row, Table};

use super::master_key::{MasterKey, MasterValueType};

const USER_ID: usize = 0;
const USER_NAME: usize = 1;
const USER_PASS: usize = 2;
const USER_ROLE: usize = 3;
const USER_DATA: usize = 4;
const PROPERTY_DATA: usize = 1;
const MASTER_KEY: usize = 0;
const MASTER_VALUE: usize = 1;

/// Raw tables read from the store. `None` marks a table that does not exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    pub users: Option<Table>,
    pub properties: Option<Table>,
    pub masters: Option<Table>,
}

/// A stored field that could not be read and was recovered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldDecodeError {
    /// A `users` row had unreadable `data` and was rebuilt from its columns.
    #[error("users row {row}: data column unreadable, rebuilt from columns: {message}")]
    UserRebuilt { row: usize, message: String },
    /// A `properties` row had unreadable `data` and was dropped.
    #[error("properties row {row}: data column unreadable, row dropped: {message}")]
    PropertyDropped { row: usize, message: String },
    /// A `masters` value could not be parsed; the field keeps its default.
    #[error("masters key {key}: value unreadable, default kept: {message}")]
    MasterField { key: MasterKey, message: String },
}

/// Outcome of a decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    /// The reconstructed state, or `None` when nothing has been saved.
    pub state: Option<ApplicationState>,
    /// Recoveries applied along the way.
    pub field_failures: Vec<FieldDecodeError>,
}

/// Rebuild state from `snapshot`.
///
/// Returns `state: None` when neither users nor properties survive decoding,
/// which callers treat as "never saved".
///
/// # Examples
/// ```
/// use state_backend::domain::codec::{TableSnapshot, decode_state};
///
/// let report = decode_state(TableSnapshot::default());
/// assert!(report.state.is_none());
/// assert!(report.field_failures.is_empty());
/// ```
pub fn decode_state(snapshot: TableSnapshot) -> DecodeReport {
    let mut failures = Vec::new();
    let mut state = ApplicationState {
        master_users: decode_users(snapshot.users.as_ref(), &mut failures),
        properties: decode_properties(snapshot.properties.as_ref(), &mut failures),
        ..ApplicationState::default()
    };
    if let Some(masters) = snapshot.masters.as_ref() {
        for row in masters.rows() {
            if let Err(failure) = apply_master_row(&mut state, row) {
                failures.push(failure);
            }
        }
    }

    DecodeReport {
        state: (!state.has_no_records()).then_some(state),
        field_failures: failures,
    }
}

fn decode_users(table: Option<&Table>, failures: &mut Vec<FieldDecodeError>) -> Vec<User> {
    let Some(table) = table else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            decode_user(row).unwrap_or_else(|err| {
                failures.push(FieldDecodeError::UserRebuilt {
                    row: index,
                    message: err.to_string(),
                });
                user_from_columns(row)
            })
        })
        .collect()
}

fn decode_user(row: &Row) -> Result<User, serde_json::Error> {
    serde_json::from_str(&row.cell(USER_DATA).as_text())
}

fn value_or(cell: &Cell, default: &str) -> Value {
    if cell.is_blank() {
        Value::String(default.to_owned())
    } else {
        cell.to_value()
    }
}

/// Minimal user built from the individual columns. Always succeeds.
fn user_from_columns(row: &Row) -> User {
    User::new(row.cell(USER_ID).to_value(), row.cell(USER_NAME).to_value())
        .with_pass(value_or(row.cell(USER_PASS), ""))
        .with_role(value_or(row.cell(USER_ROLE), DEFAULT_ROLE))
}

fn decode_properties(
    table: Option<&Table>,
    failures: &mut Vec<FieldDecodeError>,
) -> Vec<Property> {
    let Some(table) = table else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match decode_property(row) {
            Ok(property) => Some(property),
            Err(message) => {
                failures.push(FieldDecodeError::PropertyDropped {
                    row: index,
                    message,
                });
                None
            }
        })
        .collect()
}

fn decode_property(row: &Row) -> Result<Property, String> {
    let value: Value = serde_json::from_str(&row.cell(PROPERTY_DATA).as_text())
        .map_err(|err| err.to_string())?;
    Property::try_from(value).map_err(|other| format!("expected a JSON object, found {other}"))
}

fn apply_master_row(state: &mut ApplicationState, row: &Row) -> Result<(), FieldDecodeError> {
    let Some(key) = MasterKey::from_key(&row.cell(MASTER_KEY).as_text()) else {
        return Ok(());
    };
    let value = row.cell(MASTER_VALUE);
    let failure = |message: String| FieldDecodeError::MasterField { key, message };

    match key.value_type() {
        MasterValueType::Array => {
            let items = parse_array(value).map_err(failure)?;
            match key {
                MasterKey::MasterL1 => state.master_l1 = items,
                MasterKey::MasterL2 => state.master_l2 = items,
                MasterKey::MasterL3 => state.master_l3 = items,
                MasterKey::MasterProperties => state.master_properties = items,
                MasterKey::CollapsedIds => state.collapsed_ids = items.into_iter().collect(),
                _ => {}
            }
        }
        MasterValueType::String => {
            let text = (!value.is_blank()).then(|| value.as_text().into_owned());
            match key {
                MasterKey::ViewStart => state.view_start = text,
                MasterKey::ViewEnd => state.view_end = text,
                MasterKey::LastSync => state.last_sync = text,
                MasterKey::CloudUrl => state.cloud_url = text.unwrap_or_default(),
                MasterKey::MasterTab => {
                    state.master_tab = text.unwrap_or_else(|| DEFAULT_MASTER_TAB.to_owned());
                }
                _ => {}
            }
        }
        MasterValueType::Number => {
            state.zoom = parse_zoom(value).map_err(failure)?;
        }
    }
    Ok(())
}

fn parse_array(cell: &Cell) -> Result<Vec<Value>, String> {
    serde_json::from_str::<Vec<Value>>(&cell.as_text()).map_err(|err| err.to_string())
}

fn parse_zoom(cell: &Cell) -> Result<f64, String> {
    let parsed = match cell {
        Cell::Number(number) => Some(*number),
        Cell::Text(text) => text.trim().parse::<f64>().ok(),
        Cell::Empty => None,
    };
    parsed
        .and_then(normalize_zoom)
        .ok_or_else(|| format!("expected a positive number, found {:?}", cell.as_text()))
}
