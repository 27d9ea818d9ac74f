//! Flatten an [`ApplicationState`] into the three persisted tables.

use serde::Serialize;

use crate::domain::state::{ApplicationState, DEFAULT_ROLE};
use crate::domain::tables::{Cell, Row, Table, TableName};

use super::master_key::MasterKey;

/// Fully rendered table contents for one save.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedState {
    pub users: Table,
    pub properties: Table,
    pub masters: Table,
}

impl EncodedState {
    /// Tables paired with their names, in write order.
    pub fn into_tables(self) -> [(TableName, Table); 3] {
        [
            (TableName::Users, self.users),
            (TableName::Properties, self.properties),
            (TableName::Masters, self.masters),
        ]
    }
}

/// Render `state` as table contents.
///
/// Each table is rebuilt from scratch: a save always replaces what was stored.
///
/// # Errors
/// Returns the serializer error if a record cannot be rendered as JSON.
///
/// # Examples
/// ```
/// use state_backend::domain::ApplicationState;
/// use state_backend::domain::codec::encode_state;
///
/// let encoded = encode_state(&ApplicationState::default()).expect("encodes");
/// assert!(encoded.users.is_empty());
/// assert_eq!(encoded.masters.rows().len(), 11);
/// ```
pub fn encode_state(state: &ApplicationState) -> Result<EncodedState, serde_json::Error> {
    Ok(EncodedState {
        users: encode_users(state)?,
        properties: encode_properties(state)?,
        masters: encode_masters(state)?,
    })
}

fn json_cell<T: Serialize + ?Sized>(value: &T) -> Result<Cell, serde_json::Error> {
    serde_json::to_string(value).map(Cell::Text)
}

fn encode_users(state: &ApplicationState) -> Result<Table, serde_json::Error> {
    let mut table = Table::with_header(TableName::Users);
    for user in &state.master_users {
        let role = Cell::from(&user.role);
        let role = if role.is_blank() {
            Cell::text(DEFAULT_ROLE)
        } else {
            role
        };
        table.push_row(vec![
            Cell::from(&user.id),
            Cell::from(&user.name),
            Cell::from(&user.pass),
            role,
            json_cell(user)?,
        ]);
    }
    Ok(table)
}

fn encode_properties(state: &ApplicationState) -> Result<Table, serde_json::Error> {
    let mut table = Table::with_header(TableName::Properties);
    for property in &state.properties {
        let id = property.id().map(Cell::from).unwrap_or_default();
        table.push_row(vec![id, json_cell(property)?]);
    }
    Ok(table)
}

fn encode_masters(state: &ApplicationState) -> Result<Table, serde_json::Error> {
    let mut table = Table::with_header(TableName::Masters);
    for key in MasterKey::ALL {
        let value = master_value(state, key)?;
        table.push_row(Row::new(vec![
            Cell::text(key.as_str()),
            value.clone(),
            Cell::text(key.value_type().as_str()),
            value,
        ]));
    }
    Ok(table)
}

fn optional_text(value: Option<&str>) -> Cell {
    Cell::text(value.unwrap_or_default())
}

fn master_value(state: &ApplicationState, key: MasterKey) -> Result<Cell, serde_json::Error> {
    let cell = match key {
        MasterKey::MasterL1 => json_cell(&state.master_l1)?,
        MasterKey::MasterL2 => json_cell(&state.master_l2)?,
        MasterKey::MasterL3 => json_cell(&state.master_l3)?,
        MasterKey::MasterProperties => json_cell(&state.master_properties)?,
        MasterKey::CollapsedIds => json_cell(&state.collapsed_ids)?,
        MasterKey::ViewStart => optional_text(state.view_start.as_deref()),
        MasterKey::ViewEnd => optional_text(state.view_end.as_deref()),
        MasterKey::LastSync => optional_text(state.last_sync.as_deref()),
        MasterKey::CloudUrl => Cell::text(state.cloud_url.as_str()),
        MasterKey::MasterTab => Cell::text(state.master_tab.as_str()),
        MasterKey::Zoom => Cell::Number(state.zoom),
    };
    Ok(cell)
}
