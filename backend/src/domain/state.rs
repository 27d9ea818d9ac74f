//! Application state persisted by the service.
//!
//! Only the envelope of the state is typed. Properties and master-list
//! entries are opaque JSON values passed through untouched, and users keep
//! any fields beyond the declared ones in [`User::extra`].
//!
//! ## Normalisation
//! Deserialisation applies the documented defaults so two states that mean
//! the same thing compare equal:
//! - missing or `null` lists read as empty;
//! - empty `viewStart`, `viewEnd` and `lastSync` read as `None`;
//! - `zoom` that is missing, non-numeric, zero, negative or non-finite reads as `1.0`;
//! - empty `masterTab` reads as `"users"`; `null` `cloudUrl` reads as `""`.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Zoom applied when none is stored or the stored one is unusable.
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Tab shown when none is stored.
pub const DEFAULT_MASTER_TAB: &str = "users";
/// Role assigned to users that do not carry one.
pub const DEFAULT_ROLE: &str = "user";

/// Whole-state snapshot exchanged with the client.
///
/// # Examples
/// ```
/// use state_backend::domain::ApplicationState;
///
/// let state: ApplicationState = serde_json::from_str(r#"{"zoom": 0}"#).expect("valid state");
/// assert_eq!(state.zoom, 1.0);
/// assert_eq!(state.master_tab, "users");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub master_users: Vec<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub master_l1: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub master_l2: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub master_l3: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub master_properties: Vec<Value>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub view_start: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub view_end: Option<String>,
    #[serde(default = "default_zoom", deserialize_with = "lenient_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub collapsed_ids: CollapsedIds,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cloud_url: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub last_sync: Option<String>,
    #[serde(default = "default_master_tab", deserialize_with = "master_tab_or_default")]
    pub master_tab: String,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            master_users: Vec::new(),
            properties: Vec::new(),
            master_l1: Vec::new(),
            master_l2: Vec::new(),
            master_l3: Vec::new(),
            master_properties: Vec::new(),
            view_start: None,
            view_end: None,
            zoom: DEFAULT_ZOOM,
            collapsed_ids: CollapsedIds::default(),
            cloud_url: String::new(),
            last_sync: None,
            master_tab: default_master_tab(),
        }
    }
}

impl ApplicationState {
    /// Whether there is nothing worth persisting: no users and no properties.
    pub fn has_no_records(&self) -> bool {
        self.master_users.is_empty() && self.properties.is_empty()
    }
}

/// A user record.
///
/// `id` is kept as an opaque JSON scalar because clients use both numeric and
/// string identifiers. `name`, `pass` and `role` are usually strings but are
/// kept exactly as sent, so a numeric PIN or name survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Value,
    #[serde(default = "empty_text", deserialize_with = "value_or_empty_text")]
    pub name: Value,
    #[serde(default = "empty_text", deserialize_with = "value_or_empty_text")]
    pub pass: Value,
    #[serde(default = "default_role", deserialize_with = "value_or_default_role")]
    pub role: Value,
    /// Fields the service does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Build a user with only the declared fields set.
    pub fn new(id: impl Into<Value>, name: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pass: empty_text(),
            role: default_role(),
            extra: Map::new(),
        }
    }

    /// Replace the password.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Into<Value>) -> Self {
        self.pass = pass.into();
        self
    }

    /// Replace the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<Value>) -> Self {
        self.role = role.into();
        self
    }

    /// Attach an uninterpreted field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// An opaque property record. Only its `id` is ever looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Property(Map<String, Value>);

impl Property {
    /// Wrap a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's `id`, when present.
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// All fields of the record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for Property {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Set of collapsed tree-node identifiers.
///
/// Stored as a JSON array. Insertion order is kept for stable output but is
/// ignored by equality, and duplicates collapse on insert.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CollapsedIds(Vec<Value>);

impl CollapsedIds {
    /// Add an identifier. Returns `false` when it was already present.
    pub fn insert(&mut self, id: Value) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Whether `id` is in the set.
    pub fn contains(&self, id: &Value) -> bool {
        self.0.contains(id)
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl PartialEq for CollapsedIds {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl FromIterator<Value> for CollapsedIds {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut ids = Self::default();
        for id in iter {
            ids.insert(id);
        }
        ids
    }
}

impl<'de> Deserialize<'de> for CollapsedIds {
    /// Reads an array of ids. A browser `Set` serialises as `{}`, so any
    /// other shape reads as an empty set instead of failing the request.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(ids) => Ok(ids.into_iter().collect()),
            Value::Null => Ok(Self::default()),
            other => {
                warn!(found = %other, "collapsedIds is not an array; reading it as empty");
                Ok(Self::default())
            }
        }
    }
}

/// Clamp a zoom factor to something displayable.
pub fn normalize_zoom(zoom: f64) -> Option<f64> {
    (zoom.is_finite() && zoom > 0.0).then_some(zoom)
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_master_tab() -> String {
    DEFAULT_MASTER_TAB.to_owned()
}

fn default_role() -> Value {
    Value::String(DEFAULT_ROLE.to_owned())
}

fn empty_text() -> Value {
    Value::String(String::new())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

fn master_tab_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.unwrap_or_else(default_master_tab))
}

fn value_or_empty_text<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_text))
}

fn value_or_default_role<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(default_role))
}

fn lenient_zoom<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.and_then(normalize_zoom).unwrap_or(DEFAULT_ZOOM))
}
