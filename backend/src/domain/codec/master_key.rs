//! The fixed keys of the `masters` table.

use std::fmt;

/// How a master value is encoded in its `value` and `data` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterValueType {
    /// JSON text of an array.
    Array,
    /// Raw text.
    String,
    /// Numeric cell.
    Number,
}

impl MasterValueType {
    /// Label written to the `type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

/// One of the eleven settings stored in `masters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterKey {
    MasterL1,
    MasterL2,
    MasterL3,
    MasterProperties,
    ViewStart,
    ViewEnd,
    Zoom,
    CollapsedIds,
    CloudUrl,
    LastSync,
    MasterTab,
}

impl MasterKey {
    /// Every key, in the order rows are written.
    pub const ALL: [Self; 11] = [
        Self::MasterL1,
        Self::MasterL2,
        Self::MasterL3,
        Self::MasterProperties,
        Self::ViewStart,
        Self::ViewEnd,
        Self::Zoom,
        Self::CollapsedIds,
        Self::CloudUrl,
        Self::LastSync,
        Self::MasterTab,
    ];

    /// Text stored in the `key` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MasterL1 => "masterL1",
            Self::MasterL2 => "masterL2",
            Self::MasterL3 => "masterL3",
            Self::MasterProperties => "masterProperties",
            Self::ViewStart => "viewStart",
            Self::ViewEnd => "viewEnd",
            Self::Zoom => "zoom",
            Self::CollapsedIds => "collapsedIds",
            Self::CloudUrl => "cloudUrl",
            Self::LastSync => "lastSync",
            Self::MasterTab => "masterTab",
        }
    }

    /// Declared encoding of the key's value.
    pub const fn value_type(self) -> MasterValueType {
        match self {
            Self::MasterL1
            | Self::MasterL2
            | Self::MasterL3
            | Self::MasterProperties
            | Self::CollapsedIds => MasterValueType::Array,
            Self::Zoom => MasterValueType::Number,
            Self::ViewStart | Self::ViewEnd | Self::CloudUrl | Self::LastSync | Self::MasterTab => {
                MasterValueType::String
            }
        }
    }

    /// Look up a key by its stored name. Unknown names yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == key)
    }
}

impl fmt::Display for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
