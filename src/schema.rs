//! Column declarations and the mapping from field types to SQLite column types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type a caller declares for a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Date,
    DateTime,
    Integer,
    Real,
    Blob,
    /// No storage mapping; booleans are not stored as INTEGER implicitly.
    Boolean,
    /// Any other named type. Never mapped.
    Other(String),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => f.write_str("text"),
            FieldType::Date => f.write_str("date"),
            FieldType::DateTime => f.write_str("date_time"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Real => f.write_str("real"),
            FieldType::Blob => f.write_str("blob"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Other(name) => f.write_str(name),
        }
    }
}

/// SQLite storage column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Blob,
}

impl DataType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
            DataType::Blob => "BLOB",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Map a field type to the SQLite column type it is stored as.
///
/// Dates and date-times are stored as TEXT. Returns `None` for types
/// with no storage mapping; what happens to such a column is decided by
/// [`UnmappedTypePolicy`].
pub fn map_field_type(field_type: &FieldType) -> Option<DataType> {
    match field_type {
        FieldType::Text | FieldType::Date | FieldType::DateTime => Some(DataType::Text),
        FieldType::Integer => Some(DataType::Integer),
        FieldType::Real => Some(DataType::Real),
        FieldType::Blob => Some(DataType::Blob),
        FieldType::Boolean | FieldType::Other(_) => None,
    }
}

/// What `create_table` does with a column whose type has no mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedTypePolicy {
    /// Fail with [`crate::Error::UnmappedType`] before anything is executed.
    #[default]
    Reject,
    /// Leave the column out of the table and log a warning.
    Skip,
}

/// A named, typed column of a table to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub field_type: FieldType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// The storage type of this column, if its field type has one.
    pub fn data_type(&self) -> Option<DataType> {
        map_field_type(&self.field_type)
    }
}

impl<S: Into<String>> From<(S, FieldType)> for ColumnSpec {
    fn from((name, field_type): (S, FieldType)) -> Self {
        Self::new(name, field_type)
    }
}
