//! Error types for easylite.

use crate::schema::FieldType;

/// Result type alias for easylite operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by easylite operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SQLite engine rejected the statement or the connection.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A column was declared with a field type that has no storage type.
    #[error("column `{column}` has field type `{field_type}` with no SQLite column type")]
    UnmappedType {
        column: String,
        field_type: FieldType,
    },
}
