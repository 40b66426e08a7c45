//! Convenience layer over a SQLite database file.
//!
//! # Intention
//!
//! - Create and drop tables from a list of named, typed columns.
//! - Insert rows from a list of named values, always bound as parameters.
//! - Run ad-hoc SQL and get every row back in a [`Records`] container.
//!
//! # Architectural Boundaries
//!
//! - One connection per statement; no pooling, caching, or transactions
//!   beyond SQLite's own autocommit.
//! - No schema migration or validation beyond mapping field types to
//!   SQLite column types.
//!
//! ```no_run
//! use easylite::{ColumnSpec, EasyLite, FieldType, Value};
//!
//! # fn main() -> easylite::Result<()> {
//! let db = EasyLite::open("people.db");
//! db.create_table("people", true, &[ColumnSpec::new("name", FieldType::Text)])?;
//! db.insert("people", [("name", Value::from("Alice"))])?;
//! let records = db.query("SELECT id, name FROM people")?;
//! assert_eq!(records.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod records;
pub mod schema;
pub mod sqlite;
pub mod statement;
pub mod value;

pub use error::{Error, Result};
pub use records::{Record, Records};
pub use schema::{map_field_type, ColumnSpec, DataType, FieldType, UnmappedTypePolicy};
pub use sqlite::{EasyLite, EasyLiteConfig};
pub use statement::Statement;
pub use value::Value;
