use crate::error::Result;
use crate::records::Records;
use crate::schema::{ColumnSpec, UnmappedTypePolicy};
use crate::statement::{self, Statement};
use crate::value::Value;
use rusqlite::{params_from_iter, Batch, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Default time a connection waits on a locked database file.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for an [`EasyLite`] handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasyLiteConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// What `create_table` does with columns whose type has no mapping
    #[serde(default)]
    pub unmapped_types: UnmappedTypePolicy,
    /// How long each connection waits for a file lock before failing
    #[serde(default = "default_busy_timeout", with = "duration_ms")]
    pub busy_timeout: Duration,
}

fn default_busy_timeout() -> Duration {
    DEFAULT_BUSY_TIMEOUT
}

impl EasyLiteConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            unmapped_types: UnmappedTypePolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_unmapped_types(mut self, policy: UnmappedTypePolicy) -> Self {
        self.unmapped_types = policy;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Handle to a SQLite database file.
///
/// Holds configuration only. Every operation opens its own connection,
/// runs one statement, fetches all rows, and closes the connection again
/// whether or not the statement succeeded.
#[derive(Debug, Clone)]
pub struct EasyLite {
    config: EasyLiteConfig,
}

impl EasyLite {
    /// Handle for the database file at `db_path` with default settings.
    pub fn open(db_path: impl Into<PathBuf>) -> Self {
        Self::with_config(EasyLiteConfig::new(db_path))
    }

    pub fn with_config(config: EasyLiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EasyLiteConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    /// Open a new connection configured like the ones used internally.
    pub fn connect(&self) -> Result<Connection> {
        trace!(path = %self.config.db_path.display(), "opening connection");
        let conn = Connection::open(&self.config.db_path)?;
        conn.busy_timeout(self.config.busy_timeout)?;
        Ok(conn)
    }

    /// Run one raw SQL statement and return every row it produced.
    pub fn query(&self, sql: &str) -> Result<Records> {
        self.execute(&Statement::new(sql))
    }

    /// Run one statement with its bound parameters and return every row it produced.
    pub fn execute(&self, statement: &Statement) -> Result<Records> {
        debug!(sql = %statement.to_literal_sql(), "executing statement");
        let conn = self.connect()?;
        let records = fetch_all(&conn, statement)?;
        conn.close().map_err(|(_, err)| err)?;
        trace!(rows = records.len(), "connection closed");
        Ok(records)
    }

    /// Create `table` unless it already exists.
    ///
    /// An existing table is left as it is even if its columns differ.
    pub fn create_table(
        &self,
        table: &str,
        auto_increment: bool,
        columns: &[ColumnSpec],
    ) -> Result<()> {
        let stmt = statement::create_table_statement(
            table,
            auto_increment,
            columns,
            self.config.unmapped_types,
        )?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// Drop `table` if it exists.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        self.execute(&statement::drop_table_statement(table))?;
        Ok(())
    }

    /// Insert one row from `(column, value)` pairs.
    pub fn insert<I, S, V>(&self, table: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        self.execute(&statement::insert_statement(table, values))?;
        Ok(())
    }
}

/// Run exactly one statement from `statement.sql`.
///
/// SQL that holds no statement (empty, whitespace, or comments) yields no
/// rows. SQL that holds more than one fails before anything is run.
fn fetch_all(conn: &Connection, statement: &Statement) -> rusqlite::Result<Records> {
    let mut batch = Batch::new(conn, &statement.sql);
    let Some(mut stmt) = batch.next()? else {
        debug!("no statement to run");
        return Ok(Records::default());
    };
    if batch.next()?.is_some() {
        return Err(rusqlite::Error::MultipleStatement);
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;
    let mut fetched = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(Value::from(row.get_ref(index)?));
        }
        fetched.push(values);
    }
    debug!(rows = fetched.len(), "statement finished");
    Ok(Records::new(columns, fetched))
}
