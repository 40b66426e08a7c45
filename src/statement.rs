//! Statement construction for table creation, table drop, and row insertion.
//!
//! Builders only produce SQL text plus bound parameters; nothing here touches
//! a database. Identifiers are always double-quoted and values are always
//! bound, never interpolated.

use crate::error::{Error, Result};
use crate::schema::{ColumnSpec, UnmappedTypePolicy};
use crate::value::Value;
use tracing::warn;

/// SQL text with positional (`?1`, `?2`, ...) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Render the statement with every parameter inlined as an escaped literal.
    ///
    /// Only `?NNN` placeholders outside quoted strings and identifiers are
    /// replaced. A bare `?` takes the largest index seen so far plus one.
    /// Placeholders without a matching parameter are left as-is. Intended
    /// for logs and inspection; execution always binds.
    pub fn to_literal_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut chars = self.sql.chars().peekable();
        let mut quote: Option<char> = None;
        let mut max_index: usize = 0;

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                out.push(c);
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    let mut digits = String::new();
                    while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        digits.push(*d);
                        chars.next();
                    }
                    let index: usize = if digits.is_empty() {
                        max_index + 1
                    } else {
                        digits.parse().unwrap_or(0)
                    };
                    max_index = max_index.max(index);
                    match index.checked_sub(1).and_then(|i| self.params.get(i)) {
                        Some(value) => out.push_str(&value.to_sql_literal()),
                        None => {
                            out.push('?');
                            out.push_str(&digits);
                        }
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}

/// Quote an identifier so it can be used verbatim as a table or column name.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build `CREATE TABLE IF NOT EXISTS` for the given columns.
///
/// With `auto_increment` an `id INTEGER PRIMARY KEY AUTOINCREMENT` column is
/// placed first. Columns keep the order they are given in.
pub fn create_table_statement(
    table: &str,
    auto_increment: bool,
    columns: &[ColumnSpec],
    policy: UnmappedTypePolicy,
) -> Result<Statement> {
    let mut definitions = Vec::with_capacity(columns.len() + 1);
    if auto_increment {
        definitions.push(format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_identifier("id")
        ));
    }

    for column in columns {
        match column.data_type() {
            Some(data_type) => {
                definitions.push(format!("{} {}", quote_identifier(&column.name), data_type));
            }
            None => match policy {
                UnmappedTypePolicy::Reject => {
                    return Err(Error::UnmappedType {
                        column: column.name.clone(),
                        field_type: column.field_type.clone(),
                    });
                }
                UnmappedTypePolicy::Skip => {
                    warn!(
                        table,
                        column = %column.name,
                        field_type = %column.field_type,
                        "skipping column with no SQLite column type"
                    );
                }
            },
        }
    }

    Ok(Statement::new(format!(
        "CREATE TABLE IF NOT EXISTS {}({})",
        quote_identifier(table),
        definitions.join(", ")
    )))
}

/// Build `DROP TABLE IF EXISTS`.
pub fn drop_table_statement(table: &str) -> Statement {
    Statement::new(format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))
}

/// Build an `INSERT` binding each value to its column, in the given order.
///
/// Dates and date-times are converted to their stored text form first. An
/// empty value list inserts a row of column defaults.
pub fn insert_statement<I, S, V>(table: &str, values: I) -> Statement
where
    I: IntoIterator<Item = (S, V)>,
    S: AsRef<str>,
    V: Into<Value>,
{
    let mut columns = Vec::new();
    let mut params = Vec::new();
    for (name, value) in values {
        columns.push(quote_identifier(name.as_ref()));
        params.push(value.into().into_storage());
    }

    if columns.is_empty() {
        return Statement::new(format!(
            "INSERT INTO {} DEFAULT VALUES",
            quote_identifier(table)
        ));
    }

    let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{i}")).collect();
    Statement::new(format!(
        "INSERT INTO {}({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    ))
    .with_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use chrono::NaiveDate;

    #[test]
    fn test_create_table_with_auto_increment() {
        let columns = [ColumnSpec::new("name", FieldType::Text)];
        let stmt = create_table_statement("t", true, &columns, UnmappedTypePolicy::Reject).unwrap();
        assert_eq!(
            stmt.sql,
            r#"CREATE TABLE IF NOT EXISTS "t"("id" INTEGER PRIMARY KEY AUTOINCREMENT, "name" TEXT)"#
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_create_table_keeps_column_order() {
        let columns = [
            ColumnSpec::new("score", FieldType::Real),
            ColumnSpec::new("avatar", FieldType::Blob),
            ColumnSpec::new("age", FieldType::Integer),
        ];
        let stmt =
            create_table_statement("users", false, &columns, UnmappedTypePolicy::Reject).unwrap();
        assert_eq!(
            stmt.sql,
            r#"CREATE TABLE IF NOT EXISTS "users"("score" REAL, "avatar" BLOB, "age" INTEGER)"#
        );
    }

    #[test]
    fn test_unmapped_column_rejected() {
        let columns = [
            ColumnSpec::new("name", FieldType::Text),
            ColumnSpec::new("active", FieldType::Boolean),
        ];
        let err = create_table_statement("t", true, &columns, UnmappedTypePolicy::Reject)
            .unwrap_err();
        match err {
            Error::UnmappedType { column, field_type } => {
                assert_eq!(column, "active");
                assert_eq!(field_type, FieldType::Boolean);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmapped_column_skipped() {
        let columns = [
            ColumnSpec::new("name", FieldType::Text),
            ColumnSpec::new("tags", FieldType::Other("list".into())),
        ];
        let stmt = create_table_statement("t", false, &columns, UnmappedTypePolicy::Skip).unwrap();
        assert_eq!(stmt.sql, r#"CREATE TABLE IF NOT EXISTS "t"("name" TEXT)"#);
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(drop_table_statement("t").sql, r#"DROP TABLE IF EXISTS "t""#);
    }

    #[test]
    fn test_identifiers_are_quoted() {
        assert_eq!(quote_identifier("plain"), r#""plain""#);
        assert_eq!(
            quote_identifier(r#"x"); DROP TABLE t; --"#),
            r#""x""); DROP TABLE t; --""#
        );
    }

    #[test]
    fn test_insert_binds_values_in_order() {
        let joined = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let stmt = insert_statement(
            "t",
            [("name", Value::from("Alice")), ("joined", Value::from(joined))],
        );
        assert_eq!(stmt.sql, r#"INSERT INTO "t"("name", "joined") VALUES (?1, ?2)"#);
        assert_eq!(
            stmt.params,
            vec![
                Value::Text("Alice".to_string()),
                Value::Text("2024-01-02".to_string())
            ]
        );
        assert_eq!(
            stmt.to_literal_sql(),
            r#"INSERT INTO "t"("name", "joined") VALUES ('Alice', '2024-01-02')"#
        );
    }

    #[test]
    fn test_insert_without_values_uses_defaults() {
        let stmt = insert_statement("t", Vec::<(&str, Value)>::new());
        assert_eq!(stmt.sql, r#"INSERT INTO "t" DEFAULT VALUES"#);
    }

    #[test]
    fn test_literal_sql_skips_quoted_placeholders() {
        let stmt = Statement::new(r#"SELECT '?1', "?2", ?, ?3"#)
            .with_param("it's")
            .with_param(2)
            .with_param(Value::Null);
        assert_eq!(stmt.to_literal_sql(), r#"SELECT '?1', "?2", 'it''s', NULL"#);
    }

    #[test]
    fn test_literal_sql_numbers_bare_placeholder_after_largest_index() {
        let stmt = Statement::new("SELECT ?3, ?1, ?")
            .with_param("a")
            .with_param("b")
            .with_param("c")
            .with_param("d");
        assert_eq!(stmt.to_literal_sql(), "SELECT 'c', 'a', 'd'");
    }

    #[test]
    fn test_literal_sql_leaves_missing_params() {
        let stmt = Statement::new("SELECT ?1, ?2").with_param(1);
        assert_eq!(stmt.to_literal_sql(), "SELECT 1, ?2");
    }
}
