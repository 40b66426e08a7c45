//! Scalar values passed to and returned from SQLite.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

/// Format used to store date-time values as TEXT.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format used to store date values as TEXT.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Convert to the representation that is actually stored.
    ///
    /// Dates and date-times become fixed-format text, everything else is
    /// returned unchanged. Values read back from SQLite are always in this
    /// form.
    pub fn into_storage(self) -> Value {
        match self {
            Value::Date(date) => Value::Text(date.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => Value::Text(dt.format(DATE_TIME_FORMAT).to_string()),
            other => other,
        }
    }

    /// Render as an SQL literal, escaped for inclusion in statement text.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) if r.is_nan() => "NULL".to_string(),
            Value::Real(r) if r.is_infinite() => {
                let literal = if r.is_sign_positive() { "9e999" } else { "-9e999" };
                literal.to_string()
            }
            Value::Real(r) => format!("{r:?}"),
            Value::Text(s) => quote_text(s),
            Value::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
            Value::Boolean(b) => i64::from(*b).to_string(),
            Value::Date(date) => quote_text(&date.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => quote_text(&dt.format(DATE_TIME_FORMAT).to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(bytes) => ToSqlOutput::Borrowed(ValueRef::Blob(bytes)),
            Value::Boolean(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
            Value::Date(date) => ToSqlOutput::from(date.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => ToSqlOutput::from(dt.format(DATE_TIME_FORMAT).to_string()),
        })
    }
}

/// TEXT that is not valid UTF-8 is returned as a `Blob` of its raw bytes.
impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(bytes) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => Value::Text(text),
                Err(err) => Value::Blob(err.into_bytes()),
            },
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dates_stored_as_fixed_format_text() {
        let joined = Value::from(date(2024, 1, 2));
        assert_eq!(joined.into_storage(), Value::Text("2024-01-02".to_string()));

        let seen = Value::from(date(2024, 1, 2).and_hms_opt(9, 5, 7).unwrap());
        assert_eq!(
            seen.into_storage(),
            Value::Text("2024-01-02 09:05:07".to_string())
        );
    }

    #[test]
    fn test_literals_are_escaped() {
        assert_eq!(Value::from("Alice").to_sql_literal(), "'Alice'");
        assert_eq!(Value::from("O'Brien").to_sql_literal(), "'O''Brien'");
        assert_eq!(Value::from(vec![0x0a_u8, 0xff]).to_sql_literal(), "X'0AFF'");
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
        assert_eq!(Value::from(true).to_sql_literal(), "1");
        assert_eq!(Value::from(2.5_f64).to_sql_literal(), "2.5");
        assert_eq!(Value::from(f64::NAN).to_sql_literal(), "NULL");
        assert_eq!(Value::from(date(2024, 1, 2)).to_sql_literal(), "'2024-01-02'");
    }

    #[test]
    fn test_invalid_utf8_text_read_as_blob() {
        assert_eq!(
            Value::from(ValueRef::Text("héllo".as_bytes())),
            Value::Text("héllo".to_string())
        );
        assert_eq!(
            Value::from(ValueRef::Text(&[0x66, 0xff])),
            Value::Blob(vec![0x66, 0xff])
        );
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(7_i32)), Value::Integer(7));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Boolean(true).as_i64(), Some(1));
        assert_eq!(Value::Text("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Text("x".into()).as_i64(), None);
        assert!(Value::Null.is_null());
    }
}
