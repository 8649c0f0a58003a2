use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlRowsError;
use crate::params::ParamSet;
use crate::types::{SqlValue, TIMESTAMP_FORMAT};

/// Convert a single `SqlValue` to a rusqlite `Value`.
#[must_use]
pub fn sql_value_to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        // SQLite has no timestamp storage class; store the text form
        SqlValue::Timestamp(dt) => Value::Text(dt.format(TIMESTAMP_FORMAT).to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::JSON(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind one parameter set (or none) onto a prepared statement.
///
/// Every placeholder must be covered: positional sets must match the
/// placeholder count exactly, named sets must supply each placeholder's name
/// (extra names are ignored).
///
/// # Errors
/// Returns `SqlRowsError::ParameterError` on a count or name mismatch, or
/// `SqlRowsError::SqliteError` if SQLite rejects a binding.
pub fn bind_param_set(
    stmt: &mut Statement<'_>,
    params: Option<&ParamSet>,
) -> Result<(), SqlRowsError> {
    let expected = stmt.parameter_count();
    match params {
        None if expected == 0 => Ok(()),
        None => Err(SqlRowsError::ParameterError(format!(
            "statement uses {expected} parameters, but none were supplied"
        ))),
        Some(ParamSet::Positional(values)) => {
            if values.len() != expected {
                return Err(SqlRowsError::ParameterError(format!(
                    "statement uses {expected} parameters, but {} were supplied",
                    values.len()
                )));
            }
            for (idx, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, sql_value_to_sqlite_value(value))?;
            }
            Ok(())
        }
        Some(set @ ParamSet::Named(_)) => {
            for idx in 1..=expected {
                let name = placeholder_name(stmt, idx)?;
                let value = set.get_named(&name).ok_or_else(|| {
                    SqlRowsError::ParameterError(format!(
                        "no value supplied for named parameter '{name}'"
                    ))
                })?;
                stmt.raw_bind_parameter(idx, sql_value_to_sqlite_value(value))?;
            }
            Ok(())
        }
    }
}

/// Name of placeholder `idx` without its `:`/`@`/`$`/`?` prefix.
fn placeholder_name(stmt: &Statement<'_>, idx: usize) -> Result<String, SqlRowsError> {
    let raw = stmt.parameter_name(idx).ok_or_else(|| {
        SqlRowsError::ParameterError(format!(
            "parameter {idx} has no name, but named parameters were supplied"
        ))
    })?;
    let mut chars = raw.chars();
    chars.next();
    Ok(chars.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::json;

    #[test]
    fn converts_values_for_storage() {
        let dt = NaiveDateTime::parse_from_str("2024-01-01 08:00:01", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            sql_value_to_sqlite_value(&SqlValue::Timestamp(dt)),
            Value::Text("2024-01-01 08:00:01".into())
        );
        assert_eq!(sql_value_to_sqlite_value(&SqlValue::Bool(true)), Value::Integer(1));
        assert_eq!(
            sql_value_to_sqlite_value(&SqlValue::JSON(json!({"k": 1}))),
            Value::Text(r#"{"k":1}"#.into())
        );
    }

    #[test]
    fn named_binding_reports_missing_key() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT :a, :b").unwrap();
        let set = ParamSet::named([("a", 1)]);
        let err = bind_param_set(&mut stmt, Some(&set)).unwrap_err();
        assert!(matches!(err, SqlRowsError::ParameterError(ref m) if m.contains("'b'")));
    }

    #[test]
    fn positional_binding_checks_count() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?, ?").unwrap();
        let set = ParamSet::positional([1]);
        assert!(bind_param_set(&mut stmt, Some(&set)).is_err());
        assert!(bind_param_set(&mut stmt, None).is_err());
    }

    #[test]
    fn anonymous_placeholder_rejects_named_set() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?").unwrap();
        let set = ParamSet::named([("a", 1)]);
        assert!(matches!(
            bind_param_set(&mut stmt, Some(&set)),
            Err(SqlRowsError::ParameterError(_))
        ));
    }
}
