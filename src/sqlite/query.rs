use rusqlite::types::Value;

use crate::error::SqlRowsError;
use crate::types::SqlValue;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlRowsError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<SqlValue, SqlRowsError> {
    let value: Value = row.get(idx).map_err(SqlRowsError::SqliteError)?;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Integer(i) => Ok(SqlValue::Int(i)),
        Value::Real(f) => Ok(SqlValue::Float(f)),
        Value::Text(s) => Ok(SqlValue::Text(s)),
        Value::Blob(b) => Ok(SqlValue::Blob(b)),
    }
}

/// Step a bound statement to completion, collecting `column_count` values per row.
///
/// DML statements step once and return no rows.
pub(crate) fn drain_rows(
    stmt: &mut rusqlite::Statement<'_>,
    column_count: usize,
) -> Result<Vec<Vec<SqlValue>>, SqlRowsError> {
    let mut rows_iter = stmt.raw_query();
    let mut rows = Vec::new();
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        rows.push(row_values);
    }
    Ok(rows)
}
