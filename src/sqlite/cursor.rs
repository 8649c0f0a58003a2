use crate::driver::{ColumnDescription, Connection, Cursor};
use crate::error::SqlRowsError;
use crate::params::ParamSet;
use crate::types::SqlValue;

use super::params::bind_param_set;
use super::query::drain_rows;

impl Connection for rusqlite::Connection {
    type Cursor<'c>
        = SqliteCursor<'c>
    where
        Self: 'c;

    fn cursor(&self) -> Result<SqliteCursor<'_>, SqlRowsError> {
        Ok(SqliteCursor::new(self))
    }
}

/// Cursor over a borrowed `rusqlite::Connection`.
///
/// rusqlite statements borrow the connection for their whole life, so each
/// `execute` runs the statement to completion and buffers its rows until
/// `fetch_all`.
#[derive(Debug)]
pub struct SqliteCursor<'c> {
    conn: &'c rusqlite::Connection,
    description: Vec<ColumnDescription>,
    pending: Vec<Vec<SqlValue>>,
    closed: bool,
}

impl<'c> SqliteCursor<'c> {
    #[must_use]
    pub fn new(conn: &'c rusqlite::Connection) -> Self {
        Self {
            conn,
            description: Vec::new(),
            pending: Vec::new(),
            closed: false,
        }
    }

    fn ensure_open(&self, ctx: &str) -> Result<(), SqlRowsError> {
        if self.closed {
            Err(SqlRowsError::ExecutionError(format!(
                "SQLite cursor is closed; operation not permitted ({ctx})"
            )))
        } else {
            Ok(())
        }
    }

    fn reset(&mut self) {
        self.description.clear();
        self.pending.clear();
    }
}

impl Cursor for SqliteCursor<'_> {
    fn execute(&mut self, sql: &str, params: Option<&ParamSet>) -> Result<(), SqlRowsError> {
        self.ensure_open("execute")?;
        self.reset();

        let mut stmt = self.conn.prepare_cached(sql)?;
        bind_param_set(&mut stmt, params)?;
        let description: Vec<ColumnDescription> = stmt
            .column_names()
            .into_iter()
            .map(ColumnDescription::new)
            .collect();
        let rows = drain_rows(&mut stmt, description.len())?;

        self.description = description;
        self.pending = rows;
        Ok(())
    }

    fn execute_many(&mut self, sql: &str, batch: &[ParamSet]) -> Result<(), SqlRowsError> {
        self.ensure_open("execute many")?;
        self.reset();

        let mut stmt = self.conn.prepare_cached(sql)?;
        let column_count = stmt.column_count();
        for set in batch {
            bind_param_set(&mut stmt, Some(set))?;
            // rows from a RETURNING clause are not kept for batches
            drain_rows(&mut stmt, column_count)?;
        }
        Ok(())
    }

    fn description(&self) -> &[ColumnDescription] {
        &self.description
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>, SqlRowsError> {
        self.ensure_open("fetch all")?;
        Ok(std::mem::take(&mut self.pending))
    }

    fn close(&mut self) -> Result<(), SqlRowsError> {
        self.closed = true;
        self.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> rusqlite::Connection {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE test (a, b, c);
             INSERT INTO test VALUES ('A', 1, '101'), ('B', 2, '202'), ('C', 3, '303');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn describes_columns_after_execute() {
        let conn = seeded();
        let mut cursor = conn.cursor().unwrap();
        cursor
            .execute("SELECT a AS aa, c AS cc FROM test", None)
            .unwrap();
        let names: Vec<&str> = cursor.description().iter().map(ColumnDescription::name).collect();
        assert_eq!(names, vec!["aa", "cc"]);
        assert_eq!(cursor.fetch_all().unwrap().len(), 3);
        assert!(cursor.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn non_result_statement_has_no_description() {
        let conn = seeded();
        let mut cursor = conn.cursor().unwrap();
        cursor.execute("DELETE FROM test WHERE b = 1", None).unwrap();
        assert!(cursor.description().is_empty());
        assert_eq!(conn.changes(), 1);
    }

    #[test]
    fn closed_cursor_refuses_work_and_closes_twice() {
        let conn = seeded();
        let mut cursor = conn.cursor().unwrap();
        cursor.close().unwrap();
        cursor.close().unwrap();
        assert!(matches!(
            cursor.execute("SELECT 1", None),
            Err(SqlRowsError::ExecutionError(_))
        ));
    }

    #[test]
    fn execute_many_runs_each_set() {
        let conn = seeded();
        let mut cursor = conn.cursor().unwrap();
        cursor
            .execute_many(
                "INSERT INTO test VALUES (?, ?, ?)",
                &[
                    ParamSet::positional([SqlValue::from("D"), SqlValue::from(4), SqlValue::from("404")]),
                    ParamSet::positional([SqlValue::from("E"), SqlValue::from(5), SqlValue::from("505")]),
                ],
            )
            .unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM test", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 5);
    }
}
