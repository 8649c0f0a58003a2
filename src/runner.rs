use std::ops::{Deref, DerefMut};

use serde_json::Value as JsonValue;

use crate::driver::{ColumnDescription, Connection, Cursor};
use crate::error::SqlRowsError;
use crate::params::{ExecutionMode, Params};
use crate::results::{Fields, ResultSet, Row};
use crate::types::SqlValue;

/// Runs reads and writes against a borrowed, already-open connection.
///
/// The runner never opens or closes the connection; the caller keeps it alive
/// and tears it down. Each call opens one cursor and releases it before
/// returning, on success and on failure.
///
/// ```rust,no_run
/// # #[cfg(feature = "sqlite")]
/// # fn demo() -> Result<(), sql_rows::SqlRowsError> {
/// use sql_rows::prelude::*;
///
/// let conn = rusqlite::Connection::open_in_memory()?;
/// let runner = QueryRunner::new(&conn);
/// runner.execute("CREATE TABLE t (a, b)", Params::None)?;
/// runner.execute(
///     "INSERT INTO t VALUES (:a, :b)",
///     vec![
///         ParamSet::named([("a", SqlValue::from("x")), ("b", SqlValue::from(1))]),
///         ParamSet::named([("a", SqlValue::from("y")), ("b", SqlValue::from(2))]),
///     ],
/// )?;
/// let total = runner.read("SELECT SUM(b) FROM t", Params::None)?;
/// assert_eq!(total.rows(), &[Row::Scalar(SqlValue::Int(3))]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryRunner<'conn, C: Connection + ?Sized> {
    connection: &'conn C,
}

impl<C: Connection + ?Sized> Clone for QueryRunner<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Connection + ?Sized> Copy for QueryRunner<'_, C> {}

impl<'conn, C: Connection + ?Sized> QueryRunner<'conn, C> {
    pub fn new(connection: &'conn C) -> Self {
        Self { connection }
    }

    /// The wrapped connection.
    #[must_use]
    pub fn connection(&self) -> &'conn C {
        self.connection
    }

    /// Run a query and fetch its whole result.
    ///
    /// A single result column yields bare values with no field map; more
    /// columns yield tuples keyed by column name.
    ///
    /// # Errors
    /// Returns the driver's error unchanged if the query fails,
    /// `SqlRowsError::NoResultColumns` if the statement returns no columns, and
    /// `SqlRowsError::ParameterError` if given a batch.
    pub fn read(&self, query: &str, params: impl Into<Params>) -> Result<ResultSet, SqlRowsError> {
        let params = params.into().normalized();
        if params.mode() == ExecutionMode::Batch {
            return Err(SqlRowsError::ParameterError(
                "read binds one parameter set; got a batch".into(),
            ));
        }
        tracing::debug!(query, bound = !params.is_empty(), "sql_rows read");

        let mut cursor = CursorGuard::new(self.connection.cursor()?);
        match &params {
            Params::Single(set) => cursor.execute(query, Some(set))?,
            _ => cursor.execute(query, None)?,
        }
        let result_set = build_result_set(&mut *cursor, query)?;
        cursor.close()?;

        tracing::debug!(
            columns = result_set.fields().map_or(1, Fields::width),
            rows = result_set.len(),
            "sql_rows read complete"
        );
        Ok(result_set)
    }

    /// Run a query and return only its first row.
    ///
    /// # Errors
    /// Same as [`QueryRunner::read`].
    pub fn read_one(&self, query: &str, params: impl Into<Params>) -> Result<Option<Row>, SqlRowsError> {
        Ok(self.read(query, params)?.into_rows().into_iter().next())
    }

    /// [`QueryRunner::read`] with parameters given as a dynamically shaped value.
    ///
    /// # Errors
    /// Same as [`QueryRunner::read`], plus conversion errors from [`Params::from_json`].
    pub fn read_json(&self, query: &str, params: &JsonValue) -> Result<ResultSet, SqlRowsError> {
        self.read(query, Params::from_json(params)?)
    }

    /// Execute a statement once, or once per parameter set for a batch.
    ///
    /// # Errors
    /// Returns the driver's error unchanged. Batch elements applied before a
    /// failing one stay applied.
    pub fn execute(&self, statement: &str, params: impl Into<Params>) -> Result<(), SqlRowsError> {
        let params = params.into().normalized();
        tracing::debug!(statement, mode = ?params.mode(), "sql_rows execute");

        let mut cursor = CursorGuard::new(self.connection.cursor()?);
        match &params {
            Params::None => cursor.execute(statement, None)?,
            Params::Single(set) => cursor.execute(statement, Some(set))?,
            Params::Batch(sets) => cursor.execute_many(statement, sets)?,
        }
        cursor.close()
    }

    /// [`QueryRunner::execute`] with the execution mode inferred from the
    /// shape of `params` (see [`crate::params::classify`]).
    ///
    /// # Errors
    /// Same as [`QueryRunner::execute`], plus conversion errors from [`Params::from_json`].
    pub fn execute_json(&self, statement: &str, params: &JsonValue) -> Result<(), SqlRowsError> {
        self.execute(statement, Params::from_json(params)?)
    }
}

/// Field map for a column-descriptor list: `None` for exactly one column.
#[must_use]
pub fn fields_from_description(columns: &[ColumnDescription]) -> Option<Fields> {
    if columns.len() > 1 {
        Some(Fields::new(columns.iter().map(ColumnDescription::name)))
    } else {
        None
    }
}

/// Shape everything left on an executed cursor into a [`ResultSet`].
///
/// # Errors
/// Returns `SqlRowsError::NoResultColumns` if the cursor describes no columns,
/// or the driver's error if fetching fails.
pub fn build_result_set<K: Cursor + ?Sized>(
    cursor: &mut K,
    query: &str,
) -> Result<ResultSet, SqlRowsError> {
    if cursor.description().is_empty() {
        return Err(SqlRowsError::NoResultColumns(query.to_owned()));
    }

    match fields_from_description(cursor.description()) {
        Some(fields) => ResultSet::tabular(fields, cursor.fetch_all()?),
        None => {
            let values = cursor
                .fetch_all()?
                .into_iter()
                .map(unwrap_single)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResultSet::scalar(values))
        }
    }
}

fn unwrap_single(row: Vec<SqlValue>) -> Result<SqlValue, SqlRowsError> {
    let width = row.len();
    let mut values = row.into_iter();
    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(SqlRowsError::ExecutionError(format!(
            "expected 1 value in single-column row, got {width}"
        ))),
    }
}

/// Closes the cursor on every exit path.
///
/// `close` consumes the guard and reports the close result; if the guard is
/// dropped instead (an earlier `?` bailed out), the cursor is closed in `Drop`
/// and any close failure is logged so the earlier error propagates.
struct CursorGuard<K: Cursor> {
    cursor: K,
    closed: bool,
}

impl<K: Cursor> CursorGuard<K> {
    fn new(cursor: K) -> Self {
        Self {
            cursor,
            closed: false,
        }
    }

    fn close(mut self) -> Result<(), SqlRowsError> {
        self.closed = true;
        self.cursor.close()
    }
}

impl<K: Cursor> Deref for CursorGuard<K> {
    type Target = K;

    fn deref(&self) -> &K {
        &self.cursor
    }
}

impl<K: Cursor> DerefMut for CursorGuard<K> {
    fn deref_mut(&mut self) -> &mut K {
        &mut self.cursor
    }
}

impl<K: Cursor> Drop for CursorGuard<K> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(error) = self.cursor.close() {
            tracing::warn!(%error, "sql_rows failed to close cursor while unwinding");
        }
    }
}
