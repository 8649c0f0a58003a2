//! The capability set a database driver must expose to be wrapped by
//! [`crate::QueryRunner`].
//!
//! An adapter implements [`Connection`] for its connection handle and
//! [`Cursor`] for a per-statement cursor. The SQLite adapter in
//! [`crate::sqlite`] is the reference implementation.

use serde::Serialize;

use crate::error::SqlRowsError;
use crate::params::ParamSet;
use crate::types::SqlValue;

/// Per-column metadata reported after a statement runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescription {
    name: String,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An already-open connection that can hand out cursors.
///
/// Takes `&self`: drivers needing exclusive access manage it internally.
pub trait Connection {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Open a cursor on this connection.
    ///
    /// # Errors
    /// Returns the driver's error if a cursor cannot be opened.
    fn cursor(&self) -> Result<Self::Cursor<'_>, SqlRowsError>;
}

/// Handle for executing statements and reading back their results.
pub trait Cursor {
    /// Execute `sql` once, with one parameter set bound or none.
    ///
    /// # Errors
    /// Returns the driver's error if the statement is rejected.
    fn execute(&mut self, sql: &str, params: Option<&ParamSet>) -> Result<(), SqlRowsError>;

    /// Execute `sql` once per parameter set. No atomicity across sets.
    ///
    /// # Errors
    /// Returns the driver's error from the first failing set.
    fn execute_many(&mut self, sql: &str, batch: &[ParamSet]) -> Result<(), SqlRowsError>;

    /// Columns of the last executed statement; empty if it produced no result set.
    fn description(&self) -> &[ColumnDescription];

    /// All remaining rows of the last executed statement.
    ///
    /// # Errors
    /// Returns the driver's error if rows cannot be read.
    fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>, SqlRowsError>;

    /// Release the cursor. Closing twice is a no-op.
    ///
    /// # Errors
    /// Returns the driver's error if release fails.
    fn close(&mut self) -> Result<(), SqlRowsError>;
}
