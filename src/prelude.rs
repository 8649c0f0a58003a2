//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::driver::{ColumnDescription, Connection, Cursor};
pub use crate::error::SqlRowsError;
pub use crate::params::{ExecutionMode, ParamSet, Params, classify};
pub use crate::results::{Fields, ResultSet, Row, RowMap};
pub use crate::runner::QueryRunner;
pub use crate::types::SqlValue;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteCursor;
