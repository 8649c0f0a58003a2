//! Thin convenience layer over cursor-style SQL connections.
//!
//! [`QueryRunner`] borrows an open connection and offers two calls:
//! [`QueryRunner::read`], which returns a shape-normalized [`ResultSet`], and
//! [`QueryRunner::execute`], which runs a statement once or once per parameter
//! set. Drivers plug in through the [`driver::Connection`] and
//! [`driver::Cursor`] traits; the `sqlite` feature provides an adapter for
//! `rusqlite::Connection`.

pub mod driver;
pub mod error;
pub mod params;
pub mod prelude;
pub mod results;
pub mod runner;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod types;

pub use driver::{ColumnDescription, Connection, Cursor};
pub use error::SqlRowsError;
pub use params::{ExecutionMode, ParamSet, Params, classify};
pub use results::{Fields, MappingIter, ResultSet, Row, RowMap};
pub use runner::{QueryRunner, build_result_set, fields_from_description};
pub use types::SqlValue;
