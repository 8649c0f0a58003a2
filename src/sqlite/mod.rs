// SQLite adapter - implements the driver traits for `rusqlite::Connection`
//
// This module is split into several sub-modules:
// - cursor: the cursor type and the `Connection` impl
// - params: binding `ParamSet`s onto prepared statements
// - query: reading cells and rows back into `SqlValue`s

pub mod cursor;
pub mod params;
pub mod query;

// Re-export the public API
pub use cursor::SqliteCursor;
pub use params::{bind_param_set, sql_value_to_sqlite_value};
pub use query::sqlite_extract_value;
