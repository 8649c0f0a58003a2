//! Result containers returned by [`crate::QueryRunner::read`].

mod fields;
mod result_set;
mod row;

pub use fields::Fields;
pub use result_set::{MappingIter, ResultSet};
pub use row::{Row, RowMap};
