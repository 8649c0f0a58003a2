use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;

use super::fields::Fields;
use super::row::{Row, RowMap};
use crate::error::SqlRowsError;
use crate::types::SqlValue;

/// A fully fetched query result.
///
/// `fields` is `None` when the query produced exactly one column; every row
/// is then a bare [`Row::Scalar`]. Otherwise every row is a [`Row::Tuple`]
/// aligned with `fields`. Rows are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    fields: Option<Fields>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Build a single-column result set from its bare values.
    #[must_use]
    pub fn scalar(values: Vec<SqlValue>) -> Self {
        Self {
            fields: None,
            rows: values.into_iter().map(Row::Scalar).collect(),
        }
    }

    /// Build a multi-column result set.
    ///
    /// # Errors
    /// Returns `SqlRowsError::ExecutionError` if a row's width differs from the
    /// number of described columns.
    pub fn tabular(fields: Fields, rows: Vec<Vec<SqlValue>>) -> Result<Self, SqlRowsError> {
        if let Some(bad) = rows.iter().find(|row| row.len() != fields.width()) {
            return Err(SqlRowsError::ExecutionError(format!(
                "row has {} values but {} columns were described",
                bad.len(),
                fields.width()
            )));
        }
        Ok(Self {
            fields: Some(fields),
            rows: rows.into_iter().map(Row::Tuple).collect(),
        })
    }

    /// Field map, or `None` for a single-column result.
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }

    /// Field names in column order, or `None` for a single-column result.
    #[must_use]
    pub fn column_names(&self) -> Option<Vec<&str>> {
        self.fields.as_ref().map(|fields| fields.names().collect())
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the raw rows. Each call starts from the first row.
    pub fn iter_rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Iterate rows as name-keyed mappings. Each call starts from the first row.
    ///
    /// # Errors
    /// Returns `SqlRowsError::NoFields` for a single-column result, whose rows
    /// carry no column names.
    pub fn iter_mappings(&self) -> Result<MappingIter<'_>, SqlRowsError> {
        let fields = self.fields.as_ref().ok_or(SqlRowsError::NoFields)?;
        Ok(MappingIter {
            fields,
            rows: self.rows.iter(),
        })
    }

    /// Render as JSON: an array of objects, or an array of bare values for a
    /// single-column result.
    ///
    /// # Errors
    /// Returns `SqlRowsError::SerializationError` if a value cannot be rendered.
    pub fn to_json(&self) -> Result<JsonValue, SqlRowsError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_rows()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        match &self.fields {
            Some(fields) => {
                for row in &self.rows {
                    seq.serialize_element(&RowMap::new(fields, row.values()))?;
                }
            }
            None => {
                for row in &self.rows {
                    seq.serialize_element(row)?;
                }
            }
        }
        seq.end()
    }
}

/// Mapping iterator returned by [`ResultSet::iter_mappings`].
#[derive(Debug, Clone)]
pub struct MappingIter<'a> {
    fields: &'a Fields,
    rows: std::slice::Iter<'a, Row>,
}

impl<'a> Iterator for MappingIter<'a> {
    type Item = RowMap<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|row| RowMap::new(self.fields, row.values()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for MappingIter<'_> {}
