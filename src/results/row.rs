use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::fields::Fields;
use crate::types::SqlValue;

/// One fetched row.
///
/// A query with exactly one result column yields [`Row::Scalar`] rows holding
/// the bare value; wider queries yield [`Row::Tuple`] rows aligned with the
/// result set's [`Fields`].
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Scalar(SqlValue),
    Tuple(Vec<SqlValue>),
}

impl Row {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&SqlValue> {
        if let Row::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> Option<&[SqlValue]> {
        if let Row::Tuple(values) = self {
            Some(values)
        } else {
            None
        }
    }

    /// All values of the row; a scalar row is a one-element slice.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        match self {
            Row::Scalar(value) => std::slice::from_ref(value),
            Row::Tuple(values) => values,
        }
    }

    /// Value at a column position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values().get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        match self {
            Row::Scalar(value) => vec![value],
            Row::Tuple(values) => values,
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Row::Scalar(value) => value.serialize(serializer),
            Row::Tuple(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

/// Name-keyed view of one tuple row.
///
/// Borrowed from the owning [`super::ResultSet`]; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct RowMap<'a> {
    fields: &'a Fields,
    values: &'a [SqlValue],
}

impl<'a> RowMap<'a> {
    pub(crate) fn new(fields: &'a Fields, values: &'a [SqlValue]) -> Self {
        Self { fields, values }
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&'a SqlValue> {
        self.fields
            .index_of(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Name/value pairs in column order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a SqlValue)> + 'a {
        let (fields, values) = (self.fields, self.values);
        fields
            .iter()
            .filter_map(move |(name, idx)| values.get(idx).map(|value| (name, value)))
    }

    pub fn keys(self) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.names()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for RowMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_row_reads_as_single_value() {
        let row = Row::Scalar(SqlValue::Int(6));
        assert_eq!(row.as_scalar(), Some(&SqlValue::Int(6)));
        assert!(row.as_tuple().is_none());
        assert_eq!(row.len(), 1);
        assert_eq!(row.get(0), Some(&SqlValue::Int(6)));
    }

    #[test]
    fn row_map_pairs_names_with_positions() {
        let fields = Fields::new(["a", "b", "c"]);
        let values = vec![
            SqlValue::Text("A".into()),
            SqlValue::Int(1),
            SqlValue::Text("101".into()),
        ];
        let map = RowMap::new(&fields, &values);
        assert_eq!(map.get("b"), Some(&SqlValue::Int(1)));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(
            serde_json::to_value(map).unwrap(),
            serde_json::json!({"a": "A", "b": 1, "c": "101"})
        );
    }
}
