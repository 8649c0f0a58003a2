//! Statement parameters and single-vs-batch execution selection.
//!
//! Callers normally build [`Params`] directly. Input whose shape is only known
//! at runtime (JSON payloads, config files) goes through [`classify`] and
//! [`Params::from_json`], which infer the execution mode from the first
//! element of a sequence.

use serde_json::Value as JsonValue;

use crate::error::SqlRowsError;
use crate::types::SqlValue;

/// How a statement is dispatched to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One execution, with zero or one parameter set bound.
    Single,
    /// One execution per parameter set.
    Batch,
}

/// Bindings for one execution of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSet {
    /// Values bound by position (`?`, `?1`, `:1`).
    Positional(Vec<SqlValue>),
    /// Values bound by placeholder name, without the `:`/`@`/`$` prefix.
    Named(Vec<(String, SqlValue)>),
}

impl ParamSet {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        ParamSet::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        ParamSet::Named(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ParamSet::Positional(values) => values.len(),
            ParamSet::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a named binding. Always `None` for positional sets.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&SqlValue> {
        match self {
            ParamSet::Named(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            ParamSet::Positional(_) => None,
        }
    }
}

/// Parameters for a `read` or `execute` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    Single(ParamSet),
    Batch(Vec<ParamSet>),
}

impl Params {
    /// Execution mode these parameters dispatch to.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Params::Batch(sets) if !sets.is_empty() => ExecutionMode::Batch,
            _ => ExecutionMode::Single,
        }
    }

    /// True when nothing would be bound: no set, an empty set, or an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Single(set) => set.is_empty(),
            Params::Batch(sets) => sets.is_empty(),
        }
    }

    /// Collapse empty parameters to [`Params::None`].
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.is_empty() { Params::None } else { self }
    }

    /// Build parameters from a dynamically shaped value.
    ///
    /// The shape picks the mode (see [`classify`]):
    /// - `null`, `{}` and `[]` bind nothing;
    /// - an object is one named set;
    /// - an array whose first element is an object or array is a batch, one
    ///   set per element;
    /// - any other array is one positional set, nested values kept as JSON;
    /// - a lone scalar is a one-value positional set.
    ///
    /// # Errors
    /// Returns `SqlRowsError::ParameterError` if a batch element is a scalar.
    pub fn from_json(value: &JsonValue) -> Result<Self, SqlRowsError> {
        if is_falsy(value) {
            return Ok(Params::None);
        }
        match (classify(value), value) {
            (ExecutionMode::Batch, JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| param_set_from_json(item, i))
                .collect::<Result<Vec<_>, _>>()
                .map(Params::Batch),
            (_, JsonValue::Object(map)) => Ok(Params::Single(ParamSet::Named(
                map.iter()
                    .map(|(name, v)| (name.clone(), SqlValue::from_json(v)))
                    .collect(),
            ))),
            (_, JsonValue::Array(items)) => Ok(Params::Single(ParamSet::Positional(
                items.iter().map(SqlValue::from_json).collect(),
            ))),
            (_, scalar) => Ok(Params::Single(ParamSet::Positional(vec![
                SqlValue::from_json(scalar),
            ]))),
        }
    }
}

impl From<ParamSet> for Params {
    fn from(set: ParamSet) -> Self {
        Params::Single(set)
    }
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::Single(ParamSet::Positional(values))
    }
}

impl From<Vec<ParamSet>> for Params {
    fn from(sets: Vec<ParamSet>) -> Self {
        Params::Batch(sets)
    }
}

/// Decide between one execution and a batch from the shape of `params`.
///
/// Only the first element of a sequence is inspected. A sequence whose first
/// element is a scalar but whose later elements are rows (or the reverse) is
/// classified by that first element alone.
#[must_use]
pub fn classify(params: &JsonValue) -> ExecutionMode {
    if is_falsy(params) {
        return ExecutionMode::Single;
    }
    match params {
        JsonValue::Array(items) => match items.first() {
            Some(JsonValue::Object(_) | JsonValue::Array(_)) => ExecutionMode::Batch,
            _ => ExecutionMode::Single,
        },
        _ => ExecutionMode::Single,
    }
}

fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn param_set_from_json(item: &JsonValue, position: usize) -> Result<ParamSet, SqlRowsError> {
    match item {
        JsonValue::Object(map) => Ok(ParamSet::Named(
            map.iter()
                .map(|(name, v)| (name.clone(), SqlValue::from_json(v)))
                .collect(),
        )),
        JsonValue::Array(values) => Ok(ParamSet::Positional(
            values.iter().map(SqlValue::from_json).collect(),
        )),
        other => Err(SqlRowsError::ParameterError(format!(
            "batch element {position} is not a parameter set: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_inputs_are_single() {
        assert_eq!(classify(&json!(null)), ExecutionMode::Single);
        assert_eq!(classify(&json!({})), ExecutionMode::Single);
        assert_eq!(classify(&json!([])), ExecutionMode::Single);
    }

    #[test]
    fn mapping_is_single() {
        assert_eq!(classify(&json!({"a": 1})), ExecutionMode::Single);
    }

    #[test]
    fn flat_scalars_are_single() {
        assert_eq!(classify(&json!([1, 2, 3])), ExecutionMode::Single);
        assert_eq!(classify(&json!(["101", "202"])), ExecutionMode::Single);
    }

    #[test]
    fn sequences_of_rows_are_batch() {
        assert_eq!(classify(&json!([[1], [2]])), ExecutionMode::Batch);
        assert_eq!(classify(&json!([{"a": 1}, {"a": 2}])), ExecutionMode::Batch);
    }

    #[test]
    fn lone_scalar_is_single() {
        assert_eq!(classify(&json!(7)), ExecutionMode::Single);
        assert_eq!(classify(&json!("x")), ExecutionMode::Single);
    }

    #[test]
    fn first_element_decides_mixed_sequences() {
        assert_eq!(classify(&json!([1, [2]])), ExecutionMode::Single);
        assert_eq!(classify(&json!([[1], 2])), ExecutionMode::Batch);
    }

    #[test]
    fn from_json_builds_named_batch() {
        let params = Params::from_json(&json!([
            {"a": "D", "b": 4, "c": "404"},
            {"a": "E", "b": 5, "c": "505"}
        ]))
        .unwrap();
        assert_eq!(params.mode(), ExecutionMode::Batch);
        let Params::Batch(sets) = params else {
            panic!("expected batch");
        };
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].get_named("b"), Some(&SqlValue::Int(5)));
    }

    #[test]
    fn from_json_keeps_nested_values_of_flat_sequence() {
        let params = Params::from_json(&json!([1, [2]])).unwrap();
        assert_eq!(
            params,
            Params::Single(ParamSet::Positional(vec![
                SqlValue::Int(1),
                SqlValue::JSON(json!([2])),
            ]))
        );
    }

    #[test]
    fn from_json_rejects_scalar_batch_element() {
        let err = Params::from_json(&json!([[1], 2])).unwrap_err();
        assert!(matches!(err, SqlRowsError::ParameterError(_)));
    }

    #[test]
    fn from_json_falsy_is_none() {
        assert_eq!(Params::from_json(&json!([])).unwrap(), Params::None);
        assert_eq!(Params::from_json(&json!({})).unwrap(), Params::None);
        assert_eq!(Params::from_json(&json!(null)).unwrap(), Params::None);
    }

    #[test]
    fn empty_params_normalize_to_none() {
        assert_eq!(Params::Batch(vec![]).normalized(), Params::None);
        assert_eq!(
            Params::Single(ParamSet::Positional(vec![])).normalized(),
            Params::None
        );
        assert_eq!(Params::Batch(vec![]).mode(), ExecutionMode::Single);
    }
}
