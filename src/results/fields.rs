use std::collections::HashMap;

/// Ordered mapping from column name to its position in each row tuple.
///
/// Built once per result set. When a driver reports the same name twice, the
/// later position wins and the first occurrence keeps its place in the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, usize)>,
    // Internal cache for faster name lookups
    index: HashMap<String, usize>,
    width: usize,
}

impl Fields {
    /// Build the mapping from column names in driver order.
    #[must_use]
    pub fn new<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut width = 0;

        for (position, name) in column_names.into_iter().enumerate() {
            let name = name.into();
            width = position + 1;
            match slots.get(&name) {
                Some(&slot) => entries[slot].1 = position,
                None => {
                    slots.insert(name.clone(), entries.len());
                    entries.push((name, position));
                }
            }
        }

        let index = entries
            .iter()
            .map(|(name, position)| (name.clone(), *position))
            .collect();

        Self {
            entries,
            index,
            width,
        }
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of values in each row tuple.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Position of `name` within a row tuple.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names paired with their row positions, in column order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|(name, position)| (name.as_str(), *position))
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
