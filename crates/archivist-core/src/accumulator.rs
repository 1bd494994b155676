use std::collections::HashMap;

use crate::metrics::MetricsRow;

/// Ordered mapping from report label to running totals.
///
/// Iteration follows first-insertion order, which is the default report order
/// and the tie-break when rows are later sorted.
#[derive(Debug, Clone)]
pub struct LabelTable<V = MetricsRow> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

/// Two-level accumulator: outer label → inner label → totals.
pub type PivotTable = LabelTable<LabelTable<MetricsRow>>;

impl<V> Default for LabelTable<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> LabelTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `label`, created with `make` the first time the label is seen.
    pub fn get_or_insert_with(&mut self, label: &str, make: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push((label.to_string(), make()));
                self.index.insert(label.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, label: &str) -> Option<&V> {
        self.index.get(label).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .iter_mut()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }
}

impl<V> LabelTable<LabelTable<V>> {
    /// Cell at (`outer`, `inner`), creating the inner table and the cell on demand.
    pub fn cell_mut(&mut self, outer: &str, inner: &str, make: impl FnOnce() -> V) -> &mut V {
        self.get_or_insert_with(outer, LabelTable::new)
            .get_or_insert_with(inner, make)
    }

    /// Number of cells across every inner table.
    pub fn cell_count(&self) -> usize {
        self.entries.iter().map(|(_, inner)| inner.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_first_insertion_order() {
        let mut table: LabelTable<u32> = LabelTable::new();
        *table.get_or_insert_with("b", || 0) += 1;
        *table.get_or_insert_with("a", || 0) += 1;
        *table.get_or_insert_with("b", || 0) += 1;
        let labels: Vec<&str> = table.labels().collect();
        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(table.get("b"), Some(&2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn make_runs_only_for_new_labels() {
        let mut table: LabelTable<u32> = LabelTable::new();
        let mut created = 0;
        for _ in 0..3 {
            table.get_or_insert_with("x", || {
                created += 1;
                0
            });
        }
        assert_eq!(created, 1);
    }

    #[test]
    fn pivot_cells_are_created_lazily() {
        let mut pivot: LabelTable<LabelTable<u32>> = LabelTable::new();
        *pivot.cell_mut("google", "rust", || 0) += 2;
        *pivot.cell_mut("google", "cargo", || 0) += 1;
        *pivot.cell_mut("bing", "rust", || 0) += 1;
        assert_eq!(pivot.len(), 2);
        assert_eq!(pivot.cell_count(), 3);
        assert_eq!(pivot.get("google").and_then(|t| t.get("rust")), Some(&2));
    }
}
