//! Hierarchical report tables.
//!
//! A [`DataTable`] is the archived form of an accumulator: labelled rows of
//! [`MetricsRow`] totals, each optionally carrying a subtable with the
//! second-level breakdown. Tables are truncated before they are stored and
//! summed label-by-label when finer periods are rolled up.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::accumulator::{LabelTable, PivotTable};
use crate::error::CoreError;
use crate::metrics::MetricsRow;

/// Label given to the row that absorbs everything cut by truncation.
pub const SUMMARY_ROW_LABEL: &str = "Others";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    NbVisits,
    NbUniqVisitors,
    NbActions,
    NbConversions,
    Revenue,
}

/// Row caps applied when a table is archived. `None` keeps every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationLimits {
    pub max_rows_level0: Option<usize>,
    pub max_rows_subtable: Option<usize>,
    pub sort_column: SortColumn,
}

impl TruncationLimits {
    pub fn new(max_rows_level0: usize, max_rows_subtable: usize) -> Self {
        Self {
            max_rows_level0: Some(max_rows_level0),
            max_rows_subtable: Some(max_rows_subtable),
            sort_column: SortColumn::NbVisits,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            max_rows_level0: None,
            max_rows_subtable: None,
            sort_column: SortColumn::NbVisits,
        }
    }
}

/// Top-level row count and total row count including every subtable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCount {
    pub level0: usize,
    pub recursive: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub label: String,
    pub metrics: MetricsRow,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtable: Option<DataTable>,
}

impl DataRow {
    pub fn new(label: impl Into<String>, metrics: MetricsRow) -> Self {
        Self {
            label: label.into(),
            metrics,
            metadata: BTreeMap::new(),
            subtable: None,
        }
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    /// Sum `other` into this row. Metadata already present wins; subtables are
    /// summed recursively.
    pub fn merge(&mut self, other: DataRow) {
        self.metrics.merge(&other.metrics);
        for (key, value) in other.metadata {
            self.metadata.entry(key).or_insert(value);
        }
        match (self.subtable.as_mut(), other.subtable) {
            (Some(mine), Some(theirs)) => mine.add_table(theirs),
            (None, Some(theirs)) => self.subtable = Some(theirs),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub rows: Vec<DataRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_row: Option<Box<DataRow>>,
}

impl DataTable {
    /// Flat table, one row per label in insertion order.
    pub fn from_label_table(table: &LabelTable) -> Self {
        Self {
            rows: table
                .iter()
                .map(|(label, metrics)| DataRow::new(label, metrics.clone()))
                .collect(),
            summary_row: None,
        }
    }

    /// Parent table whose rows carry the matching pivot entries as subtables.
    pub fn with_subtables(parent: &LabelTable, pivot: &PivotTable) -> Self {
        Self {
            rows: parent
                .iter()
                .map(|(label, metrics)| DataRow {
                    subtable: pivot.get(label).map(DataTable::from_label_table),
                    ..DataRow::new(label, metrics.clone())
                })
                .collect(),
            summary_row: None,
        }
    }

    pub fn from_blob(blob: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(blob)?)
    }

    pub fn to_blob(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply `limits` and serialize.
    pub fn into_blob(mut self, limits: &TruncationLimits) -> Result<String, CoreError> {
        self.apply_limits(limits);
        self.to_blob()
    }

    /// Top-level rows, the summary row included.
    pub fn rows_count(&self) -> usize {
        self.rows.len() + usize::from(self.summary_row.is_some())
    }

    pub fn row_count(&self) -> RowCount {
        let nested: usize = self
            .rows
            .iter()
            .chain(self.summary_row.as_deref())
            .filter_map(|row| row.subtable.as_ref())
            .map(|subtable| subtable.row_count().recursive)
            .sum();
        let level0 = self.rows_count();
        RowCount {
            level0,
            recursive: level0 + nested,
        }
    }

    pub fn row(&self, label: &str) -> Option<&DataRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn row_mut(&mut self, label: &str) -> Option<&mut DataRow> {
        self.rows.iter_mut().find(|row| row.label == label)
    }

    /// Stable descending sort; equal values keep their current order.
    pub fn sort_desc(&mut self, column: SortColumn) {
        self.rows.sort_by(|a, b| {
            b.metrics
                .column_value(column)
                .partial_cmp(&a.metrics.column_value(column))
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Sort by `column` and keep at most `max_rows` top-level rows. When rows
    /// must be dropped, the first `max_rows - 1` survive and the rest are folded
    /// into the summary row, so totals over the table are preserved.
    pub fn truncate(&mut self, max_rows: usize, column: SortColumn) {
        self.sort_desc(column);
        if self.rows_count() <= max_rows {
            return;
        }
        let keep = max_rows.saturating_sub(1).min(self.rows.len());
        let removed = self.rows.split_off(keep);
        let mut summary = self
            .summary_row
            .take()
            .map(|row| *row)
            .unwrap_or_else(|| DataRow::new(SUMMARY_ROW_LABEL, MetricsRow::default()));
        for row in &removed {
            summary.metrics.merge(&row.metrics);
        }
        summary.subtable = None;
        self.summary_row = Some(Box::new(summary));
    }

    /// Truncate this table with the level-0 cap and every nested subtable with
    /// the subtable cap.
    pub fn apply_limits(&mut self, limits: &TruncationLimits) {
        if let Some(max_rows) = limits.max_rows_level0 {
            self.truncate(max_rows, limits.sort_column);
        }
        self.apply_subtable_limits(limits);
    }

    fn apply_subtable_limits(&mut self, limits: &TruncationLimits) {
        for row in &mut self.rows {
            if let Some(subtable) = row.subtable.as_mut() {
                if let Some(max_rows) = limits.max_rows_subtable {
                    subtable.truncate(max_rows, limits.sort_column);
                }
                subtable.apply_subtable_limits(limits);
            }
        }
    }

    /// Sum `other` into this table by label, recursing into subtables. Labels
    /// new to this table are appended in `other`'s order.
    pub fn add_table(&mut self, other: DataTable) {
        let mut index: HashMap<String, usize> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.label.clone(), idx))
            .collect();
        for row in other.rows {
            match index.get(&row.label) {
                Some(&idx) => self.rows[idx].merge(row),
                None => {
                    index.insert(row.label.clone(), self.rows.len());
                    self.rows.push(row);
                }
            }
        }
        if let Some(summary) = other.summary_row {
            match self.summary_row.as_mut() {
                Some(mine) => mine.merge(*summary),
                None => self.summary_row = Some(summary),
            }
        }
    }
}

/// Label-wise sum of several tables.
pub fn sum_tables(tables: impl IntoIterator<Item = DataTable>) -> DataTable {
    tables
        .into_iter()
        .fold(DataTable::default(), |mut sum, table| {
            sum.add_table(table);
            sum
        })
}
