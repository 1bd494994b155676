//! In-memory [`Processor`] for archiver unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::datatable::DataTable;
use crate::processor::{Processor, RowCursor};
use crate::row::{ConversionRow, Dimension, VisitRow};

#[derive(Default)]
pub struct MemoryProcessor {
    pub visits: Vec<VisitRow>,
    /// `None` behaves like a store without a conversion table.
    pub conversions: Option<Vec<ConversionRow>>,
    pub sub_periods: Vec<HashMap<String, String>>,
    numerics: Mutex<BTreeMap<String, u64>>,
    blobs: Mutex<BTreeMap<String, String>>,
}

impl MemoryProcessor {
    pub fn with_visits(visits: Vec<VisitRow>) -> Self {
        Self {
            visits,
            ..Self::default()
        }
    }

    pub fn with_conversions(mut self, conversions: Vec<ConversionRow>) -> Self {
        self.conversions = Some(conversions);
        self
    }

    pub fn with_sub_period(mut self, records: &[(&str, String)]) -> Self {
        self.sub_periods.push(
            records
                .iter()
                .map(|(name, blob)| (name.to_string(), blob.clone()))
                .collect(),
        );
        self
    }

    pub fn numeric(&self, name: &str) -> Option<u64> {
        self.numerics.lock().expect("numerics").get(name).copied()
    }

    pub fn blob(&self, name: &str) -> Option<String> {
        self.blobs.lock().expect("blobs").get(name).cloned()
    }

    pub fn blob_table(&self, name: &str) -> Option<DataTable> {
        self.blob(name)
            .map(|blob| DataTable::from_blob(&blob).expect("stored blob decodes"))
    }

    /// Use every blob `archived` has written as one more sub-period.
    pub fn with_archived_sub_period(mut self, archived: &MemoryProcessor) -> Self {
        let records = archived.blobs.lock().expect("blobs").clone();
        self.sub_periods.push(records.into_iter().collect());
        self
    }
}

#[async_trait::async_trait]
impl Processor for MemoryProcessor {
    async fn query_visit_rows(
        &self,
        _dimensions: &[Dimension],
    ) -> anyhow::Result<Option<RowCursor<VisitRow>>> {
        Ok(Some(Box::new(self.visits.clone().into_iter())))
    }

    async fn query_conversion_rows(
        &self,
        _dimensions: &[Dimension],
    ) -> anyhow::Result<Option<RowCursor<ConversionRow>>> {
        Ok(self
            .conversions
            .clone()
            .map(|rows| Box::new(rows.into_iter()) as RowCursor<ConversionRow>))
    }

    async fn insert_numeric_record(&self, name: &str, value: u64) -> anyhow::Result<()> {
        self.numerics
            .lock()
            .expect("numerics")
            .insert(name.to_string(), value);
        Ok(())
    }

    async fn insert_blob_record(&self, name: &str, blob: String) -> anyhow::Result<()> {
        self.blobs.lock().expect("blobs").insert(name.to_string(), blob);
        Ok(())
    }

    async fn sub_period_blobs(&self, name: &str) -> anyhow::Result<Vec<Option<String>>> {
        Ok(self
            .sub_periods
            .iter()
            .map(|records| records.get(name).cloned())
            .collect())
    }
}
