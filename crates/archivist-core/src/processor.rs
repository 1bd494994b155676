//! Archiving collaborator abstraction.

use crate::metrics::{GoalMetrics, MetricsRow};
use crate::row::{ConversionRow, Dimension, VisitRow};

/// Sequential, single-pass cursor over grouped rows.
pub type RowCursor<T> = Box<dyn Iterator<Item = T> + Send>;

/// Everything an archiver needs from the outside world for one period of one
/// website: grouped log rows, empty metric rows, archive writes, and the
/// records already archived for the period's sub-periods.
///
/// Archivers hold a `&Processor` for the lifetime of one archiving pass.
#[async_trait::async_trait]
pub trait Processor: Send + Sync {
    /// Visits of the period grouped by `dimensions`. `Ok(None)` means there is
    /// nothing to read and is treated as zero rows.
    async fn query_visit_rows(
        &self,
        dimensions: &[Dimension],
    ) -> anyhow::Result<Option<RowCursor<VisitRow>>>;

    /// Conversions of the period grouped by `dimensions` and goal id.
    async fn query_conversion_rows(
        &self,
        dimensions: &[Dimension],
    ) -> anyhow::Result<Option<RowCursor<ConversionRow>>>;

    fn empty_metrics_row(&self) -> MetricsRow {
        MetricsRow::default()
    }

    fn empty_goal_metrics_row(&self, idgoal: i64) -> GoalMetrics {
        GoalMetrics::for_goal(idgoal)
    }

    async fn insert_numeric_record(&self, name: &str, value: u64) -> anyhow::Result<()>;

    async fn insert_blob_record(&self, name: &str, blob: String) -> anyhow::Result<()>;

    /// The blob stored under `name` in each sub-period archive of the current
    /// period, `None` where a sub-period has no such record. Empty for days.
    async fn sub_period_blobs(&self, name: &str) -> anyhow::Result<Vec<Option<String>>>;
}
