//! Report archivers. Each archiver owns its accumulators for one archiving
//! pass and borrows the [`Processor`] that feeds it rows and stores records.

pub mod location;
pub mod referrers;

pub use location::LocationArchiver;
pub use referrers::ReferrersArchiver;

use crate::accumulator::{LabelTable, PivotTable};
use crate::config::Config;
use crate::metrics::MetricsRow;
use crate::processor::Processor;
use crate::row::ConversionRow;

fn bucket<'t, P: Processor + ?Sized>(
    table: &'t mut LabelTable,
    label: &str,
    processor: &P,
) -> &'t mut MetricsRow {
    table.get_or_insert_with(label, || processor.empty_metrics_row())
}

fn cell<'t, P: Processor + ?Sized>(
    pivot: &'t mut PivotTable,
    outer: &str,
    inner: &str,
    processor: &P,
) -> &'t mut MetricsRow {
    pivot.cell_mut(outer, inner, || processor.empty_metrics_row())
}

/// Merge a conversion row into the goal sub-row of `metrics`.
fn sum_goal<P: Processor + ?Sized>(processor: &P, metrics: &mut MetricsRow, row: &ConversionRow) {
    metrics
        .goal_mut(row.idgoal, || processor.empty_goal_metrics_row(row.idgoal))
        .merge(&row.metrics);
}

/// Raw value as recorded, `None` when missing or blank.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Archive every report for a single day from the raw log.
pub async fn archive_day<P: Processor + ?Sized>(processor: &P, config: &Config) -> anyhow::Result<()> {
    ReferrersArchiver::new(processor, config.referrer_limits())
        .archive_day()
        .await?;
    LocationArchiver::new(processor, config.standard_limits())
        .archive_day()
        .await
}

/// Archive every report for a week, month or year from its sub-period archives.
pub async fn archive_period<P: Processor + ?Sized>(
    processor: &P,
    config: &Config,
) -> anyhow::Result<()> {
    ReferrersArchiver::new(processor, config.referrer_limits())
        .archive_period()
        .await?;
    LocationArchiver::new(processor, config.standard_limits())
        .archive_period()
        .await
}
