//! Archiving orchestration on top of the DuckDB processor: which archiver
//! runs for which period, filling gaps in the sub-period archives, and the
//! completion marker.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use tracing::info;

use archivist_core::archiver;
use archivist_core::config::Config;
use archivist_core::period::{Period, PeriodKind};
use archivist_duckdb::{ArchiveProcessor, DuckDbBackend};

pub type ArchiveFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Archive one day for one website from the raw log. The archive is final
/// only when `day` is before `today`.
pub async fn archive_day(
    db: &DuckDbBackend,
    config: &Config,
    website_id: &str,
    day: NaiveDate,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let period = Period::day(day);
    let complete = day < today;
    let processor = ArchiveProcessor::new(db, website_id, period);
    archiver::archive_day(&processor, config).await?;
    db.mark_archive_done(website_id, &period, complete).await?;
    info!(website_id, period = %period, complete, "day archived");
    Ok(())
}

/// Archive `period` for one website.
///
/// Days are read from the raw log. Larger periods are rolled up from their
/// sub-periods; a sub-period that ended before `today` is archived first
/// unless it already has a final archive, so archives taken while it was
/// still running get rebuilt. Sub-periods still in progress are summed only
/// if they were archived earlier.
pub fn archive_period<'a>(
    db: &'a DuckDbBackend,
    config: &'a Config,
    website_id: &'a str,
    period: Period,
    today: NaiveDate,
) -> ArchiveFuture<'a> {
    Box::pin(async move {
        if period.kind() == PeriodKind::Day {
            return archive_day(db, config, website_id, period.start(), today).await;
        }

        let mut filled = 0usize;
        for sub_period in period.sub_periods() {
            if sub_period.end() >= today
                || db.has_complete_archive(website_id, &sub_period).await?
            {
                continue;
            }
            archive_period(db, config, website_id, sub_period, today).await?;
            filled += 1;
        }

        let processor = ArchiveProcessor::new(db, website_id, period);
        archiver::archive_period(&processor, config).await?;
        let complete = period.end() < today;
        db.mark_archive_done(website_id, &period, complete).await?;
        info!(
            website_id,
            period = %period,
            complete,
            filled_sub_periods = filled,
            "period archived"
        );
        Ok(())
    })
}
