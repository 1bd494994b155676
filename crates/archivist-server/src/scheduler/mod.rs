use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{error, info, warn};

use archivist_core::period::{Period, PeriodKind};

use crate::archiving::archive_period;
use crate::state::AppState;

/// Periods re-rolled after a day is archived, finest first so each roll-up
/// sees the archives the previous one just wrote.
const ROLLUP_KINDS: [PeriodKind; 3] = [PeriodKind::Week, PeriodKind::Month, PeriodKind::Year];

/// Archive the day before `today` for every website with visits, then re-roll
/// the week, month and year containing it. Once every website succeeded,
/// later ticks on the same day return `Ok(0)`.
///
/// A failing website is logged and skipped so the others still get archived.
/// The day stays pending and the next tick tries again.
pub async fn process_once(state: &Arc<AppState>, today: NaiveDate) -> anyhow::Result<usize> {
    let day = today - Duration::days(1);
    if *state.last_archived_day.lock().await == Some(day) {
        return Ok(0);
    }

    let websites = state.db.list_websites_with_visits(day).await?;
    let mut archived = 0usize;
    for website_id in &websites {
        let mut periods = vec![Period::day(day)];
        periods.extend(ROLLUP_KINDS.iter().map(|kind| Period::new(*kind, day)));

        let mut ok = true;
        for period in periods {
            if let Err(err) =
                archive_period(&state.db, &state.config, website_id, period, today).await
            {
                warn!(website_id = %website_id, period = %period, error = %err, "archiving failed");
                ok = false;
                break;
            }
        }
        if ok {
            archived += 1;
        }
    }

    let failed = websites.len() - archived;
    if failed == 0 {
        *state.last_archived_day.lock().await = Some(day);
        info!(day = %day, websites = websites.len(), archived, "daily archiving finished");
    } else {
        warn!(day = %day, archived, failed, "daily archiving incomplete, retrying next tick");
    }
    Ok(archived)
}

pub async fn run_scheduler_loop(state: Arc<AppState>) {
    let tick = state.config.scheduler_tick();
    info!(tick_seconds = tick.as_secs(), "Archiving scheduler started");
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let today = Utc::now().date_naive();
        if let Err(err) = process_once(&state, today).await {
            error!(error = %err, "archiving scheduler iteration failed");
        }
    }
}
