use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::state::AppState;

/// How far the last fully archived day may trail today. Yesterday is the
/// normal lag; one missed day is tolerated while the scheduler retries.
pub const MAX_ARCHIVE_LAG_DAYS: i64 = 2;

/// Days between `today` and the last day archived for every website. `None`
/// until the scheduler finishes its first day.
pub fn archive_lag_days(last_archived_day: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    last_archived_day.map(|day| (today - day).num_days())
}

/// `GET /health`: liveness and archive freshness.
///
/// Returns `503 Service Unavailable` when DuckDB is unreachable (`degraded`)
/// or when daily archiving has fallen more than [`MAX_ARCHIVE_LAG_DAYS`]
/// behind (`stale`).
///
/// Response shape:
/// ```json
/// { "status": "ok", "version": "0.1.0", "last_archived_day": "2025-06-01", "archive_lag_days": 1 }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let last_archived_day = *state.last_archived_day.lock().await;
    let lag = archive_lag_days(last_archived_day, Utc::now().date_naive());

    let status = match state.db.ping().await {
        Err(e) => {
            tracing::error!(error = %e, "Health check: DuckDB unreachable");
            "degraded"
        }
        Ok(()) if lag.is_some_and(|days| days > MAX_ARCHIVE_LAG_DAYS) => {
            tracing::warn!(
                last_archived_day = ?last_archived_day,
                archive_lag_days = ?lag,
                "Health check: archiving is behind"
            );
            "stale"
        }
        Ok(()) => "ok",
    };
    let code = if status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "last_archived_day": last_archived_day,
            "archive_lag_days": lag,
        })),
    )
        .into_response()
}
