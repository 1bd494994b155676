use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use archivist_core::datatable::DataTable;
use archivist_core::error::CoreError;
use archivist_core::period::Period;
use archivist_duckdb::ArchiveRecord;

use crate::archiving::archive_period;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub website_id: String,
    /// `day`, `week`, `month` or `year`.
    pub period: String,
    /// Any date inside the period, `YYYY-MM-DD`.
    pub date: String,
}

fn parse_period(kind: &str, date: &str) -> Result<Period, AppError> {
    Period::parse(kind, date).map_err(|e| match e {
        CoreError::InvalidPeriod(message) => AppError::InvalidField {
            field: "period",
            message,
        },
        other => AppError::BadRequest(other.to_string()),
    })
}

fn period_json(period: &Period) -> serde_json::Value {
    let (date1, date2) = period.date_range();
    json!({
        "period": period.kind(),
        "date1": date1,
        "date2": date2,
    })
}

/// `POST /api/archive`: archive one period for one website and return the
/// numeric records it produced.
#[tracing::instrument(skip_all, fields(website_id = %req.website_id, period = %req.period))]
pub async fn trigger_archive(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ArchiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let website_id = req.website_id.trim();
    if website_id.is_empty() {
        return Err(AppError::InvalidField {
            field: "website_id",
            message: "website_id must not be empty".to_string(),
        });
    }
    let period = parse_period(&req.period, &req.date)?;
    let today = Utc::now().date_naive();

    archive_period(&state.db, &state.config, website_id, period, today).await?;

    let records = state.db.list_numeric_records(website_id, &period).await?;
    Ok(Json(json!({
        "data": {
            "website_id": website_id,
            "archive": period_json(&period),
            "records": records,
        }
    })))
}

/// `GET /api/websites/{website_id}/archives/{period}/{date}/{name}`: one
/// stored record. Numeric records come back as `value`, blobs as a decoded
/// `table`.
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path((website_id, period, date, name)): Path<(String, String, String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let period = parse_period(&period, &date)?;
    let record = state
        .db
        .get_record(&website_id, &period, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No record {name} for {period}")))?;

    let body = match record {
        ArchiveRecord::Numeric(value) => json!({
            "name": name,
            "archive": period_json(&period),
            "value": value,
        }),
        ArchiveRecord::Blob(blob) => {
            let table = DataTable::from_blob(&blob).map_err(|e| AppError::Internal(e.into()))?;
            json!({
                "name": name,
                "archive": period_json(&period),
                "table": table,
            })
        }
    };
    Ok(Json(json!({ "data": body })))
}
