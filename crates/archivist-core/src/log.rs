use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked visit. Mirrors the DuckDB `log_visit` table columns exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogVisit {
    pub idvisit: String,
    pub website_id: String,
    pub visitor_id: String,
    pub visit_last_action_time: DateTime<Utc>,
    pub visit_total_actions: u32,
    /// Seconds between first and last action.
    pub visit_total_time: u32,
    pub visit_goal_converted: bool,
    /// Numeric code or snake_case name; NULL means direct entry.
    pub referer_type: Option<String>,
    /// Search engine, website host or campaign name.
    pub referer_name: Option<String>,
    /// Search keyword or campaign keyword.
    pub referer_keyword: Option<String>,
    pub referer_url: Option<String>,
    /// Filled in by the geolocation layer before the visit is stored.
    pub location_country: Option<String>,
    pub location_region: Option<String>,
    pub location_city: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
}

/// One goal conversion. Mirrors the DuckDB `log_conversion` table columns.
///
/// Referrer and location columns are copied from the converting visit, but
/// the referrer type may also be supplied by the client and is not trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConversion {
    pub idvisit: String,
    pub website_id: String,
    pub idgoal: i64,
    pub server_time: DateTime<Utc>,
    pub revenue: f64,
    pub revenue_subtotal: Option<f64>,
    pub revenue_tax: Option<f64>,
    pub revenue_shipping: Option<f64>,
    pub revenue_discount: Option<f64>,
    pub items: Option<u32>,
    pub referer_type: Option<String>,
    pub referer_name: Option<String>,
    pub referer_keyword: Option<String>,
    pub location_country: Option<String>,
    pub location_region: Option<String>,
    pub location_city: Option<String>,
}
