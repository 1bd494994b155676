use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use archivist_core::log::{LogConversion, LogVisit};

use crate::schema::init_sql;

/// DuckDB timestamp literal format used for every bound timestamp.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Half-open `[start, end + 1 day)` timestamp bounds covering whole days.
pub(crate) fn day_bounds(start: NaiveDate, end: NaiveDate) -> (String, String) {
    (format_date(start), format_date(end + Duration::days(1)))
}

/// DuckDB-backed log and archive store.
///
/// DuckDB is single-writer: concurrent reads are fine, but concurrent writes
/// contend. The connection sits behind `Arc<Mutex<_>>` so archiving tasks and
/// HTTP handlers serialise their access while sharing one backend.
///
/// Memory and thread limits are enforced by [`init_sql`] at open time.
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Open (or create) a DuckDB database file at `path`.
    ///
    /// `memory_limit` is a DuckDB size string such as `"1GB"` or `"512MB"`.
    pub fn open(path: &str, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Data is discarded on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Acquire the DuckDB connection lock for direct queries.
    ///
    /// Intended for integration tests that need to verify stored data.
    #[doc(hidden)]
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    /// Insert a batch of visits in a single transaction. No-op when empty.
    pub async fn insert_visits(&self, visits: &[LogVisit]) -> Result<()> {
        if visits.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for visit in visits {
            tx.execute(
                r#"INSERT INTO log_visit (
                    idvisit, website_id, visitor_id, visit_last_action_time,
                    visit_total_actions, visit_total_time, visit_goal_converted,
                    referer_type, referer_name, referer_keyword, referer_url,
                    location_country, location_region, location_city,
                    location_latitude, location_longitude
                ) VALUES (
                    ?1, ?2, ?3, CAST(?4 AS TIMESTAMP),
                    ?5, ?6, ?7,
                    ?8, ?9, ?10, ?11,
                    ?12, ?13, ?14,
                    ?15, ?16
                )"#,
                duckdb::params![
                    visit.idvisit,
                    visit.website_id,
                    visit.visitor_id,
                    format_timestamp(&visit.visit_last_action_time),
                    visit.visit_total_actions,
                    visit.visit_total_time,
                    visit.visit_goal_converted,
                    visit.referer_type,
                    visit.referer_name,
                    visit.referer_keyword,
                    visit.referer_url,
                    visit.location_country,
                    visit.location_region,
                    visit.location_city,
                    visit.location_latitude,
                    visit.location_longitude,
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!(count = visits.len(), "visits inserted");
        Ok(())
    }

    /// Insert a batch of conversions in a single transaction. No-op when empty.
    pub async fn insert_conversions(&self, conversions: &[LogConversion]) -> Result<()> {
        if conversions.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for conversion in conversions {
            tx.execute(
                r#"INSERT INTO log_conversion (
                    idvisit, website_id, idgoal, server_time,
                    revenue, revenue_subtotal, revenue_tax, revenue_shipping,
                    revenue_discount, items,
                    referer_type, referer_name, referer_keyword,
                    location_country, location_region, location_city
                ) VALUES (
                    ?1, ?2, ?3, CAST(?4 AS TIMESTAMP),
                    ?5, ?6, ?7, ?8,
                    ?9, ?10,
                    ?11, ?12, ?13,
                    ?14, ?15, ?16
                )"#,
                duckdb::params![
                    conversion.idvisit,
                    conversion.website_id,
                    conversion.idgoal,
                    format_timestamp(&conversion.server_time),
                    conversion.revenue,
                    conversion.revenue_subtotal,
                    conversion.revenue_tax,
                    conversion.revenue_shipping,
                    conversion.revenue_discount,
                    conversion.items,
                    conversion.referer_type,
                    conversion.referer_name,
                    conversion.referer_keyword,
                    conversion.location_country,
                    conversion.location_region,
                    conversion.location_city,
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!(count = conversions.len(), "conversions inserted");
        Ok(())
    }

    /// Websites with at least one visit on `day`, sorted by id.
    pub async fn list_websites_with_visits(&self, day: NaiveDate) -> Result<Vec<String>> {
        let (start, end) = day_bounds(day, day);
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"SELECT DISTINCT website_id
               FROM log_visit
               WHERE visit_last_action_time >= CAST(?1 AS TIMESTAMP)
                 AND visit_last_action_time < CAST(?2 AS TIMESTAMP)
               ORDER BY website_id"#,
        )?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
