//! Archive record storage: numeric values and serialized report tables keyed
//! by (website, period, start date, name).

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use archivist_core::period::Period;

use crate::backend::format_date;
use crate::DuckDbBackend;

/// Numeric record written last by a completed archiving pass.
pub const ARCHIVE_DONE_RECORD: &str = "done";

/// Done value for an archive written after its period ended.
pub const ARCHIVE_DONE_OK: u64 = 1;

/// Done value for an archive written while its period was still running. It
/// is served as is but rebuilt by the next roll-up that needs it.
pub const ARCHIVE_DONE_TEMPORARY: u64 = 3;

/// A stored record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveRecord {
    Numeric(u64),
    Blob(String),
}

fn period_key(period: &Period) -> (&'static str, String, String) {
    let (start, end) = period.date_range();
    (period.kind().as_str(), format_date(start), format_date(end))
}

impl DuckDbBackend {
    /// Insert or overwrite a numeric record.
    pub async fn insert_numeric_record(
        &self,
        website_id: &str,
        period: &Period,
        name: &str,
        value: u64,
    ) -> Result<()> {
        let (kind, date1, date2) = period_key(period);
        let value = i64::try_from(value).map_err(|_| anyhow!("numeric record {name} overflows BIGINT"))?;
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT OR REPLACE INTO archive_numeric
                   (website_id, period, date1, date2, name, value, ts_archived)
               VALUES (?1, ?2, CAST(?3 AS DATE), CAST(?4 AS DATE), ?5, ?6, CURRENT_TIMESTAMP)"#,
            duckdb::params![website_id, kind, date1, date2, name, value],
        )?;
        Ok(())
    }

    /// Insert or overwrite a blob record.
    pub async fn insert_blob_record(
        &self,
        website_id: &str,
        period: &Period,
        name: &str,
        blob: &str,
    ) -> Result<()> {
        let (kind, date1, date2) = period_key(period);
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT OR REPLACE INTO archive_blob
                   (website_id, period, date1, date2, name, value, ts_archived)
               VALUES (?1, ?2, CAST(?3 AS DATE), CAST(?4 AS DATE), ?5, ?6, CURRENT_TIMESTAMP)"#,
            duckdb::params![website_id, kind, date1, date2, name, blob],
        )?;
        Ok(())
    }

    pub async fn get_numeric_record(
        &self,
        website_id: &str,
        period: &Period,
        name: &str,
    ) -> Result<Option<u64>> {
        let (kind, date1, _) = period_key(period);
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"SELECT value FROM archive_numeric
               WHERE website_id = ?1 AND period = ?2 AND date1 = CAST(?3 AS DATE) AND name = ?4"#,
        )?;
        match stmt.query_row(duckdb::params![website_id, kind, date1, name], |row| {
            row.get::<_, i64>(0)
        }) {
            Ok(v) => Ok(Some(v.max(0) as u64)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!(e)),
        }
    }

    pub async fn get_blob_record(
        &self,
        website_id: &str,
        period: &Period,
        name: &str,
    ) -> Result<Option<String>> {
        let (kind, date1, _) = period_key(period);
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"SELECT value FROM archive_blob
               WHERE website_id = ?1 AND period = ?2 AND date1 = CAST(?3 AS DATE) AND name = ?4"#,
        )?;
        match stmt.query_row(duckdb::params![website_id, kind, date1, name], |row| {
            row.get::<_, String>(0)
        }) {
            Ok(v) => Ok(Some(v)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!(e)),
        }
    }

    /// Either kind of record stored under `name`, numeric first.
    pub async fn get_record(
        &self,
        website_id: &str,
        period: &Period,
        name: &str,
    ) -> Result<Option<ArchiveRecord>> {
        if let Some(value) = self.get_numeric_record(website_id, period, name).await? {
            return Ok(Some(ArchiveRecord::Numeric(value)));
        }
        Ok(self
            .get_blob_record(website_id, period, name)
            .await?
            .map(ArchiveRecord::Blob))
    }

    /// Every numeric record of one archive, the done marker excluded.
    pub async fn list_numeric_records(
        &self,
        website_id: &str,
        period: &Period,
    ) -> Result<BTreeMap<String, u64>> {
        let (kind, date1, _) = period_key(period);
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"SELECT name, value FROM archive_numeric
               WHERE website_id = ?1 AND period = ?2 AND date1 = CAST(?3 AS DATE) AND name <> ?4
               ORDER BY name"#,
        )?;
        let rows = stmt.query_map(
            duckdb::params![website_id, kind, date1, ARCHIVE_DONE_RECORD],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )?;
        let mut records = BTreeMap::new();
        for row in rows {
            let (name, value) = row?;
            records.insert(name, value.max(0) as u64);
        }
        Ok(records)
    }

    /// Whether any archive, final or temporary, exists for this website and period.
    pub async fn has_archive(&self, website_id: &str, period: &Period) -> Result<bool> {
        Ok(self
            .get_numeric_record(website_id, period, ARCHIVE_DONE_RECORD)
            .await?
            .is_some())
    }

    /// Whether the stored archive was written after the period ended.
    pub async fn has_complete_archive(&self, website_id: &str, period: &Period) -> Result<bool> {
        Ok(self
            .get_numeric_record(website_id, period, ARCHIVE_DONE_RECORD)
            .await?
            == Some(ARCHIVE_DONE_OK))
    }

    pub async fn mark_archive_done(
        &self,
        website_id: &str,
        period: &Period,
        complete: bool,
    ) -> Result<()> {
        let value = if complete {
            ARCHIVE_DONE_OK
        } else {
            ARCHIVE_DONE_TEMPORARY
        };
        self.insert_numeric_record(website_id, period, ARCHIVE_DONE_RECORD, value)
            .await
    }
}
