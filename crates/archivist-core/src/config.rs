use std::time::Duration;

use crate::datatable::{SortColumn, TruncationLimits};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub duckdb_memory_limit: String,
    /// Top-level row cap for referrer reports.
    pub max_rows_referrers: usize,
    /// Row cap applied to every referrer subtable.
    pub max_rows_subtable_referrers: usize,
    /// Row cap for the remaining truncated reports (regions, cities).
    pub max_rows_standard: usize,
    pub scheduler_tick_seconds: u64,
}

fn positive_limit(var: &str, default: usize) -> Result<usize, String> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    let value: usize = raw
        .parse()
        .map_err(|e| format!("invalid {var}: {e}"))?;
    if value == 0 {
        return Err(format!("{var} must be a positive integer"));
    }
    Ok(value)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("ARCHIVIST_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("ARCHIVIST_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            duckdb_memory_limit: std::env::var("ARCHIVIST_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            max_rows_referrers: positive_limit("ARCHIVIST_MAX_ROWS_REFERRERS", 1000)?,
            max_rows_subtable_referrers: positive_limit(
                "ARCHIVIST_MAX_ROWS_SUBTABLE_REFERRERS",
                50,
            )?,
            max_rows_standard: positive_limit("ARCHIVIST_MAX_ROWS_STANDARD", 500)?,
            scheduler_tick_seconds: std::env::var("ARCHIVIST_SCHEDULER_TICK_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(|v| v.clamp(10, 3600))
                .unwrap_or(300),
        })
    }

    pub fn scheduler_tick(&self) -> Duration {
        Duration::from_secs(self.scheduler_tick_seconds)
    }

    pub fn referrer_limits(&self) -> TruncationLimits {
        TruncationLimits {
            max_rows_level0: Some(self.max_rows_referrers),
            max_rows_subtable: Some(self.max_rows_subtable_referrers),
            sort_column: SortColumn::NbVisits,
        }
    }

    pub fn standard_limits(&self) -> TruncationLimits {
        TruncationLimits {
            max_rows_level0: Some(self.max_rows_standard),
            max_rows_subtable: Some(self.max_rows_standard),
            sort_column: SortColumn::NbVisits,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: "./data".to_string(),
            duckdb_memory_limit: "1GB".to_string(),
            max_rows_referrers: 1000,
            max_rows_subtable_referrers: 50,
            max_rows_standard: 500,
            scheduler_tick_seconds: 300,
        }
    }
}
