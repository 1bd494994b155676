use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use archivist_duckdb::DuckDbBackend;

use crate::config::Config;

/// Shared state handed to every Axum handler and the scheduler.
pub struct AppState {
    /// The DuckDB backend. Internally uses `Arc<tokio::sync::Mutex<Connection>>`
    /// so it is already async-safe.
    pub db: Arc<DuckDbBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Last day the scheduler archived for every website. Ticks for the same
    /// day are no-ops.
    pub last_archived_day: Arc<Mutex<Option<NaiveDate>>>,
}

impl AppState {
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            last_archived_day: Arc::new(Mutex::new(None)),
        }
    }
}
