use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use archivist_server::state::AppState;

/// `archivist health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$ARCHIVIST_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("ARCHIVIST_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("archivist=info".parse()?),
        )
        .json()
        .init();

    let cfg = archivist_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/archivist.db", cfg.data_dir);
    let db = archivist_duckdb::DuckDbBackend::open(&db_path, &cfg.duckdb_memory_limit)?;

    info!(
        max_rows_referrers = cfg.max_rows_referrers,
        max_rows_subtable_referrers = cfg.max_rows_subtable_referrers,
        max_rows_standard = cfg.max_rows_standard,
        "Report row limits"
    );

    let state = Arc::new(AppState::new(db, cfg.clone()));

    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            archivist_server::scheduler::run_scheduler_loop(state).await;
        });
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = archivist_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "Archivist listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
