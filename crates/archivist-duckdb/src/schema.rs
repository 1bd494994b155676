/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// Every statement uses `IF NOT EXISTS`, so it is safe to re-run on each
/// startup.
///
/// `memory_limit` comes from `Config.duckdb_memory_limit`
/// (env `ARCHIVIST_DUCKDB_MEMORY`, default `"1GB"`). Always set an explicit
/// limit: the DuckDB default (80% of system RAM) is not acceptable for a
/// server process. `SET threads = 2` keeps the background pool small for
/// single-writer embedded use.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- RAW LOG
-- ===========================================
-- referer_type holds either the tracker's numeric code or its snake_case
-- name. NULL and '' mean direct entry.
CREATE TABLE IF NOT EXISTS log_visit (
    idvisit                 VARCHAR PRIMARY KEY,
    website_id              VARCHAR NOT NULL,
    visitor_id              VARCHAR NOT NULL,
    visit_last_action_time  TIMESTAMP NOT NULL,
    visit_total_actions     INTEGER NOT NULL DEFAULT 0,
    visit_total_time        INTEGER NOT NULL DEFAULT 0,
    visit_goal_converted    BOOLEAN NOT NULL DEFAULT FALSE,
    referer_type            VARCHAR,
    referer_name            VARCHAR,
    referer_keyword         VARCHAR,
    referer_url             VARCHAR,
    location_country        VARCHAR,
    location_region         VARCHAR,
    location_city           VARCHAR,
    location_latitude       DOUBLE,
    location_longitude      DOUBLE
);
CREATE INDEX IF NOT EXISTS idx_log_visit_site_time
    ON log_visit(website_id, visit_last_action_time);

-- idgoal 0 is an ecommerce order, -1 an abandoned cart.
CREATE TABLE IF NOT EXISTS log_conversion (
    idvisit                 VARCHAR NOT NULL,
    website_id              VARCHAR NOT NULL,
    idgoal                  BIGINT NOT NULL,
    server_time             TIMESTAMP NOT NULL,
    revenue                 DOUBLE NOT NULL DEFAULT 0,
    revenue_subtotal        DOUBLE,
    revenue_tax             DOUBLE,
    revenue_shipping        DOUBLE,
    revenue_discount        DOUBLE,
    items                   INTEGER,
    referer_type            VARCHAR,
    referer_name            VARCHAR,
    referer_keyword         VARCHAR,
    location_country        VARCHAR,
    location_region         VARCHAR,
    location_city           VARCHAR
);
CREATE INDEX IF NOT EXISTS idx_log_conversion_site_time
    ON log_conversion(website_id, server_time);

-- ===========================================
-- ARCHIVES
-- ===========================================
-- One row per (website, period, start date, record name). date2 is the
-- inclusive end of the period.
CREATE TABLE IF NOT EXISTS archive_numeric (
    website_id      VARCHAR NOT NULL,
    period          VARCHAR NOT NULL,
    date1           DATE NOT NULL,
    date2           DATE NOT NULL,
    name            VARCHAR NOT NULL,
    value           BIGINT NOT NULL,
    ts_archived     TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (website_id, period, date1, name)
);

-- value is a JSON-serialized report table.
CREATE TABLE IF NOT EXISTS archive_blob (
    website_id      VARCHAR NOT NULL,
    period          VARCHAR NOT NULL,
    date1           DATE NOT NULL,
    date2           DATE NOT NULL,
    name            VARCHAR NOT NULL,
    value           VARCHAR NOT NULL,
    ts_archived     TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (website_id, period, date1, name)
);
"#
    )
}
