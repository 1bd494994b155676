//! [`Processor`] over the DuckDB log and archive tables for one website and
//! one period.

use anyhow::Result;
use duckdb::Row;

use archivist_core::metrics::{EcommerceMetrics, GoalMetrics, VisitMetrics, GOAL_ORDER};
use archivist_core::period::Period;
use archivist_core::processor::{Processor, RowCursor};
use archivist_core::row::{ConversionRow, Dimension, RowDimensions, VisitRow};

use crate::backend::day_bounds;
use crate::DuckDbBackend;

pub struct ArchiveProcessor<'a> {
    db: &'a DuckDbBackend,
    website_id: &'a str,
    period: Period,
}

/// `(select prefix, group by clause, order by clause)` for the dimension columns.
fn dimension_clauses(dimensions: &[Dimension]) -> (String, String, String) {
    if dimensions.is_empty() {
        return (String::new(), String::new(), String::new());
    }
    let columns = dimensions
        .iter()
        .map(|d| d.column_name())
        .collect::<Vec<_>>()
        .join(", ");
    (
        format!("{columns}, "),
        format!("GROUP BY {columns}"),
        format!("ORDER BY {columns}"),
    )
}

fn read_dimensions(row: &Row<'_>, dimensions: &[Dimension]) -> duckdb::Result<RowDimensions> {
    let mut dims = RowDimensions::default();
    for (idx, dimension) in dimensions.iter().enumerate() {
        dims.set(*dimension, row.get::<_, Option<String>>(idx)?);
    }
    Ok(dims)
}

fn count(row: &Row<'_>, idx: usize) -> duckdb::Result<u64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0).max(0) as u64)
}

fn amount(row: &Row<'_>, idx: usize) -> duckdb::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(0.0))
}

impl<'a> ArchiveProcessor<'a> {
    pub fn new(db: &'a DuckDbBackend, website_id: &'a str, period: Period) -> Self {
        Self {
            db,
            website_id,
            period,
        }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    async fn visit_rows(&self, dimensions: &[Dimension]) -> Result<Vec<VisitRow>> {
        let (start, end) = self.period.date_range();
        let (start, end) = day_bounds(start, end);
        let (select_dims, group_by, order_by) = dimension_clauses(dimensions);
        let dim_count = dimensions.len();

        // Per-axis MAX stands in for the group's coordinates. Only read when
        // grouping by city.
        let sql = format!(
            r#"SELECT {select_dims}
                   CAST(COUNT(DISTINCT visitor_id) AS BIGINT),
                   CAST(COUNT(*) AS BIGINT),
                   CAST(SUM(visit_total_actions) AS BIGINT),
                   CAST(MAX(visit_total_actions) AS BIGINT),
                   CAST(SUM(visit_total_time) AS BIGINT),
                   CAST(SUM(CASE WHEN visit_total_actions = 1 THEN 1 ELSE 0 END) AS BIGINT),
                   CAST(SUM(CASE WHEN visit_goal_converted THEN 1 ELSE 0 END) AS BIGINT),
                   MAX(location_latitude),
                   MAX(location_longitude)
               FROM log_visit
               WHERE website_id = ?1
                 AND visit_last_action_time >= CAST(?2 AS TIMESTAMP)
                 AND visit_last_action_time < CAST(?3 AS TIMESTAMP)
               {group_by}
               {order_by}"#
        );

        let conn = self.db.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(duckdb::params![self.website_id, start, end], |row| {
            Ok(VisitRow {
                dimensions: read_dimensions(row, dimensions)?,
                metrics: VisitMetrics {
                    nb_uniq_visitors: count(row, dim_count)?,
                    nb_visits: count(row, dim_count + 1)?,
                    nb_actions: count(row, dim_count + 2)?,
                    max_actions: count(row, dim_count + 3)?,
                    sum_visit_length: count(row, dim_count + 4)?,
                    bounce_count: count(row, dim_count + 5)?,
                    nb_visits_converted: count(row, dim_count + 6)?,
                },
                location_latitude: row.get::<_, Option<f64>>(dim_count + 7)?,
                location_longitude: row.get::<_, Option<f64>>(dim_count + 8)?,
            })
        })?;
        let rows = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        // An empty period still yields one all-zero row when nothing is grouped.
        Ok(rows
            .into_iter()
            .filter(|row| row.metrics.nb_visits > 0)
            .collect())
    }

    async fn conversion_rows(&self, dimensions: &[Dimension]) -> Result<Vec<ConversionRow>> {
        let (start, end) = self.period.date_range();
        let (start, end) = day_bounds(start, end);
        let (select_dims, _, _) = dimension_clauses(dimensions);
        let group_cols = format!("{select_dims}idgoal");
        let dim_count = dimensions.len();

        let sql = format!(
            r#"SELECT {select_dims}
                   idgoal,
                   CAST(COUNT(*) AS BIGINT),
                   CAST(COUNT(DISTINCT idvisit) AS BIGINT),
                   CAST(SUM(revenue) AS DOUBLE),
                   CAST(SUM(COALESCE(revenue_subtotal, 0)) AS DOUBLE),
                   CAST(SUM(COALESCE(revenue_tax, 0)) AS DOUBLE),
                   CAST(SUM(COALESCE(revenue_shipping, 0)) AS DOUBLE),
                   CAST(SUM(COALESCE(revenue_discount, 0)) AS DOUBLE),
                   CAST(SUM(COALESCE(items, 0)) AS BIGINT)
               FROM log_conversion
               WHERE website_id = ?1
                 AND server_time >= CAST(?2 AS TIMESTAMP)
                 AND server_time < CAST(?3 AS TIMESTAMP)
               GROUP BY {group_cols}
               ORDER BY {group_cols}"#
        );

        let conn = self.db.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(duckdb::params![self.website_id, start, end], |row| {
            let idgoal: i64 = row.get(dim_count)?;
            let ecommerce = if idgoal <= GOAL_ORDER {
                Some(EcommerceMetrics {
                    revenue_subtotal: amount(row, dim_count + 4)?,
                    revenue_tax: amount(row, dim_count + 5)?,
                    revenue_shipping: amount(row, dim_count + 6)?,
                    revenue_discount: amount(row, dim_count + 7)?,
                    items: count(row, dim_count + 8)?,
                })
            } else {
                None
            };
            Ok(ConversionRow {
                dimensions: read_dimensions(row, dimensions)?,
                idgoal,
                metrics: GoalMetrics {
                    nb_conversions: count(row, dim_count + 1)?,
                    nb_visits_converted: count(row, dim_count + 2)?,
                    revenue: amount(row, dim_count + 3)?,
                    ecommerce,
                },
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[async_trait::async_trait]
impl Processor for ArchiveProcessor<'_> {
    async fn query_visit_rows(
        &self,
        dimensions: &[Dimension],
    ) -> Result<Option<RowCursor<VisitRow>>> {
        let rows = self.visit_rows(dimensions).await?;
        tracing::debug!(
            website_id = %self.website_id,
            period = %self.period,
            rows = rows.len(),
            "visit rows grouped"
        );
        Ok(Some(Box::new(rows.into_iter())))
    }

    async fn query_conversion_rows(
        &self,
        dimensions: &[Dimension],
    ) -> Result<Option<RowCursor<ConversionRow>>> {
        let rows = self.conversion_rows(dimensions).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(Box::new(rows.into_iter())))
    }

    async fn insert_numeric_record(&self, name: &str, value: u64) -> Result<()> {
        self.db
            .insert_numeric_record(self.website_id, &self.period, name, value)
            .await
    }

    async fn insert_blob_record(&self, name: &str, blob: String) -> Result<()> {
        self.db
            .insert_blob_record(self.website_id, &self.period, name, &blob)
            .await
    }

    async fn sub_period_blobs(&self, name: &str) -> Result<Vec<Option<String>>> {
        let mut blobs = Vec::new();
        for sub_period in self.period.sub_periods() {
            blobs.push(
                self.db
                    .get_blob_record(self.website_id, &sub_period, name)
                    .await?,
            );
        }
        Ok(blobs)
    }
}
