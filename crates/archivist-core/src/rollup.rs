//! Period roll-up: sums the tables archived for every sub-period instead of
//! re-reading the raw log.

use std::collections::HashMap;

use anyhow::Context;

use crate::datatable::{sum_tables, DataTable, RowCount, TruncationLimits};
use crate::processor::Processor;

/// Sum of every sub-period blob stored under `name`, and how many sub-periods
/// actually had one.
pub async fn sum_sub_period_tables<P: Processor + ?Sized>(
    processor: &P,
    name: &str,
) -> anyhow::Result<(DataTable, usize)> {
    let mut tables = Vec::new();
    for blob in processor.sub_period_blobs(name).await?.into_iter().flatten() {
        let table = DataTable::from_blob(&blob)
            .with_context(|| format!("decoding sub-period record {name}"))?;
        tables.push(table);
    }
    let found = tables.len();
    Ok((sum_tables(tables), found))
}

/// Roll up each named table, re-truncate it with its limits and store it.
///
/// Returned counts are taken from the summed table before truncation. A name
/// found in no sub-period stores nothing and counts as zero rows.
pub async fn archive_data_tables<P: Processor + ?Sized>(
    processor: &P,
    records: &[(&str, TruncationLimits)],
) -> anyhow::Result<HashMap<String, RowCount>> {
    let mut counts = HashMap::with_capacity(records.len());
    for (name, limits) in records {
        let (table, found) = sum_sub_period_tables(processor, name).await?;
        if found == 0 {
            tracing::debug!(record = %name, "no sub-period holds this record");
            counts.insert(name.to_string(), RowCount::default());
            continue;
        }
        let count = table.row_count();
        processor
            .insert_blob_record(name, table.into_blob(limits)?)
            .await?;
        counts.insert(name.to_string(), count);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::DataRow;
    use crate::metrics::{MetricsRow, VisitMetrics};
    use crate::testing::MemoryProcessor;

    fn blob(rows: &[(&str, u64)]) -> String {
        DataTable {
            rows: rows
                .iter()
                .map(|(label, visits)| {
                    let mut metrics = MetricsRow::default();
                    metrics.add_visit(&VisitMetrics {
                        nb_visits: *visits,
                        nb_actions: *visits * 3,
                        max_actions: *visits,
                        ..VisitMetrics::default()
                    });
                    DataRow::new(*label, metrics)
                })
                .collect(),
            summary_row: None,
        }
        .to_blob()
        .expect("blob")
    }

    #[tokio::test]
    async fn sums_field_wise_and_counts_before_truncation() {
        let processor = MemoryProcessor::default()
            .with_sub_period(&[("t", blob(&[("a", 2), ("b", 1)]))])
            .with_sub_period(&[("t", blob(&[("b", 4), ("c", 1)]))])
            .with_sub_period(&[]);

        let counts = archive_data_tables(&processor, &[("t", TruncationLimits::new(2, 2))])
            .await
            .expect("rollup");
        assert_eq!(counts["t"], RowCount { level0: 3, recursive: 3 });

        let stored = processor.blob_table("t").expect("stored");
        assert_eq!(stored.rows.len(), 1);
        let b = stored.row("b").expect("b");
        assert_eq!(b.metrics.nb_visits, 5);
        assert_eq!(b.metrics.nb_actions, 15);
        assert_eq!(b.metrics.max_actions, 4);
        assert_eq!(
            stored.summary_row.as_ref().map(|r| r.metrics.nb_visits),
            Some(3)
        );
    }

    #[tokio::test]
    async fn missing_record_yields_zero_counts_and_no_blob() {
        let processor = MemoryProcessor::default().with_sub_period(&[]);
        let counts = archive_data_tables(&processor, &[("absent", TruncationLimits::unlimited())])
            .await
            .expect("rollup");
        assert_eq!(counts["absent"], RowCount::default());
        assert!(processor.blob_table("absent").is_none());
    }

    #[tokio::test]
    async fn corrupt_blob_is_an_error() {
        let processor =
            MemoryProcessor::default().with_sub_period(&[("t", "not json".to_string())]);
        let result = archive_data_tables(&processor, &[("t", TruncationLimits::unlimited())]).await;
        assert!(result.is_err());
    }
}
