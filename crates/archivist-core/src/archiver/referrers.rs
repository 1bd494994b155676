//! Referrer reports: visits and conversions broken down by referrer type,
//! search engine, keyword, website and campaign.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use super::{bucket, cell, non_empty, sum_goal};
use crate::accumulator::{LabelTable, PivotTable};
use crate::datatable::{DataTable, TruncationLimits};
use crate::enricher::{enrich, enrich_pivot};
use crate::error::CoreError;
use crate::processor::Processor;
use crate::referer::RefererType;
use crate::row::{ConversionRow, Dimension, VisitRow};
use crate::rollup::archive_data_tables;

/// Label used when a search keyword, referrer name or URL is missing.
pub const LABEL_NOT_DEFINED: &str = "(not defined)";

pub const RECORD_TYPE: &str = "referrers_type";
pub const RECORD_KEYWORD_BY_SEARCH_ENGINE: &str = "referrers_keyword_by_search_engine";
pub const RECORD_SEARCH_ENGINE_BY_KEYWORD: &str = "referrers_search_engine_by_keyword";
pub const RECORD_KEYWORD_BY_CAMPAIGN: &str = "referrers_keyword_by_campaign";
pub const RECORD_URL_BY_WEBSITE: &str = "referrers_url_by_website";

pub const RECORD_DISTINCT_SEARCH_ENGINES: &str = "referrers_distinct_search_engines";
pub const RECORD_DISTINCT_KEYWORDS: &str = "referrers_distinct_keywords";
pub const RECORD_DISTINCT_CAMPAIGNS: &str = "referrers_distinct_campaigns";
pub const RECORD_DISTINCT_WEBSITES: &str = "referrers_distinct_websites";
pub const RECORD_DISTINCT_WEBSITE_URLS: &str = "referrers_distinct_website_urls";

const VISIT_DIMENSIONS: [Dimension; 4] = [
    Dimension::RefererType,
    Dimension::RefererName,
    Dimension::RefererKeyword,
    Dimension::RefererUrl,
];

const CONVERSION_DIMENSIONS: [Dimension; 3] = [
    Dimension::RefererType,
    Dimension::RefererName,
    Dimension::RefererKeyword,
];

fn label_or_not_defined(raw: Option<&str>) -> &str {
    non_empty(raw).unwrap_or(LABEL_NOT_DEFINED)
}

/// Short content fingerprint of a referrer URL: 10 hex chars of SHA-256.
pub fn url_fingerprint(url: &str) -> String {
    let hash = Sha256::digest(url.as_bytes());
    hex::encode(&hash[..5])
}

pub struct ReferrersArchiver<'a, P: Processor + ?Sized> {
    processor: &'a P,
    limits: TruncationLimits,
    by_type: LabelTable,
    by_search_engine: LabelTable,
    by_keyword: LabelTable,
    /// search engine -> keyword
    keyword_by_search_engine: PivotTable,
    /// keyword -> search engine
    search_engine_by_keyword: PivotTable,
    by_website: LabelTable,
    url_by_website: PivotTable,
    by_campaign: LabelTable,
    keyword_by_campaign: PivotTable,
    distinct_urls: HashSet<String>,
}

impl<'a, P: Processor + ?Sized> ReferrersArchiver<'a, P> {
    pub fn new(processor: &'a P, limits: TruncationLimits) -> Self {
        Self {
            processor,
            limits,
            by_type: LabelTable::new(),
            by_search_engine: LabelTable::new(),
            by_keyword: LabelTable::new(),
            keyword_by_search_engine: LabelTable::new(),
            search_engine_by_keyword: LabelTable::new(),
            by_website: LabelTable::new(),
            url_by_website: LabelTable::new(),
            by_campaign: LabelTable::new(),
            keyword_by_campaign: LabelTable::new(),
            distinct_urls: HashSet::new(),
        }
    }

    /// Accumulate one grouped visit row. An unrecognized referrer type means
    /// the log is corrupt and aborts the pass.
    pub fn record_visit(&mut self, row: &VisitRow) -> Result<(), CoreError> {
        let processor = self.processor;
        let dims = &row.dimensions;
        let kind = RefererType::classify(dims.referer_type.as_deref())
            .map_err(CoreError::UnexpectedRefererType)?;

        bucket(&mut self.by_type, kind.as_str(), processor).add_visit(&row.metrics);

        match kind {
            RefererType::SearchEngine => {
                let engine = label_or_not_defined(dims.referer_name.as_deref());
                let keyword = label_or_not_defined(dims.referer_keyword.as_deref());
                bucket(&mut self.by_search_engine, engine, processor).add_visit(&row.metrics);
                bucket(&mut self.by_keyword, keyword, processor).add_visit(&row.metrics);
                cell(&mut self.keyword_by_search_engine, engine, keyword, processor)
                    .add_visit(&row.metrics);
                cell(&mut self.search_engine_by_keyword, keyword, engine, processor)
                    .add_visit(&row.metrics);
            }
            RefererType::Website => {
                let website = label_or_not_defined(dims.referer_name.as_deref());
                let url = label_or_not_defined(dims.referer_url.as_deref());
                bucket(&mut self.by_website, website, processor).add_visit(&row.metrics);
                cell(&mut self.url_by_website, website, url, processor).add_visit(&row.metrics);
                self.distinct_urls.insert(url_fingerprint(url));
            }
            RefererType::Campaign => {
                let campaign = label_or_not_defined(dims.referer_name.as_deref());
                bucket(&mut self.by_campaign, campaign, processor).add_visit(&row.metrics);
                if let Some(keyword) = non_empty(dims.referer_keyword.as_deref()) {
                    cell(&mut self.keyword_by_campaign, campaign, keyword, processor)
                        .add_visit(&row.metrics);
                }
            }
            RefererType::DirectEntry => {}
        }
        Ok(())
    }

    /// Accumulate one grouped conversion row. The referrer type of a
    /// conversion can come from the client, so unknown types are skipped.
    pub fn record_conversion(&mut self, row: &ConversionRow) {
        let processor = self.processor;
        let dims = &row.dimensions;
        let kind = match RefererType::classify(dims.referer_type.as_deref()) {
            Ok(kind) => kind,
            Err(raw) => {
                tracing::debug!(referer_type = %raw, idgoal = row.idgoal, "skipping conversion with unknown referrer type");
                return;
            }
        };

        sum_goal(processor, bucket(&mut self.by_type, kind.as_str(), processor), row);

        match kind {
            RefererType::SearchEngine => {
                let engine = label_or_not_defined(dims.referer_name.as_deref());
                let keyword = label_or_not_defined(dims.referer_keyword.as_deref());
                sum_goal(processor, bucket(&mut self.by_search_engine, engine, processor), row);
                sum_goal(processor, bucket(&mut self.by_keyword, keyword, processor), row);
            }
            RefererType::Website => {
                let website = label_or_not_defined(dims.referer_name.as_deref());
                sum_goal(processor, bucket(&mut self.by_website, website, processor), row);
            }
            RefererType::Campaign => {
                let campaign = label_or_not_defined(dims.referer_name.as_deref());
                sum_goal(processor, bucket(&mut self.by_campaign, campaign, processor), row);
                if let Some(keyword) = non_empty(dims.referer_keyword.as_deref()) {
                    sum_goal(
                        processor,
                        cell(&mut self.keyword_by_campaign, campaign, keyword, processor),
                        row,
                    );
                }
            }
            RefererType::DirectEntry => {}
        }
    }

    pub fn enrich_with_conversions(&mut self) {
        enrich(&mut self.by_type);
        enrich(&mut self.by_search_engine);
        enrich(&mut self.by_keyword);
        enrich(&mut self.by_website);
        enrich(&mut self.by_campaign);
        enrich_pivot(&mut self.keyword_by_campaign);
    }

    /// Read the day's visits and conversions and store every referrer record.
    pub async fn archive_day(mut self) -> anyhow::Result<()> {
        let processor = self.processor;

        let mut visit_rows = 0usize;
        if let Some(rows) = processor.query_visit_rows(&VISIT_DIMENSIONS).await? {
            for row in rows {
                self.record_visit(&row)?;
                visit_rows += 1;
            }
        }

        let mut conversion_rows = 0usize;
        if let Some(rows) = processor.query_conversion_rows(&CONVERSION_DIMENSIONS).await? {
            for row in rows {
                self.record_conversion(&row);
                conversion_rows += 1;
            }
            self.enrich_with_conversions();
        }

        tracing::debug!(
            visit_rows,
            conversion_rows,
            search_engines = self.keyword_by_search_engine.len(),
            websites = self.by_website.len(),
            campaigns = self.by_campaign.len(),
            "referrer rows accumulated"
        );

        let numerics = [
            (RECORD_DISTINCT_SEARCH_ENGINES, self.keyword_by_search_engine.len()),
            (RECORD_DISTINCT_KEYWORDS, self.search_engine_by_keyword.len()),
            (RECORD_DISTINCT_CAMPAIGNS, self.by_campaign.len()),
            (RECORD_DISTINCT_WEBSITES, self.by_website.len()),
            (RECORD_DISTINCT_WEBSITE_URLS, self.distinct_urls.len()),
        ];
        for (name, value) in numerics {
            processor.insert_numeric_record(name, value as u64).await?;
        }

        let by_type = DataTable::from_label_table(&self.by_type);
        processor
            .insert_blob_record(RECORD_TYPE, by_type.into_blob(&TruncationLimits::unlimited())?)
            .await?;

        let pivots = [
            (
                RECORD_KEYWORD_BY_SEARCH_ENGINE,
                DataTable::with_subtables(&self.by_search_engine, &self.keyword_by_search_engine),
            ),
            (
                RECORD_SEARCH_ENGINE_BY_KEYWORD,
                DataTable::with_subtables(&self.by_keyword, &self.search_engine_by_keyword),
            ),
            (
                RECORD_KEYWORD_BY_CAMPAIGN,
                DataTable::with_subtables(&self.by_campaign, &self.keyword_by_campaign),
            ),
            (
                RECORD_URL_BY_WEBSITE,
                DataTable::with_subtables(&self.by_website, &self.url_by_website),
            ),
        ];
        for (name, table) in pivots {
            processor
                .insert_blob_record(name, table.into_blob(&self.limits)?)
                .await?;
        }
        Ok(())
    }

    /// Sum the sub-period records and store the period's referrer records.
    pub async fn archive_period(self) -> anyhow::Result<()> {
        let processor = self.processor;
        let records = [
            (RECORD_TYPE, self.limits),
            (RECORD_KEYWORD_BY_SEARCH_ENGINE, self.limits),
            (RECORD_SEARCH_ENGINE_BY_KEYWORD, self.limits),
            (RECORD_KEYWORD_BY_CAMPAIGN, self.limits),
            (RECORD_URL_BY_WEBSITE, self.limits),
        ];
        let counts = archive_data_tables(processor, &records).await?;
        let count = |name: &str| counts.get(name).copied().unwrap_or_default();

        let urls = count(RECORD_URL_BY_WEBSITE);
        let numerics = [
            (RECORD_DISTINCT_SEARCH_ENGINES, count(RECORD_KEYWORD_BY_SEARCH_ENGINE).level0),
            (RECORD_DISTINCT_KEYWORDS, count(RECORD_SEARCH_ENGINE_BY_KEYWORD).level0),
            (RECORD_DISTINCT_CAMPAIGNS, count(RECORD_KEYWORD_BY_CAMPAIGN).level0),
            (RECORD_DISTINCT_WEBSITES, urls.level0),
            (RECORD_DISTINCT_WEBSITE_URLS, urls.recursive - urls.level0),
        ];
        for (name, value) in numerics {
            processor.insert_numeric_record(name, value as u64).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{GoalMetrics, VisitMetrics, GOAL_CART};
    use crate::row::RowDimensions;
    use crate::testing::MemoryProcessor;

    fn visit(kind: &str, name: &str, keyword: &str, url: &str, nb_visits: u64) -> VisitRow {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        VisitRow {
            dimensions: RowDimensions {
                referer_type: opt(kind),
                referer_name: opt(name),
                referer_keyword: opt(keyword),
                referer_url: opt(url),
                ..RowDimensions::default()
            },
            metrics: VisitMetrics {
                nb_uniq_visitors: nb_visits,
                nb_visits,
                nb_actions: nb_visits * 2,
                max_actions: 4,
                sum_visit_length: nb_visits * 60,
                bounce_count: 1,
                nb_visits_converted: 0,
            },
            ..VisitRow::default()
        }
    }

    fn conversion(kind: &str, name: &str, keyword: &str, idgoal: i64, revenue: f64) -> ConversionRow {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ConversionRow {
            dimensions: RowDimensions {
                referer_type: opt(kind),
                referer_name: opt(name),
                referer_keyword: opt(keyword),
                ..RowDimensions::default()
            },
            idgoal,
            metrics: GoalMetrics {
                nb_conversions: 1,
                nb_visits_converted: 1,
                revenue,
                ..GoalMetrics::for_goal(idgoal)
            },
        }
    }

    fn sample_visits() -> Vec<VisitRow> {
        vec![
            visit("search_engine", "Google", "rust traits", "", 5),
            visit("search_engine", "Google", "", "", 2),
            visit("search_engine", "Bing", "rust traits", "", 1),
            visit("website", "blog.example.org", "", "https://blog.example.org/a", 3),
            visit("website", "blog.example.org", "", "https://blog.example.org/b", 1),
            visit("website", "news.example.com", "", "https://news.example.com/", 2),
            visit("campaign", "spring-sale", "shoes", "", 4),
            visit("campaign", "newsletter", "", "", 6),
            visit("", "", "", "", 7),
        ]
    }

    fn visits_of(table: &DataTable) -> u64 {
        table
            .rows
            .iter()
            .chain(table.summary_row.as_deref())
            .map(|row| row.metrics.nb_visits)
            .sum()
    }

    #[test]
    fn type_totals_match_branch_totals() {
        let processor = MemoryProcessor::default();
        let mut archiver = ReferrersArchiver::new(&processor, TruncationLimits::unlimited());
        for row in sample_visits() {
            archiver.record_visit(&row).expect("known type");
        }
        let type_visits = |kind: RefererType| {
            archiver
                .by_type
                .get(kind.as_str())
                .map(|m| m.nb_visits)
                .unwrap_or(0)
        };
        let sum = |table: &LabelTable| table.iter().map(|(_, m)| m.nb_visits).sum::<u64>();

        assert_eq!(type_visits(RefererType::SearchEngine), sum(&archiver.by_search_engine));
        assert_eq!(type_visits(RefererType::SearchEngine), sum(&archiver.by_keyword));
        assert_eq!(type_visits(RefererType::Website), sum(&archiver.by_website));
        assert_eq!(type_visits(RefererType::Campaign), sum(&archiver.by_campaign));
        assert_eq!(type_visits(RefererType::DirectEntry), 7);
        assert_eq!(sum(&archiver.by_type), 31);
    }

    #[test]
    fn empty_keyword_gets_placeholder_label() {
        let processor = MemoryProcessor::default();
        let mut archiver = ReferrersArchiver::new(&processor, TruncationLimits::unlimited());
        archiver
            .record_visit(&visit("search_engine", "Google", "", "", 2))
            .expect("known type");
        archiver
            .record_visit(&visit("search_engine", "Google", "  ", "", 1))
            .expect("known type");

        assert_eq!(
            archiver.by_keyword.get(LABEL_NOT_DEFINED).map(|m| m.nb_visits),
            Some(3)
        );
        let google = archiver.keyword_by_search_engine.get("Google").expect("engine");
        assert_eq!(google.labels().collect::<Vec<_>>(), vec![LABEL_NOT_DEFINED]);
    }

    #[test]
    fn keywords_differing_in_whitespace_stay_distinct() {
        let processor = MemoryProcessor::default();
        let mut archiver = ReferrersArchiver::new(&processor, TruncationLimits::unlimited());
        archiver
            .record_visit(&visit("search_engine", "Google", "rust", "", 1))
            .expect("known type");
        archiver
            .record_visit(&visit("search_engine", "Google", "rust ", "", 1))
            .expect("known type");

        assert_eq!(archiver.by_keyword.len(), 2);
        assert_eq!(archiver.search_engine_by_keyword.len(), 2);
        assert_eq!(archiver.by_keyword.get("rust ").map(|m| m.nb_visits), Some(1));
    }

    #[test]
    fn unknown_visit_type_is_fatal() {
        let processor = MemoryProcessor::default();
        let mut archiver = ReferrersArchiver::new(&processor, TruncationLimits::unlimited());
        let err = archiver
            .record_visit(&visit("bogus", "x", "", "", 1))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::UnexpectedRefererType(raw) if raw == "bogus"));
    }

    #[test]
    fn unknown_conversion_type_is_skipped() {
        let processor = MemoryProcessor::default();
        let mut archiver = ReferrersArchiver::new(&processor, TruncationLimits::unlimited());
        archiver.record_conversion(&conversion("bogus", "x", "", 1, 10.0));
        assert!(archiver.by_type.is_empty());

        archiver.record_conversion(&conversion("campaign", "spring-sale", "shoes", 1, 10.0));
        assert_eq!(archiver.by_type.len(), 1);
        assert_eq!(archiver.keyword_by_campaign.cell_count(), 1);
    }

    #[tokio::test]
    async fn archive_day_writes_exact_distinct_counts() {
        let processor = MemoryProcessor::with_visits(sample_visits());
        ReferrersArchiver::new(&processor, TruncationLimits::new(1000, 50))
            .archive_day()
            .await
            .expect("archive");

        assert_eq!(processor.numeric(RECORD_DISTINCT_SEARCH_ENGINES), Some(2));
        // "rust traits" and the placeholder.
        assert_eq!(processor.numeric(RECORD_DISTINCT_KEYWORDS), Some(2));
        assert_eq!(processor.numeric(RECORD_DISTINCT_CAMPAIGNS), Some(2));
        assert_eq!(processor.numeric(RECORD_DISTINCT_WEBSITES), Some(2));
        assert_eq!(processor.numeric(RECORD_DISTINCT_WEBSITE_URLS), Some(3));

        let by_type = processor.blob_table(RECORD_TYPE).expect("type blob");
        assert_eq!(by_type.rows_count(), 4);
        assert_eq!(visits_of(&by_type), 31);

        // Campaign without keyword has a row but no subtable entry.
        let campaigns = processor.blob_table(RECORD_KEYWORD_BY_CAMPAIGN).expect("campaign blob");
        assert!(campaigns.row("newsletter").is_some_and(|r| r.subtable.is_none()));
        assert_eq!(
            campaigns
                .row("spring-sale")
                .and_then(|r| r.subtable.as_ref())
                .map(DataTable::rows_count),
            Some(1)
        );
    }

    #[tokio::test]
    async fn conversions_are_enriched_per_table() {
        let processor = MemoryProcessor::with_visits(sample_visits()).with_conversions(vec![
            conversion("search_engine", "Google", "rust traits", 1, 20.0),
            conversion("search_engine", "Google", "rust traits", GOAL_CART, 99.0),
            conversion("campaign", "spring-sale", "shoes", 2, 5.0),
            conversion("bogus", "Google", "", 1, 1000.0),
        ]);
        ReferrersArchiver::new(&processor, TruncationLimits::new(1000, 50))
            .archive_day()
            .await
            .expect("archive");

        let by_type = processor.blob_table(RECORD_TYPE).expect("type blob");
        let search = by_type.row("search_engine").expect("search row");
        assert_eq!(search.metrics.nb_conversions, Some(1));
        assert_eq!(search.metrics.revenue, Some(20.0));
        assert_eq!(search.metrics.nb_visits_converted, None);
        assert_eq!(search.metrics.goals.len(), 2);
        let direct = by_type.row("direct_entry").expect("direct row");
        assert_eq!(direct.metrics.nb_conversions, None);
        assert_eq!(direct.metrics.nb_visits_converted, Some(0));

        let campaigns = processor.blob_table(RECORD_KEYWORD_BY_CAMPAIGN).expect("campaign blob");
        let shoes = campaigns
            .row("spring-sale")
            .and_then(|r| r.subtable.as_ref())
            .and_then(|t| t.row("shoes"))
            .expect("shoes");
        assert_eq!(shoes.metrics.revenue, Some(5.0));
    }

    #[tokio::test]
    async fn visit_order_does_not_change_records() {
        let forward = MemoryProcessor::with_visits(sample_visits());
        let mut reversed_rows = sample_visits();
        reversed_rows.reverse();
        let reversed = MemoryProcessor::with_visits(reversed_rows);
        for processor in [&forward, &reversed] {
            ReferrersArchiver::new(processor, TruncationLimits::new(1000, 50))
                .archive_day()
                .await
                .expect("archive");
        }

        for name in [
            RECORD_DISTINCT_SEARCH_ENGINES,
            RECORD_DISTINCT_KEYWORDS,
            RECORD_DISTINCT_CAMPAIGNS,
            RECORD_DISTINCT_WEBSITES,
            RECORD_DISTINCT_WEBSITE_URLS,
        ] {
            assert_eq!(forward.numeric(name), reversed.numeric(name), "{name}");
        }
        let a = forward.blob_table(RECORD_TYPE).expect("blob");
        let b = reversed.blob_table(RECORD_TYPE).expect("blob");
        for row in &a.rows {
            assert_eq!(Some(&row.metrics), b.row(&row.label).map(|r| &r.metrics));
        }
        // Sorted tables have no ties in this sample, so order matches too.
        assert_eq!(
            forward.blob(RECORD_URL_BY_WEBSITE),
            reversed.blob(RECORD_URL_BY_WEBSITE)
        );
    }

    #[tokio::test]
    async fn pivot_blobs_are_truncated_with_referrer_limits() {
        let visits = (1..=6)
            .map(|n| visit("website", &format!("site{n}.example"), "", &format!("https://site{n}.example/"), n))
            .collect();
        let processor = MemoryProcessor::with_visits(visits);
        ReferrersArchiver::new(&processor, TruncationLimits::new(3, 50))
            .archive_day()
            .await
            .expect("archive");

        assert_eq!(processor.numeric(RECORD_DISTINCT_WEBSITES), Some(6));
        let sites = processor.blob_table(RECORD_URL_BY_WEBSITE).expect("blob");
        let labels: Vec<&str> = sites.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["site6.example", "site5.example"]);
        assert_eq!(sites.summary_row.as_ref().map(|r| r.metrics.nb_visits), Some(10));
    }

    #[tokio::test]
    async fn archive_period_sums_days_and_recounts() {
        let day1 = MemoryProcessor::with_visits(vec![
            visit("search_engine", "Google", "rust", "", 2),
            visit("website", "blog.example.org", "", "https://blog.example.org/a", 1),
        ]);
        let day2 = MemoryProcessor::with_visits(vec![
            visit("search_engine", "Google", "rust", "", 3),
            visit("search_engine", "DuckDuckGo", "cargo", "", 1),
            visit("website", "blog.example.org", "", "https://blog.example.org/b", 4),
        ]);
        for day in [&day1, &day2] {
            ReferrersArchiver::new(day, TruncationLimits::new(1000, 50))
                .archive_day()
                .await
                .expect("archive day");
        }

        let week = MemoryProcessor::default()
            .with_archived_sub_period(&day1)
            .with_archived_sub_period(&day2);
        ReferrersArchiver::new(&week, TruncationLimits::new(1000, 50))
            .archive_period()
            .await
            .expect("archive period");

        assert_eq!(week.numeric(RECORD_DISTINCT_SEARCH_ENGINES), Some(2));
        assert_eq!(week.numeric(RECORD_DISTINCT_KEYWORDS), Some(2));
        assert_eq!(week.numeric(RECORD_DISTINCT_WEBSITES), Some(1));
        assert_eq!(week.numeric(RECORD_DISTINCT_WEBSITE_URLS), Some(2));
        assert_eq!(week.numeric(RECORD_DISTINCT_CAMPAIGNS), Some(0));

        let by_type = week.blob_table(RECORD_TYPE).expect("type blob");
        let search = by_type.row("search_engine").expect("search");
        assert_eq!(search.metrics.nb_visits, 6);
        assert_eq!(search.metrics.nb_actions, 12);
        assert_eq!(search.metrics.max_actions, 4);
        let engines = week.blob_table(RECORD_KEYWORD_BY_SEARCH_ENGINE).expect("engines");
        assert_eq!(engines.row("Google").map(|r| r.metrics.nb_visits), Some(5));
    }

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = url_fingerprint("https://blog.example.org/a");
        assert_eq!(a.len(), 10);
        assert_eq!(a, url_fingerprint("https://blog.example.org/a"));
        assert_ne!(a, url_fingerprint("https://blog.example.org/b"));
    }
}
