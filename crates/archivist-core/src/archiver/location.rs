//! Location reports: visits and conversions by country, region and city, with
//! city coordinates attached as row metadata.

use super::{bucket, sum_goal};
use crate::accumulator::LabelTable;
use crate::coordinates::CityCoordinates;
use crate::datatable::{DataTable, TruncationLimits};
use crate::enricher::enrich;
use crate::processor::Processor;
use crate::row::{ConversionRow, Dimension, RowDimensions, VisitRow};
use crate::rollup::archive_data_tables;

/// Label for visits whose location could not be resolved.
pub const UNKNOWN_LOCATION_LABEL: &str = "(unknown)";
/// Joins a region or city with its enclosing region and country.
pub const LOCATION_SEPARATOR: char = '|';

pub const RECORD_COUNTRY: &str = "location_country";
pub const RECORD_REGION: &str = "location_region";
pub const RECORD_CITY: &str = "location_city";
pub const RECORD_DISTINCT_COUNTRIES: &str = "location_distinct_countries";

const DIMENSIONS: [Dimension; 3] = [
    Dimension::LocationCountry,
    Dimension::LocationRegion,
    Dimension::LocationCity,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLabels {
    pub country: String,
    pub region: String,
    pub city: String,
}

fn clean(raw: Option<&str>) -> Option<String> {
    let stripped: String = raw?.chars().filter(|c| *c != LOCATION_SEPARATOR).collect();
    (!stripped.trim().is_empty()).then_some(stripped)
}

/// Report labels for one row. Regions are qualified with their country and
/// cities with region and country so equal names in different places stay
/// apart. Unknown values are not qualified.
pub fn location_labels(dims: &RowDimensions) -> LocationLabels {
    let country = clean(dims.location_country.as_deref());
    let region = clean(dims.location_region.as_deref());
    let city = clean(dims.location_city.as_deref());
    let country_label = country.unwrap_or_else(|| UNKNOWN_LOCATION_LABEL.to_string());
    let sep = LOCATION_SEPARATOR;

    LocationLabels {
        region: match &region {
            Some(region) => format!("{region}{sep}{country_label}"),
            None => UNKNOWN_LOCATION_LABEL.to_string(),
        },
        city: match city {
            Some(city) => format!(
                "{city}{sep}{}{sep}{country_label}",
                region.as_deref().unwrap_or("")
            ),
            None => UNKNOWN_LOCATION_LABEL.to_string(),
        },
        country: country_label,
    }
}

pub struct LocationArchiver<'a, P: Processor + ?Sized> {
    processor: &'a P,
    limits: TruncationLimits,
    by_country: LabelTable,
    by_region: LabelTable,
    by_city: LabelTable,
    coordinates: CityCoordinates,
}

impl<'a, P: Processor + ?Sized> LocationArchiver<'a, P> {
    pub fn new(processor: &'a P, limits: TruncationLimits) -> Self {
        Self {
            processor,
            limits,
            by_country: LabelTable::new(),
            by_region: LabelTable::new(),
            by_city: LabelTable::new(),
            coordinates: CityCoordinates::new(),
        }
    }

    pub fn record_visit(&mut self, row: &VisitRow) {
        let processor = self.processor;
        let labels = location_labels(&row.dimensions);
        bucket(&mut self.by_country, &labels.country, processor).add_visit(&row.metrics);
        bucket(&mut self.by_region, &labels.region, processor).add_visit(&row.metrics);
        bucket(&mut self.by_city, &labels.city, processor).add_visit(&row.metrics);
        if labels.city != UNKNOWN_LOCATION_LABEL {
            self.coordinates
                .remember(&labels.city, row.location_latitude, row.location_longitude);
        }
    }

    pub fn record_conversion(&mut self, row: &ConversionRow) {
        let processor = self.processor;
        let labels = location_labels(&row.dimensions);
        sum_goal(processor, bucket(&mut self.by_country, &labels.country, processor), row);
        sum_goal(processor, bucket(&mut self.by_region, &labels.region, processor), row);
        sum_goal(processor, bucket(&mut self.by_city, &labels.city, processor), row);
    }

    pub fn enrich_with_conversions(&mut self) {
        enrich(&mut self.by_country);
        enrich(&mut self.by_region);
        enrich(&mut self.by_city);
    }

    pub async fn archive_day(mut self) -> anyhow::Result<()> {
        let processor = self.processor;

        if let Some(rows) = processor.query_visit_rows(&DIMENSIONS).await? {
            for row in rows {
                self.record_visit(&row);
            }
        }
        if let Some(rows) = processor.query_conversion_rows(&DIMENSIONS).await? {
            for row in rows {
                self.record_conversion(&row);
            }
            self.enrich_with_conversions();
        }

        tracing::debug!(
            countries = self.by_country.len(),
            regions = self.by_region.len(),
            cities = self.by_city.len(),
            located_cities = self.coordinates.len(),
            "location rows accumulated"
        );

        processor
            .insert_numeric_record(RECORD_DISTINCT_COUNTRIES, self.by_country.len() as u64)
            .await?;

        let countries = DataTable::from_label_table(&self.by_country);
        processor
            .insert_blob_record(
                RECORD_COUNTRY,
                countries.into_blob(&TruncationLimits::unlimited())?,
            )
            .await?;

        let regions = DataTable::from_label_table(&self.by_region);
        processor
            .insert_blob_record(RECORD_REGION, regions.into_blob(&self.limits)?)
            .await?;

        let mut cities = DataTable::from_label_table(&self.by_city);
        self.coordinates.annotate(&mut cities);
        processor
            .insert_blob_record(RECORD_CITY, cities.into_blob(&self.limits)?)
            .await?;
        Ok(())
    }

    pub async fn archive_period(self) -> anyhow::Result<()> {
        let records = [
            (RECORD_COUNTRY, TruncationLimits::unlimited()),
            (RECORD_REGION, self.limits),
            (RECORD_CITY, self.limits),
        ];
        let counts = archive_data_tables(self.processor, &records).await?;
        let countries = counts
            .get(RECORD_COUNTRY)
            .map(|count| count.level0)
            .unwrap_or(0);
        self.processor
            .insert_numeric_record(RECORD_DISTINCT_COUNTRIES, countries as u64)
            .await
    }
}
