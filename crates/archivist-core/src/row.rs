//! Grouped rows handed to the archivers by a [`Processor`](crate::processor::Processor).

use serde::{Deserialize, Serialize};

use crate::metrics::{GoalMetrics, VisitMetrics};

/// Categorical log columns a report can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    RefererType,
    RefererName,
    RefererKeyword,
    RefererUrl,
    LocationCountry,
    LocationRegion,
    LocationCity,
}

impl Dimension {
    pub const fn column_name(self) -> &'static str {
        match self {
            Dimension::RefererType => "referer_type",
            Dimension::RefererName => "referer_name",
            Dimension::RefererKeyword => "referer_keyword",
            Dimension::RefererUrl => "referer_url",
            Dimension::LocationCountry => "location_country",
            Dimension::LocationRegion => "location_region",
            Dimension::LocationCity => "location_city",
        }
    }
}

/// Values of the grouped dimensions. Dimensions that were not requested stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDimensions {
    pub referer_type: Option<String>,
    pub referer_name: Option<String>,
    pub referer_keyword: Option<String>,
    pub referer_url: Option<String>,
    pub location_country: Option<String>,
    pub location_region: Option<String>,
    pub location_city: Option<String>,
}

impl RowDimensions {
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::RefererType => self.referer_type.as_deref(),
            Dimension::RefererName => self.referer_name.as_deref(),
            Dimension::RefererKeyword => self.referer_keyword.as_deref(),
            Dimension::RefererUrl => self.referer_url.as_deref(),
            Dimension::LocationCountry => self.location_country.as_deref(),
            Dimension::LocationRegion => self.location_region.as_deref(),
            Dimension::LocationCity => self.location_city.as_deref(),
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: Option<String>) {
        let slot = match dimension {
            Dimension::RefererType => &mut self.referer_type,
            Dimension::RefererName => &mut self.referer_name,
            Dimension::RefererKeyword => &mut self.referer_keyword,
            Dimension::RefererUrl => &mut self.referer_url,
            Dimension::LocationCountry => &mut self.location_country,
            Dimension::LocationRegion => &mut self.location_region,
            Dimension::LocationCity => &mut self.location_city,
        };
        *slot = value;
    }
}

/// Visits sharing one combination of dimension values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitRow {
    pub dimensions: RowDimensions,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
    pub metrics: VisitMetrics,
}

/// Conversions of one goal sharing one combination of dimension values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionRow {
    pub dimensions: RowDimensions,
    pub idgoal: i64,
    pub metrics: GoalMetrics,
}
