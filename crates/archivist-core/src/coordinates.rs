use std::collections::HashMap;

use crate::datatable::DataTable;

/// Decimal places kept when coordinates are attached to city rows.
pub const COORDINATE_PRECISION: i32 = 3;

/// First observed latitude/longitude per city label.
#[derive(Debug, Clone, Default)]
pub struct CityCoordinates {
    by_city: HashMap<String, (f64, f64)>,
}

fn is_valid(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude != 0.0
        && longitude != 0.0
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0
}

fn round(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

impl CityCoordinates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pair for `city` unless one is already known or the pair is
    /// missing, zero or out of range. Returns whether the pair was stored.
    pub fn remember(&mut self, city: &str, latitude: Option<f64>, longitude: Option<f64>) -> bool {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return false;
        };
        if !is_valid(latitude, longitude) || self.by_city.contains_key(city) {
            return false;
        }
        self.by_city.insert(city.to_string(), (latitude, longitude));
        true
    }

    pub fn get(&self, city: &str) -> Option<(f64, f64)> {
        self.by_city.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.by_city.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_city.is_empty()
    }

    /// Attach rounded `lat`/`long` metadata to every city row with a known pair.
    pub fn annotate(&self, table: &mut DataTable) {
        for row in &mut table.rows {
            if let Some((latitude, longitude)) = self.get(&row.label) {
                row.set_metadata("lat", round(latitude));
                row.set_metadata("long", round(longitude));
            }
        }
    }
}
