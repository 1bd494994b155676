use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "day" => Ok(PeriodKind::Day),
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "year" => Ok(PeriodKind::Year),
            other => Err(CoreError::InvalidPeriod(format!(
                "{other:?} (expected one of: day, week, month, year)"
            ))),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar period. Weeks start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    kind: PeriodKind,
    start: NaiveDate,
}

impl Period {
    /// The period of `kind` that contains `date`.
    pub fn new(kind: PeriodKind, date: NaiveDate) -> Self {
        let start = match kind {
            PeriodKind::Day => date,
            PeriodKind::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            PeriodKind::Month => date.with_day(1).unwrap_or(date),
            PeriodKind::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        };
        Self { kind, start }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(PeriodKind::Day, date)
    }

    pub fn parse(kind: &str, date: &str) -> Result<Self, CoreError> {
        let kind = PeriodKind::parse(kind)?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| CoreError::InvalidPeriod(format!("invalid date {date:?}: {e}")))?;
        Ok(Self::new(kind, date))
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period, inclusive.
    pub fn end(&self) -> NaiveDate {
        let months = match self.kind {
            PeriodKind::Day => return self.start,
            PeriodKind::Week => return self.start + Duration::days(6),
            PeriodKind::Month => Months::new(1),
            PeriodKind::Year => Months::new(12),
        };
        self.start
            .checked_add_months(months)
            .map(|next| next - Duration::days(1))
            .unwrap_or(self.start)
    }

    /// `(start, end)`, both inclusive.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Periods whose archives are summed into this one: days for weeks and
    /// months, months for years, nothing for a day.
    pub fn sub_periods(&self) -> Vec<Period> {
        match self.kind {
            PeriodKind::Day => Vec::new(),
            PeriodKind::Week | PeriodKind::Month => {
                let end = self.end();
                self.start
                    .iter_days()
                    .take_while(|day| *day <= end)
                    .map(Period::day)
                    .collect()
            }
            PeriodKind::Year => (0..12)
                .filter_map(|offset| self.start.checked_add_months(Months::new(offset)))
                .map(|month| Period::new(PeriodKind::Month, month))
                .collect(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn week_starts_on_monday() {
        // 2026-01-01 is a Thursday.
        let week = Period::new(PeriodKind::Week, date(2026, 1, 1));
        assert_eq!(week.start(), date(2025, 12, 29));
        assert_eq!(week.end(), date(2026, 1, 4));
        assert_eq!(week.sub_periods().len(), 7);
    }

    #[test]
    fn month_covers_every_day() {
        let feb = Period::new(PeriodKind::Month, date(2024, 2, 17));
        assert_eq!(feb.start(), date(2024, 2, 1));
        assert_eq!(feb.end(), date(2024, 2, 29));
        let days = feb.sub_periods();
        assert_eq!(days.len(), 29);
        assert!(days.iter().all(|p| p.kind() == PeriodKind::Day));
    }

    #[test]
    fn year_is_made_of_months() {
        let year = Period::new(PeriodKind::Year, date(2025, 7, 4));
        assert_eq!(year.start(), date(2025, 1, 1));
        assert_eq!(year.end(), date(2025, 12, 31));
        let months = year.sub_periods();
        assert_eq!(months.len(), 12);
        assert_eq!(months[11].start(), date(2025, 12, 1));
    }

    #[test]
    fn day_has_no_sub_periods() {
        let day = Period::day(date(2025, 3, 9));
        assert_eq!(day.end(), day.start());
        assert!(day.sub_periods().is_empty());
        assert!(day.contains(date(2025, 3, 9)));
    }

    #[test]
    fn parse_rejects_unknown_kinds() {
        assert!(Period::parse("week", "2025-03-09").is_ok());
        assert!(matches!(
            Period::parse("fortnight", "2025-03-09"),
            Err(CoreError::InvalidPeriod(_))
        ));
        assert!(Period::parse("day", "09/03/2025").is_err());
    }
}
