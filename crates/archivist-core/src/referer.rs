use serde::{Deserialize, Serialize};

/// Closed set of referrer types a visit can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefererType {
    DirectEntry,
    SearchEngine,
    Website,
    Campaign,
}

impl RefererType {
    pub const ALL: [RefererType; 4] = [
        RefererType::DirectEntry,
        RefererType::SearchEngine,
        RefererType::Website,
        RefererType::Campaign,
    ];

    /// Label used for this type in the by-type report.
    pub const fn as_str(self) -> &'static str {
        match self {
            RefererType::DirectEntry => "direct_entry",
            RefererType::SearchEngine => "search_engine",
            RefererType::Website => "website",
            RefererType::Campaign => "campaign",
        }
    }

    /// Numeric code stored by the tracker.
    pub const fn code(self) -> u8 {
        match self {
            RefererType::DirectEntry => 1,
            RefererType::SearchEngine => 2,
            RefererType::Website => 3,
            RefererType::Campaign => 6,
        }
    }

    /// Classify a raw referrer type, accepting either the numeric code or the
    /// snake_case name. Missing, blank and `"0"` values mean direct entry.
    ///
    /// Returns the unrecognized raw value as the error so callers can decide
    /// whether it is fatal.
    pub fn classify(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim).unwrap_or("") {
            "" | "0" | "1" | "direct_entry" => Ok(RefererType::DirectEntry),
            "2" | "search_engine" => Ok(RefererType::SearchEngine),
            "3" | "website" => Ok(RefererType::Website),
            "6" | "campaign" => Ok(RefererType::Campaign),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_type_is_direct_entry() {
        assert_eq!(RefererType::classify(None), Ok(RefererType::DirectEntry));
        assert_eq!(RefererType::classify(Some("")), Ok(RefererType::DirectEntry));
        assert_eq!(RefererType::classify(Some("  ")), Ok(RefererType::DirectEntry));
        assert_eq!(RefererType::classify(Some("0")), Ok(RefererType::DirectEntry));
    }

    #[test]
    fn codes_and_names_round_trip() {
        for t in RefererType::ALL {
            assert_eq!(RefererType::classify(Some(t.as_str())), Ok(t));
            assert_eq!(RefererType::classify(Some(&t.code().to_string())), Ok(t));
        }
    }

    #[test]
    fn unknown_type_is_reported() {
        assert_eq!(RefererType::classify(Some("bogus")), Err("bogus".to_string()));
        assert_eq!(RefererType::classify(Some("4")), Err("4".to_string()));
    }
}
