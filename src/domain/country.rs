//! Country code extraction from the upstream geolocation header.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Compiled pattern for ISO 3166-1 alpha-2 style codes.
static COUNTRY_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// A validated two-letter uppercase country code (e.g. `ES`).
///
/// Values only exist after passing [`CountryCode::parse`], so downstream code
/// never sees spoofed or malformed header content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Trims and uppercases `raw`, then accepts exactly two ASCII letters.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(CountryCode::parse(" es ").unwrap().as_str(), "ES");
    /// assert!(CountryCode::parse("ES1").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();

        if COUNTRY_CODE_REGEX.is_match(&normalized) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw code.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Extracts a country code from a raw header value.
///
/// Returns `None` for a missing header and for anything that does not
/// normalize to two uppercase ASCII letters.
pub fn extract(raw: Option<&str>) -> Option<CountryCode> {
    raw.and_then(CountryCode::parse)
}
