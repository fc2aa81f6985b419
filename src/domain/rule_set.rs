//! Ordered country-to-target rules.

use serde_json::Value;
use tracing::debug;

use crate::domain::country::CountryCode;
use crate::utils::url_normalizer::{self, UrlNormalizationError};

/// Reasons a single rule cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("country code is missing")]
    MissingCountry,

    #[error("redirect URL is missing")]
    MissingUrl,

    #[error("invalid country code '{0}', expected two letters")]
    InvalidCountry(String),

    #[error(transparent)]
    InvalidUrl(#[from] UrlNormalizationError),
}

/// A mapping from one country to a redirect target on the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub country: CountryCode,
    /// URL as stored.
    pub url: String,
    /// Path component of `url` without surrounding slashes; empty means site root.
    pub target_path: String,
}

impl Rule {
    /// Builds a rule from raw country and URL values.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] if either field is empty, the country is not
    /// two letters, or the URL cannot be parsed.
    pub fn new(country: &str, url: &str) -> Result<Self, RuleError> {
        if country.trim().is_empty() {
            return Err(RuleError::MissingCountry);
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(RuleError::MissingUrl);
        }

        let country = CountryCode::parse(country)
            .ok_or_else(|| RuleError::InvalidCountry(country.trim().to_string()))?;
        let target_path = url_normalizer::target_path(url)?;

        Ok(Self {
            country,
            url: url.to_string(),
            target_path,
        })
    }
}

/// Rules in stored order. The first rule for a country wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Builds a rule set from the persisted `rules` value.
    ///
    /// Accepts an array of `{"country": .., "url": ..}` records or an object
    /// mapping country codes to URLs. Malformed entries are dropped; any other
    /// shape yields an empty set.
    pub fn from_stored_config(raw: &Value) -> Self {
        let candidates: Vec<(Option<&str>, Option<&str>)> = match raw {
            Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    (
                        entry.get("country").and_then(Value::as_str),
                        entry.get("url").and_then(Value::as_str),
                    )
                })
                .collect(),
            Value::Object(map) => map
                .iter()
                .map(|(country, url)| (Some(country.as_str()), url.as_str()))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                debug!("Ignoring stored rules of unexpected shape: {}", other);
                Vec::new()
            }
        };

        let rules = candidates
            .into_iter()
            .enumerate()
            .filter_map(|(index, (country, url))| {
                match Rule::new(country.unwrap_or_default(), url.unwrap_or_default()) {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        debug!("Dropping stored rule #{}: {}", index, e);
                        None
                    }
                }
            })
            .collect();

        Self { rules }
    }

    /// Returns the first rule whose country matches, ignoring ASCII case.
    pub fn find_match(&self, country: &CountryCode) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.country.matches(country.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
