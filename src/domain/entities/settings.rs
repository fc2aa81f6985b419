//! Persisted redirect settings and the typed snapshot built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::rule_set::RuleSet;

/// Cookie lifetime used when the stored value is missing or unusable.
pub const DEFAULT_COOKIE_DAYS: u32 = 7;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// A single rule record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRule {
    pub country: String,
    pub url: String,
}

/// The raw settings document.
///
/// Fields are kept as loose JSON so a hand-edited or partially corrupt file
/// still loads; [`RedirectSettings::from_stored`] does the interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default = "empty_rules")]
    pub rules: Value,

    #[serde(default = "default_cookie_days")]
    pub cookie_days: Value,

    #[serde(default = "default_redirect_enabled")]
    pub redirect_enabled: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn empty_rules() -> Value {
    Value::Array(Vec::new())
}

fn default_cookie_days() -> Value {
    json!(DEFAULT_COOKIE_DAYS)
}

fn default_redirect_enabled() -> Value {
    Value::Bool(true)
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            rules: empty_rules(),
            cookie_days: default_cookie_days(),
            redirect_enabled: default_redirect_enabled(),
            updated_at: None,
        }
    }
}

impl StoredSettings {
    /// Creates a clean document from already sanitized values.
    pub fn new(rules: Vec<StoredRule>, cookie_days: u32, redirect_enabled: bool) -> Self {
        Self {
            rules: json!(rules),
            cookie_days: json!(cookie_days),
            redirect_enabled: Value::Bool(redirect_enabled),
            updated_at: None,
        }
    }
}

/// Immutable, fully materialized settings used for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSettings {
    pub cookie_days: u32,
    pub redirect_enabled: bool,
    pub rules: RuleSet,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            cookie_days: DEFAULT_COOKIE_DAYS,
            redirect_enabled: true,
            rules: RuleSet::default(),
        }
    }
}

impl RedirectSettings {
    /// Interprets a stored document. Never fails: unusable values fall back
    /// to their defaults and malformed rules are dropped.
    pub fn from_stored(stored: &StoredSettings) -> Self {
        Self {
            cookie_days: parse_cookie_days(&stored.cookie_days),
            redirect_enabled: parse_flag(&stored.redirect_enabled, true),
            rules: RuleSet::from_stored_config(&stored.rules),
        }
    }

    /// Lifetime of the "already redirected" cookie in seconds.
    pub fn cookie_max_age(&self) -> u64 {
        u64::from(self.cookie_days) * SECONDS_PER_DAY
    }
}

/// Reads a positive day count from a number or numeric string.
fn parse_cookie_days(raw: &Value) -> u32 {
    let days = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null => return DEFAULT_COOKIE_DAYS,
        _ => None,
    };

    match days.and_then(|d| u32::try_from(d).ok()).filter(|d| *d >= 1) {
        Some(days) => days,
        None => {
            warn!(
                "Stored cookie_days {} is not a positive integer, using {}",
                raw, DEFAULT_COOKIE_DAYS
            );
            DEFAULT_COOKIE_DAYS
        }
    }
}

/// Reads a loosely typed on/off flag.
fn parse_flag(raw: &Value, default: bool) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => default,
    }
}
