//! DTOs for the settings endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::settings_service;
use crate::application::services::{RejectedRule, RuleInput, SettingsUpdate};
use crate::domain::entities::{RedirectSettings, StoredSettings};

/// Longest cookie lifetime accepted through the API, in days.
pub const MAX_COOKIE_DAYS: i64 = settings_service::MAX_COOKIE_DAYS as i64;

/// Current redirect settings as the engine sees them.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub redirect_enabled: bool,
    pub cookie_days: u32,
    pub rules: Vec<RuleView>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RuleView {
    pub country: String,
    pub url: String,
    pub target_path: String,
}

impl SettingsResponse {
    pub fn from_stored(stored: &StoredSettings) -> Self {
        let settings = RedirectSettings::from_stored(stored);

        Self {
            redirect_enabled: settings.redirect_enabled,
            cookie_days: settings.cookie_days,
            rules: settings
                .rules
                .iter()
                .map(|rule| RuleView {
                    country: rule.country.to_string(),
                    url: rule.url.clone(),
                    target_path: rule.target_path.clone(),
                })
                .collect(),
            updated_at: stored.updated_at,
        }
    }
}

/// Partial settings update. Omitted fields keep their current value.
///
/// `rules`, when present, replaces the whole rule list. Rules that fail
/// sanitization are skipped and reported back instead of failing the request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(nested)]
    pub rules: Option<Vec<RuleItem>>,

    #[validate(range(min = 1, max = MAX_COOKIE_DAYS))]
    pub cookie_days: Option<i64>,

    pub redirect_enabled: Option<bool>,
}

/// One rule as submitted by a client.
#[derive(Debug, Deserialize, Validate)]
pub struct RuleItem {
    #[validate(length(max = 16))]
    pub country: Option<String>,

    #[validate(length(max = 2048))]
    pub url: Option<String>,
}

impl From<UpdateSettingsRequest> for SettingsUpdate {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            rules: req.rules.map(|rules| {
                rules
                    .into_iter()
                    .map(|item| RuleInput {
                        country: item.country,
                        url: item.url,
                    })
                    .collect()
            }),
            cookie_days: req.cookie_days,
            redirect_enabled: req.redirect_enabled,
        }
    }
}

/// Settings after an update plus the rule inputs that were dropped.
#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub settings: SettingsResponse,
    pub rejected: Vec<RejectedRule>,
}
