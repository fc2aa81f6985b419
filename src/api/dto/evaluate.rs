//! DTOs for the dry-run evaluation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Decision;

/// A simulated visit.
#[derive(Debug, Deserialize, Validate)]
pub struct EvaluateRequest {
    /// Raw country header value.
    #[validate(length(max = 16))]
    pub country: Option<String>,

    #[serde(default = "front_page")]
    #[validate(length(min = 1, max = 2048))]
    pub path: String,

    #[validate(length(max = 1024))]
    pub user_agent: Option<String>,

    /// Whether the "already redirected" cookie is present.
    #[serde(default)]
    pub has_cookie: bool,
}

fn front_page() -> String {
    "/".to_string()
}

/// What the middleware would do for the simulated visit.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// `redirect` or `skip`.
    pub outcome: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_max_age: Option<u64>,
}

impl From<Decision> for EvaluateResponse {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Redirect {
                country,
                location,
                cookie_max_age,
            } => Self {
                outcome: "redirect",
                reason: None,
                description: None,
                country: Some(country.to_string()),
                location: Some(location),
                cookie_max_age: Some(cookie_max_age),
            },
            Decision::Skip(reason) => Self {
                outcome: "skip",
                reason: Some(reason.as_str()),
                description: Some(reason.description()),
                country: None,
                location: None,
                cookie_max_age: None,
            },
        }
    }
}
