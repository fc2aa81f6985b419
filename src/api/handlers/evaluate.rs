//! Handler for dry-running the redirect engine.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::evaluate::{EvaluateRequest, EvaluateResponse};
use crate::api::middleware::geo_redirect::{path_only, request_context};
use crate::error::AppError;
use crate::state::AppState;

/// Shows what the redirect middleware would do for a simulated visit.
///
/// # Endpoint
///
/// `POST /api/evaluate`
///
/// The visit is classified exactly like a real request, then decided against
/// the current settings. Nothing is logged as a decision or counted.
///
/// # Request Body
///
/// ```json
/// {
///   "country": "ES",
///   "path": "/",
///   "user_agent": "Mozilla/5.0",
///   "has_cookie": false
/// }
/// ```
///
/// # Response
///
/// ```json
/// {"outcome": "redirect", "country": "ES", "location": "https://example.com/es", "cookie_max_age": 604800}
/// ```
///
/// ```json
/// {"outcome": "skip", "reason": "no_matching_rule", "description": "no matching rule for country"}
/// ```
///
/// # Errors
///
/// - 400 Bad Request if validation fails or a value cannot be sent as a header
/// - 500 Internal Server Error if settings cannot be loaded
pub async fn evaluate_handler(
    State(state): State<AppState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    payload.validate()?;

    let headers = simulated_headers(&state, &payload)?;
    let path = path_only(&payload.path);
    let ctx = request_context(&state.site, path, &headers);

    let settings = state.settings_service.snapshot().await?;
    let decision = state.redirect_service.engine().decide(&ctx, &settings);

    Ok(Json(decision.into()))
}

fn simulated_headers(state: &AppState, payload: &EvaluateRequest) -> Result<HeaderMap, AppError> {
    let value = |field: &str, raw: &str| {
        HeaderValue::from_str(raw).map_err(|_| {
            AppError::bad_request(
                "Invalid header value",
                json!({"field": field, "reason": "contains characters not allowed in headers"}),
            )
        })
    };

    let mut headers = HeaderMap::new();

    if let Some(ref country) = payload.country {
        headers.insert(state.site.country_header.clone(), value("country", country)?);
    }
    if let Some(ref user_agent) = payload.user_agent {
        headers.insert(header::USER_AGENT, value("user_agent", user_agent)?);
    }
    if payload.has_cookie {
        headers.insert(
            header::COOKIE,
            value("has_cookie", &format!("{}=1", state.site.cookie_name))?,
        );
    }

    Ok(headers)
}
