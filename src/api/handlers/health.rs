//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::domain::entities::RedirectSettings;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Settings store readable
/// - **503 Service Unavailable**: Settings store cannot be read
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "settings": {
///       "status": "ok",
///       "message": "json file settings.json, 2 rules, redirect enabled"
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let settings_check = check_settings(&state).await;

    let healthy = settings_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            settings: settings_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the settings document can be loaded.
async fn check_settings(state: &AppState) -> CheckStatus {
    let store = state.settings_service.describe();

    match state.settings_service.stored().await {
        Ok(stored) => {
            let settings = RedirectSettings::from_stored(&stored);
            CheckStatus {
                status: "ok".to_string(),
                message: Some(format!(
                    "{}, {} rules, redirect {}",
                    store,
                    settings.rules.len(),
                    if settings.redirect_enabled {
                        "enabled"
                    } else {
                        "disabled"
                    }
                )),
            }
        }
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("{} unavailable: {}", store, e)),
        },
    }
}
