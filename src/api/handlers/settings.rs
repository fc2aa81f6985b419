//! Handlers for reading and updating redirect settings.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::settings::{SettingsResponse, UpdateSettingsRequest, UpdateSettingsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the current redirect settings.
///
/// # Endpoint
///
/// `GET /api/settings`
///
/// # Response
///
/// ```json
/// {
///   "redirect_enabled": true,
///   "cookie_days": 7,
///   "rules": [
///     {"country": "ES", "url": "https://example.com/es", "target_path": "es"}
///   ],
///   "updated_at": "2024-05-01T10:00:00Z"
/// }
/// ```
///
/// Only rules the engine can use are listed.
pub async fn get_settings_handler(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let stored = state.settings_service.stored().await?;

    Ok(Json(SettingsResponse::from_stored(&stored)))
}

/// Applies a partial settings update.
///
/// # Endpoint
///
/// `PUT /api/settings`
///
/// # Request Body
///
/// ```json
/// {
///   "redirect_enabled": true,
///   "cookie_days": 14,
///   "rules": [
///     {"country": "es", "url": "https://example.com/es/"},
///     {"country": "Spain", "url": "/es"}
///   ]
/// }
/// ```
///
/// # Response
///
/// The new settings, plus every submitted rule that was dropped:
///
/// ```json
/// {
///   "settings": { "redirect_enabled": true, "cookie_days": 14, "rules": [...] },
///   "rejected": [
///     {"index": 1, "country": "Spain", "url": "/es", "reason": "invalid country code 'Spain', expected two letters"}
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
pub async fn update_settings_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>, AppError> {
    payload.validate()?;

    let outcome = state.settings_service.update(payload.into()).await?;

    Ok(Json(UpdateSettingsResponse {
        settings: SettingsResponse::from_stored(&outcome.settings),
        rejected: outcome.rejected,
    }))
}
