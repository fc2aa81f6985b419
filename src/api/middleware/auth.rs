//! Bearer token authentication middleware for the admin API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use std::sync::Arc;

use crate::{application::services::AuthService, error::AppError};

/// Authenticates admin requests using the configured Bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token does not match `ADMIN_TOKEN`
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/settings", get(get_settings_handler))
///     .route_layer(middleware::from_fn_with_state(auth_service, auth::layer));
/// ```
pub async fn layer(
    State(auth): State<Arc<AuthService>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    auth.authenticate(&token).inspect_err(|_| {
        tracing::warn!(path = %parts.uri.path(), "Rejected admin token");
    })?;

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
