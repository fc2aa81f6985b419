//! Admin API route configuration.
//!
//! All admin endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{evaluate_handler, get_settings_handler, update_settings_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Admin API routes. Authentication and rate limiting are layered on by the caller.
///
/// # Endpoints
///
/// - `GET  /settings` - Current redirect settings
/// - `PUT  /settings` - Partial settings update
/// - `POST /evaluate` - Dry-run the redirect decision for a simulated visit
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        .route("/evaluate", post(evaluate_handler))
}
