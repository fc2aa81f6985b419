//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: settings store (public)
//! - `/api/*`            - Admin API (Bearer token required, only when `ADMIN_TOKEN` is set)
//! - everything else     - Static site from the site root
//!
//! # Middleware
//!
//! - **Geo redirect** - Country-based front page redirect, wraps every route
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the admin API
//! - **Authentication** - Bearer token on the admin API
//! - **Path normalization** - Trailing slash handling on the admin API

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, geo_redirect, rate_limit, tracing};
use crate::application::services::AuthService;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use std::path::Path;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `site_root` - directory served for every path without its own route
/// - `auth` - admin token checker; `None` leaves the admin API unmounted
///
/// The admin API is rate limited per peer IP, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(
    state: AppState,
    site_root: impl AsRef<Path>,
    auth: Option<Arc<AuthService>>,
) -> Router {
    let admin = auth.map(|auth| admin_router(state.clone(), auth).layer(rate_limit::secure_layer()));

    site_router(state, site_root, admin)
}

/// Admin API with authentication, without rate limiting.
pub fn admin_router(state: AppState, auth: Arc<AuthService>) -> Router {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(auth, auth::layer))
        .with_state(state)
}

/// Public site with an optional admin API nested under `/api`.
pub fn site_router(state: AppState, site_root: impl AsRef<Path>, admin: Option<Router>) -> Router {
    let mut router = Router::new().route("/health", get(health_handler));

    if let Some(admin) = admin {
        router = router.nest_service("/api", NormalizePathLayer::trim_trailing_slash().layer(admin));
    }

    router
        .fallback_service(ServeDir::new(site_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            geo_redirect::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}
