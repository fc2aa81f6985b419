//! Shared application state injected into handlers and middleware.

use axum::http::HeaderName;
use std::sync::Arc;

use crate::application::services::{RedirectService, SettingsService};

/// How inbound requests are classified before the redirect decision.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Header carrying the visitor's country code.
    pub country_header: HeaderName,
    /// Name of the "already redirected" cookie.
    pub cookie_name: String,
    /// Path of the front page, the only page eligible for redirection.
    pub front_page_path: String,
    /// Path prefixes that belong to the admin surface.
    pub admin_prefixes: Vec<String>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            country_header: HeaderName::from_static("cf-ipcountry"),
            cookie_name: "ccr_redirected".to_string(),
            front_page_path: "/".to_string(),
            admin_prefixes: vec!["/api".to_string()],
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings_service: Arc<SettingsService>,
    pub redirect_service: Arc<RedirectService>,
    pub site: Arc<SiteOptions>,
}

impl AppState {
    pub fn new(
        settings_service: Arc<SettingsService>,
        redirect_service: Arc<RedirectService>,
        site: SiteOptions,
    ) -> Self {
        Self {
            settings_service,
            redirect_service,
            site: Arc::new(site),
        }
    }
}
