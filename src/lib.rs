//! # Country Redirect
//!
//! Sends first-time front page visitors to a country-specific page, based on
//! a country code supplied by an upstream proxy header (e.g. Cloudflare's
//! `CF-IPCountry`). Built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Country codes, bot detection, rules and the decision engine
//! - **Application Layer** ([`application`]) - Settings management and per-request evaluation
//! - **Infrastructure Layer** ([`infrastructure`]) - Settings storage (JSON file, in-memory)
//! - **API Layer** ([`api`]) - Redirect middleware, admin REST API, DTOs
//!
//! ## Redirect Rules
//!
//! A visitor is redirected at most once per cookie lifetime, only from the
//! front page, never when they look like a bot, and never to the page they
//! are already on. The first rule matching the visitor's country wins.
//!
//! ## Quick Start
//!
//! ```bash
//! export SITE_URL="https://example.com"
//! export SETTINGS_PATH="settings.json"
//!
//! cargo run --bin admin -- rules add --country ES --url https://example.com/es
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, RedirectService, SettingsService, SettingsUpdate,
    };
    pub use crate::domain::engine::RedirectEngine;
    pub use crate::domain::entities::{
        Decision, RedirectSettings, RequestContext, SkipReason, StoredRule, StoredSettings,
    };
    pub use crate::error::AppError;
    pub use crate::state::{AppState, SiteOptions};
}
