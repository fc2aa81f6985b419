//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::settings_service::SettingsService`] - Settings snapshots and sanitized updates
//! - [`services::redirect_service::RedirectService`] - Per-request redirect evaluation
//! - [`services::auth_service::AuthService`] - Admin token authentication

pub mod services;
