//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export SITE_URL="https://example.com"
//! export SETTINGS_PATH="/var/lib/country-redirect/settings.json"
//! export ADMIN_TOKEN="$(cargo run --bin admin -- token generate --raw)"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `SITE_URL` - Public site URL that redirect targets resolve against
//!   (default: `http://localhost:3000`)
//! - `SITE_ROOT` - Directory with the static site (default: `public`)
//! - `FRONT_PAGE_PATH` - Path of the front page (default: `/`)
//! - `SETTINGS_PATH` - JSON settings file; in-memory defaults when unset
//! - `COUNTRY_HEADER` - Header with the visitor country (default: `cf-ipcountry`)
//! - `COOKIE_PREFIX` - Prefix of the `<prefix>_redirected` cookie (default: `ccr`)
//! - `ADMIN_PATH_PREFIXES` - Comma-separated admin paths never redirected (default: `/api`)
//! - `ADMIN_TOKEN` - Enables the admin API with this Bearer token
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use axum::http::HeaderName;
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::state::SiteOptions;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub site_url: String,
    pub site_root: PathBuf,
    pub front_page_path: String,
    /// `None` keeps settings in memory only.
    pub settings_path: Option<PathBuf>,
    pub country_header: String,
    pub cookie_prefix: String,
    pub admin_prefixes: Vec<String>,
    /// Bearer token for the admin API. The API is not mounted when unset.
    pub admin_token: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            site_url: "http://localhost:3000".to_string(),
            site_root: PathBuf::from("public"),
            front_page_path: "/".to_string(),
            settings_path: None,
            country_header: "cf-ipcountry".to_string(),
            cookie_prefix: "ccr".to_string(),
            admin_prefixes: vec!["/api".to_string()],
            admin_token: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Currently infallible for missing variables (all have defaults); kept
    /// fallible so required settings can be added without changing callers.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let site_url = env::var("SITE_URL").unwrap_or(defaults.site_url);
        let site_root = env::var("SITE_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.site_root);
        let front_page_path = env::var("FRONT_PAGE_PATH").unwrap_or(defaults.front_page_path);
        let settings_path = env::var("SETTINGS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let country_header = env::var("COUNTRY_HEADER").unwrap_or(defaults.country_header);
        let cookie_prefix = env::var("COOKIE_PREFIX").unwrap_or(defaults.cookie_prefix);

        let admin_prefixes = env::var("ADMIN_PATH_PREFIXES")
            .map(|v| parse_list(&v))
            .unwrap_or(defaults.admin_prefixes);

        let admin_token = env::var("ADMIN_TOKEN").ok();

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        Ok(Self {
            listen_addr,
            site_url,
            site_root,
            front_page_path,
            settings_path,
            country_header,
            cookie_prefix,
            admin_prefixes,
            admin_token,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `listen_addr` is not `host:port`
    /// - `site_url` is not an absolute http(s) URL
    /// - `country_header` is not a valid header name
    /// - `cookie_prefix` is empty or has characters outside `[A-Za-z0-9_-]`
    /// - `front_page_path` or an admin prefix does not start with `/`
    /// - `log_format` is not `text` or `json`
    /// - `admin_token` is set but empty
    pub fn validate(&self) -> Result<()> {
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        self.parsed_site_url()?;

        HeaderName::try_from(self.country_header.as_str()).with_context(|| {
            format!(
                "COUNTRY_HEADER must be a valid header name, got '{}'",
                self.country_header
            )
        })?;

        if self.cookie_prefix.is_empty()
            || !self
                .cookie_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!(
                "COOKIE_PREFIX must be non-empty and contain only letters, digits, '_' or '-', got '{}'",
                self.cookie_prefix
            );
        }

        if !self.front_page_path.starts_with('/') {
            anyhow::bail!(
                "FRONT_PAGE_PATH must start with '/', got '{}'",
                self.front_page_path
            );
        }

        if let Some(prefix) = self.admin_prefixes.iter().find(|p| !p.starts_with('/')) {
            anyhow::bail!(
                "ADMIN_PATH_PREFIXES entries must start with '/', got '{}'",
                prefix
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(ref token) = self.admin_token
            && token.trim().is_empty()
        {
            anyhow::bail!("ADMIN_TOKEN must not be empty when set");
        }

        Ok(())
    }

    /// Parses `site_url`, accepting only absolute http(s) URLs with a host.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the URL is unusable.
    pub fn parsed_site_url(&self) -> Result<Url> {
        let url = Url::parse(&self.site_url)
            .with_context(|| format!("SITE_URL is not a valid URL: '{}'", self.site_url))?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            anyhow::bail!(
                "SITE_URL must be an http(s) URL with a host, got '{}'",
                self.site_url
            );
        }

        Ok(url)
    }

    /// Name of the "already redirected" cookie.
    pub fn cookie_name(&self) -> String {
        format!("{}_redirected", self.cookie_prefix)
    }

    /// Request classification options for the HTTP layer.
    ///
    /// # Errors
    ///
    /// Returns an error if `country_header` is not a valid header name.
    pub fn site_options(&self) -> Result<SiteOptions> {
        Ok(SiteOptions {
            country_header: HeaderName::try_from(self.country_header.as_str())
                .context("Invalid COUNTRY_HEADER")?,
            cookie_name: self.cookie_name(),
            front_page_path: self.front_page_path.clone(),
            admin_prefixes: self.admin_prefixes.clone(),
        })
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Site URL: {}", self.site_url);
        tracing::info!("  Site root: {}", self.site_root.display());
        tracing::info!("  Front page: {}", self.front_page_path);

        match self.settings_path {
            Some(ref path) => tracing::info!("  Settings: {}", path.display()),
            None => tracing::info!("  Settings: in-memory (SETTINGS_PATH not set)"),
        }

        tracing::info!("  Country header: {}", self.country_header);
        tracing::info!("  Cookie: {}", self.cookie_name());
        tracing::info!(
            "  Admin API: {}",
            if self.admin_token.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Splits a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
