#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use country_redirect::application::services::{
    AuthService, RedirectService, SettingsService,
};
use country_redirect::domain::engine::RedirectEngine;
use country_redirect::domain::entities::{StoredRule, StoredSettings};
use country_redirect::domain::repositories::SettingsRepository;
use country_redirect::error::AppError;
use country_redirect::infrastructure::persistence::InMemorySettingsRepository;
use country_redirect::routes::app_router;
use country_redirect::state::{AppState, SiteOptions};
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::Layer;
use url::Url;

pub const SITE_URL: &str = "https://example.com";
pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const BROWSER: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
pub const GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
pub const FRONT_PAGE_HTML: &str = "<h1>front page</h1>";

pub fn rule(country: &str, url: &str) -> StoredRule {
    StoredRule {
        country: country.to_string(),
        url: url.to_string(),
    }
}

/// Redirects enabled, 7 day cookie, ES and FR rules.
pub fn es_fr_settings() -> StoredSettings {
    StoredSettings::new(
        vec![
            rule("ES", "https://example.com/es"),
            rule("FR", "https://example.com/fr/"),
        ],
        7,
        true,
    )
}

pub fn create_test_state(settings: StoredSettings) -> AppState {
    create_state_with_repo(Arc::new(InMemorySettingsRepository::new(settings)))
}

pub fn create_state_with_repo(repository: Arc<dyn SettingsRepository>) -> AppState {
    let settings_service = Arc::new(SettingsService::new(repository));
    let engine = RedirectEngine::new(Url::parse(SITE_URL).unwrap());
    let redirect_service = Arc::new(RedirectService::new(settings_service.clone(), engine));

    AppState::new(settings_service, redirect_service, SiteOptions::default())
}

/// Minimal static site checked in under `tests/fixtures/site`.
pub fn site_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

/// Full application router with the admin API enabled.
pub fn make_server(state: AppState) -> TestServer {
    let auth = Arc::new(AuthService::new(ADMIN_TOKEN));
    let app = app_router(state, site_root(), Some(auth)).layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

/// Full application router without an admin token.
pub fn make_server_without_admin(state: AppState) -> TestServer {
    let app = app_router(state, site_root(), None).layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {ADMIN_TOKEN}")
}

/// Settings store that always fails.
pub struct FailingRepository;

#[async_trait]
impl SettingsRepository for FailingRepository {
    async fn load(&self) -> Result<Arc<StoredSettings>, AppError> {
        Err(AppError::internal(
            "Failed to read settings file",
            json!({"error": "disk on fire"}),
        ))
    }

    async fn save(&self, _settings: StoredSettings) -> Result<(), AppError> {
        Err(AppError::internal(
            "Failed to write settings file",
            json!({"error": "disk on fire"}),
        ))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

/// Supplies the peer address the rate limiter keys on.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

