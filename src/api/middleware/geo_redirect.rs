//! Country-based front page redirect middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::entities::{Decision, RequestContext};
use crate::state::{AppState, SiteOptions};
use crate::utils::cookies;
use crate::utils::url_normalizer::trim_slashes;

const X_REQUESTED_WITH: &str = "x-requested-with";

/// Redirects first-time front page visitors to their country's page.
///
/// Every `GET`/`HEAD` request is classified into a [`RequestContext`] and
/// handed to [`crate::application::services::RedirectService`]. Other methods
/// pass straight through.
///
/// # Redirect Response
///
/// ```text
/// HTTP/1.1 302 Found
/// Location: https://example.com/es
/// Set-Cookie: ccr_redirected=1; Max-Age=604800; Path=/; HttpOnly; SameSite=Lax
/// Cache-Control: no-store
/// ```
///
/// The inner service is not called for a redirect. Any skip forwards the
/// request unchanged.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .fallback_service(ServeDir::new("public"))
///     .layer(middleware::from_fn_with_state(state.clone(), geo_redirect::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return next.run(req).await;
    }

    let ctx = request_context(&st.site, req.uri().path(), req.headers());

    if let Decision::Redirect {
        location,
        cookie_max_age,
        ..
    } = st.redirect_service.evaluate(&ctx).await
    {
        match redirect_response(&st.site, &location, cookie_max_age) {
            Some(response) => return response,
            None => tracing::warn!("Redirect target {} is not a valid header value", location),
        }
    }

    next.run(req).await
}

/// Classifies a request for the redirect engine.
pub fn request_context(site: &SiteOptions, path: &str, headers: &HeaderMap) -> RequestContext {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    RequestContext {
        country_header: header_str(site.country_header.as_str()),
        user_agent: header_str(header::USER_AGENT.as_str()),
        request_path: path.to_string(),
        has_redirect_cookie: cookies::has_cookie(headers, &site.cookie_name),
        is_front_page: trim_slashes(path) == trim_slashes(&site.front_page_path),
        is_admin_or_ajax: is_admin_path(&site.admin_prefixes, path) || is_ajax(headers),
    }
}

/// Path part of a request target typed by hand, without query or fragment.
///
/// Live requests already arrive split by the URI parser; dry runs use this to
/// classify `"/?utm=x"` the same way.
pub fn path_only(target: &str) -> &str {
    target.split(['?', '#']).next().unwrap_or_default()
}

/// True when `path` equals a prefix or lies below it.
fn is_admin_path(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return false;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    })
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get(X_REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

fn redirect_response(site: &SiteOptions, location: &str, max_age: u64) -> Option<Response> {
    let location = HeaderValue::from_str(location).ok()?;
    let cookie = HeaderValue::from_str(&cookies::redirect_cookie(&site.cookie_name, max_age)).ok()?;

    Some(
        (
            StatusCode::FOUND,
            [
                (header::LOCATION, location),
                (header::SET_COOKIE, cookie),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response(),
    )
}
