//! Reading and writing the "already redirected" cookie.

use axum::http::{HeaderMap, header};

/// Finds a cookie value by name across all `Cookie` headers.
///
/// Cookies are split on `;`, whitespace around each pair is ignored and only
/// exact name matches count.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, "theme=dark; ccr_redirected=1".parse().unwrap());
///
/// assert_eq!(find_cookie(&headers, "ccr_redirected"), Some("1"));
/// ```
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value),
                _ => None,
            }
        })
}

/// True when the named cookie is present, whatever its value.
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    find_cookie(headers, name).is_some()
}

/// Builds the `Set-Cookie` value marking a visitor as redirected.
pub fn redirect_cookie(name: &str, max_age: u64) -> String {
    format!("{name}=1; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax")
}
