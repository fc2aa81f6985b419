//! Per-request inputs to the redirect decision.

/// Everything the engine needs to know about one inbound request.
///
/// Built at the HTTP boundary (see [`crate::api::middleware::geo_redirect`])
/// and discarded after the decision.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Raw value of the geolocation header, untrusted.
    pub country_header: Option<String>,
    pub user_agent: Option<String>,
    /// Request path without the query string.
    pub request_path: String,
    pub has_redirect_cookie: bool,
    pub is_front_page: bool,
    pub is_admin_or_ajax: bool,
}

impl RequestContext {
    /// Context for a plain visitor landing on the front page.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let ctx = RequestContext::front_page(Some("ES"), Some("Mozilla/5.0"));
    /// assert!(ctx.is_front_page);
    /// ```
    pub fn front_page(country: Option<&str>, user_agent: Option<&str>) -> Self {
        Self {
            country_header: country.map(str::to_string),
            user_agent: user_agent.map(str::to_string),
            request_path: "/".to_string(),
            has_redirect_cookie: false,
            is_front_page: true,
            is_admin_or_ajax: false,
        }
    }
}
