//! URL normalization and target path extraction for redirect rules.
//!
//! Rule URLs are stored either absolute (`https://example.com/es`) or
//! site-relative (`/es`). Only their path component drives matching.

use std::sync::LazyLock;
use url::Url;

/// Base used to resolve site-relative rule URLs. Never leaves this module.
static RELATIVE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://relative.invalid/").unwrap());

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Parses a stored rule URL, accepting absolute http(s) URLs and
/// site-relative paths starting with `/`.
fn parse_rule_url(input: &str) -> Result<(Url, bool), UrlNormalizationError> {
    let input = input.trim();

    if input.starts_with('/') && !input.starts_with("//") {
        let url = RELATIVE_BASE
            .join(input)
            .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;
        return Ok((url, true));
    }

    let url = Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok((url, false)),
        _ => Err(UrlNormalizationError::UnsupportedProtocol),
    }
}

/// Normalizes a rule URL to the canonical form that gets persisted.
///
/// # Normalization Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Hostname**: Converted to lowercase
/// 3. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: Removed (e.g., `#section`)
/// 5. **Unsafe characters**: Percent-escaped by the URL parser
/// 6. **Relative paths**: Kept relative (`/es` stays `/es`)
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/es#top").unwrap(),
///     "https://example.com/es"
/// );
/// assert_eq!(normalize_url("/fr/").unwrap(), "/fr/");
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let (mut url, relative) = parse_rule_url(input)?;

    url.set_fragment(None);

    if relative {
        let mut out = url.path().to_string();
        if let Some(query) = url.query() {
            out.push('?');
            out.push_str(query);
        }
        return Ok(out);
    }

    if let Some(host) = url.host_str() {
        let host_lowercase = host.to_ascii_lowercase();
        url.set_host(Some(&host_lowercase)).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

/// Extracts the redirect target path from a rule URL.
///
/// Scheme, host, query and fragment are discarded and surrounding slashes
/// trimmed, so `https://example.com/es/` becomes `es` and a URL without a
/// path becomes the empty string (site root).
///
/// # Errors
///
/// Same as [`normalize_url`].
pub fn target_path(input: &str) -> Result<String, UrlNormalizationError> {
    let (url, _) = parse_rule_url(input)?;
    Ok(trim_slashes(url.path()).to_string())
}

/// Strips leading and trailing `/` characters.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_normalize_uppercase_host() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Es").unwrap(),
            "https://example.com/Es"
        );
    }

    #[test]
    fn test_normalize_remove_default_port() {
        assert_eq!(
            normalize_url("https://example.com:443/es").unwrap(),
            "https://example.com/es"
        );
        assert_eq!(
            normalize_url("http://example.com:80/es").unwrap(),
            "http://example.com/es"
        );
    }

    #[test]
    fn test_normalize_keep_custom_port() {
        assert_eq!(
            normalize_url("http://localhost:8080/es").unwrap(),
            "http://localhost:8080/es"
        );
    }

    #[test]
    fn test_normalize_remove_fragment() {
        assert_eq!(
            normalize_url("https://example.com/es?ref=geo#top").unwrap(),
            "https://example.com/es?ref=geo"
        );
    }

    #[test]
    fn test_normalize_escapes_spaces() {
        assert_eq!(
            normalize_url("https://example.com/es pañol").unwrap(),
            "https://example.com/es%20pa%C3%B1ol"
        );
    }

    #[test]
    fn test_normalize_trims_input() {
        assert_eq!(
            normalize_url("  https://example.com/de  ").unwrap(),
            "https://example.com/de"
        );
    }

    #[test]
    fn test_normalize_relative_path() {
        assert_eq!(normalize_url("/fr/").unwrap(), "/fr/");
        assert_eq!(normalize_url("/fr?x=1#y").unwrap(), "/fr?x=1");
    }

    #[test]
    fn test_normalize_rejects_javascript() {
        assert!(matches!(
            normalize_url("javascript:alert('xss')").unwrap_err(),
            UrlNormalizationError::UnsupportedProtocol
        ));
    }

    #[test]
    fn test_normalize_rejects_ftp() {
        assert!(matches!(
            normalize_url("ftp://example.com/file").unwrap_err(),
            UrlNormalizationError::UnsupportedProtocol
        ));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_url("not a url").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
        assert!(matches!(
            normalize_url("").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_rejects_protocol_relative() {
        assert!(normalize_url("//evil.example.com/es").is_err());
    }

    #[test]
    fn test_target_path_absolute() {
        assert_eq!(target_path("https://example.com/es").unwrap(), "es");
        assert_eq!(target_path("https://example.com/es/").unwrap(), "es");
        assert_eq!(
            target_path("https://example.com/shop/es/?utm=1").unwrap(),
            "shop/es"
        );
    }

    #[test]
    fn test_target_path_site_root() {
        assert_eq!(target_path("https://example.com").unwrap(), "");
        assert_eq!(target_path("https://example.com/").unwrap(), "");
    }

    #[test]
    fn test_target_path_relative() {
        assert_eq!(target_path("/de/").unwrap(), "de");
        assert_eq!(target_path("/").unwrap(), "");
    }

    #[test]
    fn test_target_path_invalid() {
        assert!(target_path("es").is_err());
        assert!(target_path("mailto:a@example.com").is_err());
    }

    #[test]
    fn test_trim_slashes() {
        assert_eq!(trim_slashes("/"), "");
        assert_eq!(trim_slashes("//es//"), "es");
        assert_eq!(trim_slashes("es/news"), "es/news");
        assert_eq!(trim_slashes(""), "");
    }
}
