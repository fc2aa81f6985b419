//! Authentication service for the admin API token.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Checks admin Bearer tokens against the configured token.
///
/// The configured token is kept only as an HMAC-SHA256 tag under a random
/// per-process key, and presented tokens are checked with a constant-time
/// tag comparison.
pub struct AuthService {
    key: [u8; 32],
    token_tag: Vec<u8>,
}

impl AuthService {
    /// Creates a service accepting exactly `admin_token`.
    pub fn new(admin_token: &str) -> Self {
        let key: [u8; 32] = rand::random();
        let token_tag = Self::mac(&key, admin_token).finalize().into_bytes().to_vec();

        Self { key, token_tag }
    }

    fn mac(key: &[u8], token: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        mac
    }

    /// Authenticates a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        Self::mac(&self.key, token)
            .verify_slice(&self.token_tag)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Invalid token"}))
            })
    }
}
