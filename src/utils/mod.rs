//! Helpers shared by the HTTP layer and the domain.
//!
//! - [`url_normalizer`] - Rule URL validation, normalization and target paths
//! - [`cookies`] - The "already redirected" cookie

pub mod cookies;
pub mod url_normalizer;
