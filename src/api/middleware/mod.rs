//! HTTP middleware for request processing and protection.
//!
//! Provides the geo redirect, admin authentication, rate limiting and
//! observability middleware.

pub mod auth;
pub mod geo_redirect;
pub mod rate_limit;
pub mod tracing;
