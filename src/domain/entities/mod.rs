//! Core domain entities representing the redirect data model.
//!
//! Entities are plain data structures; the decision logic lives in
//! [`crate::domain::engine`].
//!
//! # Entity Types
//!
//! - [`StoredSettings`] - The raw persisted settings document
//! - [`RedirectSettings`] - Typed, read-only snapshot used for one decision
//! - [`RequestContext`] - Per-request inputs gathered at the HTTP boundary
//! - [`Decision`] - The engine's output, either a skip or a redirect

pub mod decision;
pub mod request_context;
pub mod settings;

pub use decision::{Decision, SkipReason};
pub use request_context::RequestContext;
pub use settings::{DEFAULT_COOKIE_DAYS, RedirectSettings, StoredRule, StoredSettings};
