//! Domain layer containing the redirect rules and decision logic.
//!
//! Nothing in here performs I/O. Settings arrive as explicit values and
//! decisions leave as values; the HTTP layer executes them.
//!
//! # Architecture
//!
//! - [`entities`] - Settings, request context and decision types
//! - [`repositories`] - Settings storage trait
//! - [`bot_detector`] - Crawler detection by user agent
//! - [`country`] - Country header validation
//! - [`rule_set`] - Ordered country rules with first-match lookup
//! - [`engine`] - Ordered gates producing a [`entities::Decision`]
//!
//! # Decision Flow
//!
//! 1. HTTP middleware builds a [`entities::RequestContext`]
//! 2. [`crate::application::services::RedirectService`] loads a settings snapshot
//! 3. [`engine::RedirectEngine::decide`] runs the gates and rule lookup
//! 4. The middleware answers with a 302 or forwards the request

pub mod bot_detector;
pub mod country;
pub mod engine;
pub mod entities;
pub mod repositories;
pub mod rule_set;
