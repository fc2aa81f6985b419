//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod evaluate;
pub mod health;
pub mod settings;

pub use evaluate::evaluate_handler;
pub use health::health_handler;
pub use settings::{get_settings_handler, update_settings_handler};
