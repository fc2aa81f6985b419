//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`SettingsRepository`] - Redirect settings document storage

pub mod settings_repository;

pub use settings_repository::SettingsRepository;

#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
