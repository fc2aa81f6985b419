//! Settings repository implementations.
//!
//! # Repositories
//!
//! - [`JsonFileSettingsRepository`] - Document persisted as a JSON file
//! - [`InMemorySettingsRepository`] - Process-local document, lost on restart

pub mod in_memory_settings_repository;
pub mod json_file_settings_repository;

pub use in_memory_settings_repository::InMemorySettingsRepository;
pub use json_file_settings_repository::JsonFileSettingsRepository;
