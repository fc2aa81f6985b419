//! Repository trait for the redirect settings document.

use crate::domain::entities::StoredSettings;
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for the single settings document.
///
/// Implementations hand out whole documents so that a reader never observes
/// a half-applied update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileSettingsRepository`] - JSON file on disk
/// - [`crate::infrastructure::persistence::InMemorySettingsRepository`] - Process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns the current document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing store cannot be read.
    async fn load(&self) -> Result<Arc<StoredSettings>, AppError>;

    /// Replaces the current document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the document cannot be persisted.
    /// The previous document stays current in that case.
    async fn save(&self, settings: StoredSettings) -> Result<(), AppError>;

    /// Short description of the backing store for logs and health checks.
    fn describe(&self) -> String;
}
