//! In-memory implementation of the settings repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::StoredSettings;
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

/// Keeps the settings document in process memory.
///
/// Used when no settings file is configured and in tests.
pub struct InMemorySettingsRepository {
    current: RwLock<Arc<StoredSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new(settings: StoredSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }
}

impl Default for InMemorySettingsRepository {
    fn default() -> Self {
        Self::new(StoredSettings::default())
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Arc<StoredSettings>, AppError> {
        Ok(self.current.read().await.clone())
    }

    async fn save(&self, settings: StoredSettings) -> Result<(), AppError> {
        *self.current.write().await = Arc::new(settings);
        debug!("In-memory settings replaced");
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
