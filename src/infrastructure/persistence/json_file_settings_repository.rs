//! JSON file implementation of the settings repository.

use async_trait::async_trait;
use serde_json::json;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::entities::StoredSettings;
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

struct Cached {
    settings: Arc<StoredSettings>,
    modified: Option<SystemTime>,
}

/// Settings document stored as a JSON file.
///
/// The parsed document is cached and re-read whenever the file's modification
/// time changes, so edits made by the `admin` CLI reach a running server.
/// A file that no longer parses keeps the last good document in place.
///
/// Writes go to a temporary sibling file that is renamed over the original,
/// and are serialized by the cache's write lock.
pub struct JsonFileSettingsRepository {
    path: PathBuf,
    cache: RwLock<Cached>,
}

impl JsonFileSettingsRepository {
    /// Opens the settings file, creating nothing on disk.
    ///
    /// A missing file yields the default document. An unparseable file is
    /// logged and also yields the default document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the file exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let (settings, modified) = match read_document(&path).await {
            Ok(Some((settings, modified))) => {
                info!("Loaded settings from {}", path.display());
                (settings, modified)
            }
            Ok(None) => {
                info!(
                    "Settings file {} not found, using defaults",
                    path.display()
                );
                (StoredSettings::default(), None)
            }
            Err(ReadError::Parse(e)) => {
                error!(
                    "Settings file {} is not valid JSON ({}), using defaults",
                    path.display(),
                    e
                );
                (StoredSettings::default(), modified_time(&path).await)
            }
            Err(ReadError::Io(e)) => {
                return Err(AppError::internal(
                    "Failed to read settings file",
                    json!({"path": path.display().to_string(), "error": e.to_string()}),
                ));
            }
        };

        Ok(Self {
            path,
            cache: RwLock::new(Cached {
                settings: Arc::new(settings),
                modified,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file if it changed since the cached copy was taken.
    async fn refresh(&self) -> Result<(), AppError> {
        let on_disk = modified_time(&self.path).await;
        if on_disk == self.cache.read().await.modified {
            return Ok(());
        }

        let mut cache = self.cache.write().await;
        if on_disk == cache.modified {
            return Ok(());
        }

        match read_document(&self.path).await {
            Ok(Some((settings, modified))) => {
                debug!("Settings file {} changed, reloaded", self.path.display());
                cache.settings = Arc::new(settings);
                cache.modified = modified;
            }
            Ok(None) => {
                warn!(
                    "Settings file {} disappeared, keeping last loaded settings",
                    self.path.display()
                );
                cache.modified = None;
            }
            Err(ReadError::Parse(e)) => {
                error!(
                    "Settings file {} is not valid JSON ({}), keeping last loaded settings",
                    self.path.display(),
                    e
                );
                cache.modified = on_disk;
            }
            Err(ReadError::Io(e)) => {
                return Err(AppError::internal(
                    "Failed to read settings file",
                    json!({"path": self.path.display().to_string(), "error": e.to_string()}),
                ));
            }
        }

        Ok(())
    }
}

enum ReadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok())
}

/// Reads and parses the document. `Ok(None)` means the file does not exist.
async fn read_document(
    path: &Path,
) -> Result<Option<(StoredSettings, Option<SystemTime>)>, ReadError> {
    let modified = modified_time(path).await;

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ReadError::Io(e)),
    };

    let settings = serde_json::from_slice(&bytes).map_err(ReadError::Parse)?;

    Ok(Some((settings, modified)))
}

#[async_trait]
impl SettingsRepository for JsonFileSettingsRepository {
    async fn load(&self) -> Result<Arc<StoredSettings>, AppError> {
        self.refresh().await?;
        Ok(self.cache.read().await.settings.clone())
    }

    async fn save(&self, settings: StoredSettings) -> Result<(), AppError> {
        let mut cache = self.cache.write().await;

        let body = serde_json::to_vec_pretty(&settings).map_err(|e| {
            AppError::internal(
                "Failed to serialize settings",
                json!({"error": e.to_string()}),
            )
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let write_error = |e: std::io::Error| {
            error!("Failed to write settings to {}: {}", self.path.display(), e);
            AppError::internal(
                "Failed to write settings file",
                json!({"path": self.path.display().to_string(), "error": e.to_string()}),
            )
        };

        tokio::fs::write(&tmp_path, &body)
            .await
            .map_err(write_error)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_error)?;

        cache.settings = Arc::new(settings);
        cache.modified = modified_time(&self.path).await;

        info!("Settings written to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}
