//! Quality preference state and its persistence
//!
//! The preference state outlives any single source: it is loaded once at
//! startup, mutated only by explicit user actions, and written back after
//! every change. Persistence failures are logged and otherwise ignored so a
//! read-only disk never blocks playback.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PreferencesConfig;
use crate::config::defaults::DEFAULT_AUTOMATIC_QUALITY;
use crate::errors::{PreferenceError, PreferenceResult};
use crate::models::QualityLabel;

/// The user's quality preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityPreferences {
    /// Let the adaptive engine pick the quality of new HLS sources.
    #[serde(default = "default_automatic_quality")]
    pub automatic_quality: bool,
    /// Last quality the user picked explicitly.
    #[serde(default)]
    pub last_chosen_quality: Option<QualityLabel>,
}

fn default_automatic_quality() -> bool {
    DEFAULT_AUTOMATIC_QUALITY
}

impl Default for QualityPreferences {
    fn default() -> Self {
        Self {
            automatic_quality: default_automatic_quality(),
            last_chosen_quality: None,
        }
    }
}

/// Owner of the quality preference state.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    preferences: QualityPreferences,
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// Store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PreferencesConfig) -> Self {
        match config.storage_path() {
            Some(path) => Self::open(path),
            None => Self::in_memory(),
        }
    }

    /// Open a file-backed store, starting from defaults if the file is
    /// missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Using default quality preferences: {}", e);
                Self {
                    preferences: QualityPreferences::default(),
                    path: Some(path),
                }
            }
        }
    }

    /// Open a file-backed store. A missing file is not an error.
    pub fn try_open(path: &Path) -> PreferenceResult<Self> {
        let preferences = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| PreferenceError::Io {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| PreferenceError::Json {
                path: path.display().to_string(),
                source,
            })?
        } else {
            debug!(path = %path.display(), "No stored quality preferences, using defaults");
            QualityPreferences::default()
        };

        Ok(Self {
            preferences,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn preferences(&self) -> &QualityPreferences {
        &self.preferences
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_automatic_quality(&mut self, enabled: bool) {
        self.preferences.automatic_quality = enabled;
        info!(automatic_quality = enabled, "Automatic quality preference updated");
        self.persist();
    }

    /// Remember `quality` as the last explicit pick. `unknown` cannot be
    /// picked; it is refused and `false` is returned.
    pub fn set_last_chosen_quality(&mut self, quality: Option<QualityLabel>) -> bool {
        if quality == Some(QualityLabel::Unknown) {
            debug!("Refusing to store unknown as last chosen quality");
            return false;
        }

        self.preferences.last_chosen_quality = quality;
        info!(last_chosen_quality = ?quality, "Last chosen quality updated");
        self.persist();
        true
    }

    /// Write the current state to the backing file, if there is one.
    pub fn save(&self) -> PreferenceResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source| PreferenceError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents =
            serde_json::to_string_pretty(&self.preferences).map_err(|source| PreferenceError::Json {
                path: path.display().to_string(),
                source,
            })?;
        std::fs::write(path, contents).map_err(io_err)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to persist quality preferences: {}", e);
        }
    }
}
