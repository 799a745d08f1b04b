//! Persisted editor preferences
//!
//! A small JSON file next to the project remembers the working directory
//! and the last scene, so the editor can restore the session on launch.
//! A missing or unreadable file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SETTINGS_FILE: &str = "editor_settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor preferences that survive a restart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorSettings {
    /// Directory file dialogs open in
    pub project_dir: PathBuf,
    /// Scene loaded or saved most recently
    pub last_loaded_scene: Option<PathBuf>,
    /// Re-open the last scene on launch
    pub auto_load_last_scene: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            last_loaded_scene: None,
            auto_load_last_scene: true,
        }
    }
}

impl EditorSettings {
    /// Load from the default settings file, defaulting when absent or
    /// malformed
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    info!(path = %path.display(), "loaded editor settings");
                    settings
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "settings file malformed, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save to the default settings file
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(Path::new(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "saved editor settings");
        Ok(())
    }

    /// Record a scene path as the most recent one
    pub fn remember_scene(&mut self, path: &Path) {
        self.last_loaded_scene = Some(path.to_path_buf());
        if let Some(dir) = path.parent() {
            self.project_dir = dir.to_path_buf();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = EditorSettings::default();
        settings.remember_scene(Path::new("/projects/demo/scene.json"));
        settings.auto_load_last_scene = false;
        settings.save_to(&path).unwrap();

        let loaded = EditorSettings::load_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.project_dir, PathBuf::from("/projects/demo"));
    }

    #[test]
    fn test_missing_file_defaults() {
        let loaded = EditorSettings::load_from(Path::new("/nonexistent/settings.json"));
        assert_eq!(loaded, EditorSettings::default());
    }

    #[test]
    fn test_malformed_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let loaded = EditorSettings::load_from(&path);
        assert_eq!(loaded, EditorSettings::default());
    }
}
