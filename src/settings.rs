//! Editor preferences persisted as TOML under the `.lorabench` directory.
//!
//! These are editor-side conveniences only (recent files, dialog start
//! directory, preview toggles) and never affect the training configs
//! themselves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the editor settings.
pub const SETTINGS_FILE_NAME: &str = "config.toml";

/// Upper bound on the recently opened configs list.
pub const MAX_RECENT_FILES: usize = 10;

/// Errors that can occur while loading or persisting editor settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for editor settings")]
    NoConfigDir,
    /// Failed to create the settings directory.
    #[error("Failed to create settings directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read the settings file.
    #[error("Failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the settings file.
    #[error("Failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for this schema.
    #[error("Failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The settings could not be serialized to TOML.
    #[error("Failed to serialize settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Editor preferences that survive restarts.
///
/// Unknown keys in the file are ignored so older builds can open settings
/// written by newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Most-recent-first list of previously opened config files.
    pub recent_files: Vec<PathBuf>,
    /// Directory the next open/save dialog starts in.
    pub last_open_dir: Option<PathBuf>,
    /// Whether the YAML preview panel is shown.
    pub show_yaml_preview: bool,
    /// Whether the YAML preview wraps long lines.
    pub wrap_preview: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            last_open_dir: None,
            show_yaml_preview: true,
            wrap_preview: false,
        }
    }
}

impl EditorSettings {
    /// Record `path` as the most recently opened config.
    ///
    /// Re-opening a known file moves it to the front instead of duplicating
    /// it, and the list never grows past [`MAX_RECENT_FILES`].
    pub fn push_recent(&mut self, path: &Path) {
        let path = path.to_path_buf();
        self.recent_files.retain(|known| known != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Drop `path` from the recents list, e.g. after it failed to open.
    pub fn remove_recent(&mut self, path: &Path) {
        self.recent_files.retain(|known| known != path);
    }

    /// Remember the directory containing `file_path` for the next dialog.
    pub fn note_open_dir(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_open_dir = Some(parent.to_path_buf());
        }
    }

    /// Bring loaded values back into the supported shape.
    pub fn normalized(mut self) -> Self {
        let mut seen: Vec<PathBuf> = Vec::new();
        self.recent_files.retain(|path| {
            if seen.contains(path) {
                return false;
            }
            seen.push(path.clone());
            true
        });
        self.recent_files.truncate(MAX_RECENT_FILES);
        self
    }
}

/// Resolve the settings file path inside the `.lorabench` root.
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(SETTINGS_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<EditorSettings, SettingsError> {
    let path = settings_path()?;
    load_from(&path)
}

/// Persist settings to disk, overwriting any previous contents.
pub fn save(settings: &EditorSettings) -> Result<(), SettingsError> {
    let path = settings_path()?;
    save_to_path(settings, &path)
}

fn load_from(path: &Path) -> Result<EditorSettings, SettingsError> {
    if !path.exists() {
        return Ok(EditorSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text)
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
        .map(EditorSettings::normalized)
}

fn save_to_path(settings: &EditorSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| SettingsError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> SettingsError {
    match error {
        app_dirs::AppDirError::NoBaseDir => SettingsError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            SettingsError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::ConfigBaseGuard;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let settings = load_or_default().unwrap();
        assert!(settings.recent_files.is_empty());
        assert!(settings.show_yaml_preview);
        assert!(!settings.wrap_preview);
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let mut settings = EditorSettings::default();
        settings.push_recent(Path::new("/configs/sdxl_lora.yaml"));
        settings.last_open_dir = Some(PathBuf::from("/configs"));
        settings.wrap_preview = true;
        save(&settings).unwrap();
        let loaded = load_or_default().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let path = settings_path().unwrap();
        std::fs::write(&path, "wrap_preview = true\ntheme = \"dark\"\n").unwrap();
        let loaded = load_or_default().unwrap();
        assert!(loaded.wrap_preview);
        assert!(loaded.show_yaml_preview);
    }

    #[test]
    fn oversized_recents_list_is_trimmed_on_load() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let entries: Vec<String> = (0..12)
            .map(|index| format!("\"/configs/run_{index}.yaml\""))
            .chain(std::iter::once("\"/configs/run_0.yaml\"".to_string()))
            .collect();
        let text = format!("recent_files = [{}]\n", entries.join(", "));
        std::fs::write(settings_path().unwrap(), text).unwrap();
        let loaded = load_or_default().unwrap();
        assert_eq!(loaded.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(loaded.recent_files[0], PathBuf::from("/configs/run_0.yaml"));
    }

    #[test]
    fn push_recent_moves_known_files_to_the_front() {
        let mut settings = EditorSettings::default();
        for index in 0..12 {
            settings.push_recent(Path::new(&format!("/configs/run_{index}.yaml")));
        }
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        settings.push_recent(Path::new("/configs/run_5.yaml"));
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.recent_files[0], PathBuf::from("/configs/run_5.yaml"));
        let matches = settings
            .recent_files
            .iter()
            .filter(|path| path.ends_with("run_5.yaml"))
            .count();
        assert_eq!(matches, 1);
    }
}
