//! On-disk storage for settings and learner progress
//!
//! Settings live in the platform config directory, learner progress in
//! the platform data directory, both as TOML files.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for storage operations
#[derive(Debug)]
pub enum StoreError {
    /// Failed to determine a base directory for the platform
    NoBaseDir,
    /// IO error while reading/writing a file
    Io(io::Error),
    /// Failed to parse a stored file
    Parse(toml::de::Error),
    /// Failed to serialize a value
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NoBaseDir => write!(f, "Could not determine storage directory"),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Parse(e) => write!(f, "Parse error: {}", e),
            StoreError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(e: toml::de::Error) -> Self {
        StoreError::Parse(e)
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(e: toml::ser::Error) -> Self {
        StoreError::Serialize(e)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "timelab", "timelab")
}

/// Path of the settings file (config directory)
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("settings.toml"))
}

/// Path of the learner progress file (data directory)
pub fn progress_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("progress.toml"))
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let value: T = toml::from_str(&contents)?;
    Ok(Some(value))
}

fn save_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load the settings file
///
/// Returns `None` if no settings have been saved yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_settings<T: DeserializeOwned>() -> Result<Option<T>, StoreError> {
    let path = settings_path().ok_or(StoreError::NoBaseDir)?;
    load_toml(&path)
}

/// Save the settings file
pub fn save_settings<T: Serialize>(settings: &T) -> Result<(), StoreError> {
    let path = settings_path().ok_or(StoreError::NoBaseDir)?;
    save_toml(&path, settings)
}

/// Load the learner progress file
pub fn load_progress<T: DeserializeOwned>() -> Result<Option<T>, StoreError> {
    let path = progress_path().ok_or(StoreError::NoBaseDir)?;
    load_toml(&path)
}

/// Save the learner progress file
pub fn save_progress<T: Serialize>(progress: &T) -> Result<(), StoreError> {
    let path = progress_path().ok_or(StoreError::NoBaseDir)?;
    save_toml(&path, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestValue {
        name: String,
        count: i32,
    }

    #[test]
    fn test_paths_exist_and_differ() {
        let settings = settings_path();
        let progress = progress_path();
        assert!(settings.is_some());
        assert!(progress.is_some());
        assert_ne!(settings, progress);
        assert!(settings
            .unwrap()
            .to_string_lossy()
            .contains("settings.toml"));
    }

    #[test]
    fn test_roundtrip_via_temp_file() {
        let dir = std::env::temp_dir().join("timelab-store-test");
        let path = dir.join("roundtrip.toml");
        let value = TestValue {
            name: "quiz".to_string(),
            count: 3,
        };

        save_toml(&path, &value).unwrap();
        let loaded: Option<TestValue> = load_toml(&path).unwrap();
        assert_eq!(loaded, Some(value));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_loads_none() {
        let path = std::env::temp_dir().join("timelab-store-test-missing.toml");
        let loaded: Option<TestValue> = load_toml(&path).unwrap();
        assert!(loaded.is_none());
    }
}
