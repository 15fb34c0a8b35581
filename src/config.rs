//! JSON-backed config store.
//!
//! Settings, the user profile and the process ledger live as small JSON
//! documents under a per-user config directory. Persistence is best effort:
//! a missing document decodes to its default value, and callers log and
//! carry on when a write fails.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, ShellError};

pub const SETTINGS_DOC: &str = "settings";
pub const PROFILE_DOC: &str = "profile";
pub const PROCESSES_DOC: &str = "processes";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct SettingsData {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_mouse_capture")]
    pub mouse_capture: bool,
}

fn default_mouse_capture() -> bool {
    true
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            mouse_capture: true,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ProfileData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the platform config directory (falling back to the
    /// working directory when none is available).
    pub fn open_default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join("term-desk"))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Load a document, returning `T::default()` when it does not exist yet.
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.doc_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(ShellError::ConfigRead { path, source: err }),
        };
        serde_json::from_str(&raw).map_err(|err| ShellError::ConfigDecode { path, source: err })
    }

    pub fn save<T: Serialize>(&self, name: &'static str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string_pretty(value)
            .map_err(|err| ShellError::ConfigEncode { name, source: err })?;
        let path = self.doc_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ShellError::ConfigWrite {
                path: path.clone(),
                source: err,
            })?;
        }
        fs::write(&path, encoded).map_err(|err| ShellError::ConfigWrite { path, source: err })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_decodes_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(tmp.path().join("term-desk"));
        let settings: SettingsData = store.load(SETTINGS_DOC).unwrap();
        assert_eq!(settings, SettingsData::default());
        assert!(settings.mouse_capture);
    }

    #[test]
    fn settings_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(tmp.path().join("term-desk"));
        let saved = SettingsData {
            api_key: "secret".into(),
            mouse_capture: false,
        };
        store.save(SETTINGS_DOC, &saved).unwrap();
        let loaded: SettingsData = store.load(SETTINGS_DOC).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn profile_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(tmp.path());
        let saved = ProfileData {
            name: "Ada".into(),
            interests: vec!["chess".into(), "retrocomputing".into()],
        };
        store.save(PROFILE_DOC, &saved).unwrap();
        let loaded: ProfileData = store.load(PROFILE_DOC).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn corrupt_document_reports_decode_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(tmp.path());
        std::fs::write(tmp.path().join("settings.json"), "{not json").unwrap();
        let result: Result<SettingsData> = store.load(SETTINGS_DOC);
        assert!(matches!(result, Err(ShellError::ConfigDecode { .. })));
    }
}
