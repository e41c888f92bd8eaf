use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::theme::ThemeName;
use crate::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ThemeRecord {
    theme: ThemeName,
}

/// Persists the selected theme as `{ "theme": "<name>" }`.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `data/settings.json` below the project root.
    pub fn for_project(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join("data").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved theme. A missing, unreadable or corrupt file yields the
    /// default theme; only the latter two are logged.
    pub fn load(&self) -> ThemeName {
        match self.try_load() {
            Ok(Some(theme)) => theme,
            Ok(None) => ThemeName::default(),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring theme settings");
                ThemeName::default()
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces the failure instead of recovering.
    pub fn try_load(&self) -> Result<Option<ThemeName>, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let record: ThemeRecord =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(record.theme))
    }

    pub fn save(&self, theme: ThemeName) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&ThemeRecord { theme }).map_err(|source| {
            SettingsError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| SettingsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(%theme, path = %self.path.display(), "theme saved");
        Ok(())
    }
}
