// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for dormitory tools (uses platform config dir).

use directories::ProjectDirs;
use dorm_app_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Store configs as JSON files, one file per key.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/dorm`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("ua", "dorm8", "Dorm")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Create a store rooted at an explicit directory, creating it if needed.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory the store writes into.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ConfigError::Other(format!("invalid config key `{key}`")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dorm_app_core::config::ConfigService;
    use dorm_app_core::prefs::{DormPrefs, ExportQuoting, PREFS_KEY};

    #[test]
    fn prefs_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());

        let mut prefs = DormPrefs::default();
        prefs.export_quoting = ExportQuoting::Standard;
        svc.save(PREFS_KEY, &prefs).unwrap();

        assert!(dir.path().join("dorm_prefs.json").is_file());
        let loaded: DormPrefs = svc.load(PREFS_KEY).unwrap().unwrap();
        assert_eq!(loaded.export_quoting, ExportQuoting::Standard);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path()).unwrap();
        assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path()).unwrap();
        assert!(matches!(
            store.save_raw("../escape", b"{}"),
            Err(ConfigError::Other(_))
        ));
    }
}
