//! Configuration management for Badger

pub mod schema;

pub use schema::{valid_artifact_name, BadgeConfig, Config};

use crate::error::{BadgerError, BadgerResult};
use crate::store::StoreConfig;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("badger")
            .join("config.toml")
    }

    /// Default cache root, used when the config enables caching without a path
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("badger")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> BadgerResult<Config> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| BadgerError::io("reading config file", e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| BadgerError::ConfigInvalid {
                path: self.config_path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.config_path.display(), badges = config.badges.len(), "config loaded");
        Ok(config.sanitize())
    }

    /// Derive the store configuration from a loaded config.
    ///
    /// A relative cache path is anchored at the config file's directory, so
    /// a shared config always points every worker at the same store.
    pub fn store_config(&self, config: &Config) -> StoreConfig {
        let root = config.cache.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.config_dir().join(path)
            }
        });
        StoreConfig { root }
    }

    fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the managed config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));

        let config = manager.load().await.unwrap();
        assert!(config.enabled);
        assert!(config.badges.is_empty());
    }

    #[tokio::test]
    async fn load_parses_and_sanitizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            cache = "store"

            [badges.cov]
            name = "cov.svg"

            [badges.bad]
            name = "nope"
            "#,
        )
        .unwrap();

        let manager = ConfigManager::with_path(path);
        let config = manager.load().await.unwrap();

        assert_eq!(config.badges.len(), 1);
        assert!(config.badges.contains_key("cov"));
    }

    #[tokio::test]
    async fn load_rejects_broken_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "enabled = maybe").unwrap();

        let manager = ConfigManager::with_path(path);
        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, BadgerError::ConfigInvalid { .. }));
    }

    #[test]
    fn store_config_anchors_relative_paths() {
        let manager = ConfigManager::with_path(PathBuf::from("/etc/badger/config.toml"));

        let mut config = Config::default();
        config.cache = Some(PathBuf::from("store"));
        assert_eq!(
            manager.store_config(&config).root,
            Some(PathBuf::from("/etc/badger/store"))
        );

        config.cache = Some(PathBuf::from("/var/cache/badger"));
        assert_eq!(
            manager.store_config(&config).root,
            Some(PathBuf::from("/var/cache/badger"))
        );

        config.cache = None;
        assert_eq!(manager.store_config(&config).root, None);
    }
}
