//! Configuration management for the route filter
//!
//! Handles loading, defaulting and validation of the YAML configuration file.

use crate::keys::Key;
use crate::registry::{GtfsRoutesRegistry, RouteRegistry, StaticRegistry};
use crate::storage::FILTER_STATE_KEY;
use crate::types::RouteId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Where and under which key the filter state is stored
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Database directory; defaults to the application state directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Keep state in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            path: None,
            ephemeral: false,
        }
    }
}

/// Source of the known route list
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// GTFS `routes.txt` to read route ids from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtfs_routes: Option<PathBuf>,
    /// Inline route list, used when no GTFS file is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<RouteId>>,
}

impl RoutesConfig {
    /// Resolve the configured registry and read its route list
    ///
    /// A GTFS file that fails to load leaves the registry unavailable.
    pub fn load_routes(&self) -> Option<Vec<RouteId>> {
        if let Some(path) = &self.gtfs_routes {
            return match GtfsRoutesRegistry::load(path) {
                Ok(registry) => registry.route_ids(),
                Err(e) => {
                    warn!("Route registry unavailable: {}", e);
                    None
                }
            };
        }

        match &self.ids {
            Some(ids) => StaticRegistry::new(ids.clone()).route_ids(),
            None => StaticRegistry::unavailable().route_ids(),
        }
    }
}

/// Keyboard bindings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    #[serde(default = "default_cancel_key")]
    pub cancel: Key,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            cancel: default_cancel_key(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, or defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            anyhow::bail!("storage.key cannot be empty");
        }

        if let Some(ids) = &self.routes.ids {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    anyhow::bail!("routes.ids contains route {} more than once", id);
                }
            }
        }

        if self.routes.gtfs_routes.is_some() && self.routes.ids.is_some() {
            warn!("Both routes.gtfs_routes and routes.ids set; the GTFS file wins");
        }

        Ok(())
    }
}

// Default value functions
fn default_storage_key() -> String { FILTER_STATE_KEY.to_string() }
fn default_cancel_key() -> Key { Key::Escape }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_from_empty_document() {
        let file = write_config("{}\n");
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.storage.key, "filterState");
        assert_eq!(config.keys.cancel, Key::Escape);
        assert!(config.routes.load_routes().is_none());
    }

    #[test]
    fn test_cancel_key_accepts_short_names() {
        let keys: KeysConfig = serde_yaml::from_str("cancel: esc\n").unwrap();
        assert_eq!(keys.cancel, Key::Escape);

        let keys: KeysConfig = serde_yaml::from_str("cancel: Esc\n").unwrap();
        assert_eq!(keys.cancel, Key::Escape);

        let file = write_config("keys:\n  cancel: q\n");
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.keys.cancel, Key::Char('q'));
    }

    #[test]
    fn test_unknown_cancel_key_rejected() {
        let file = write_config("keys:\n  cancel: F13\n");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_inline_routes() {
        let file = write_config("routes:\n  ids: [2, 3, 21, 205]\nstorage:\n  ephemeral: true\n");
        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.storage.ephemeral);
        assert_eq!(config.routes.load_routes().map(|r| r.len()), Some(4));
    }

    #[test]
    fn test_rejects_duplicate_routes() {
        let file = write_config("routes:\n  ids: [2, 2]\n");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_empty_key() {
        let file = write_config("storage:\n  key: \"\"\n");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_gtfs_file_leaves_registry_unavailable() {
        let routes = RoutesConfig {
            gtfs_routes: Some(PathBuf::from("/nonexistent/routes.txt")),
            ids: Some(vec![RouteId(2)]),
        };
        assert!(routes.load_routes().is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_or_default("/nonexistent/route-filter.yaml").unwrap();
        assert!(!config.storage.ephemeral);
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.routes.ids = Some(vec![RouteId(7)]);
        config.keys.cancel = Key::Char('q');
        config.save(file.path()).unwrap();

        let loaded = AppConfig::load(file.path()).unwrap();
        assert_eq!(loaded.routes.ids, Some(vec![RouteId(7)]));
        assert_eq!(loaded.keys.cancel, Key::Char('q'));
    }
}
