//! Application path management for portable and installed modes.
//!
//! - **Portable mode**: a `.portable` marker file next to the executable keeps
//!   config, state database and logs in the executable's directory.
//! - **Installed mode** (default): everything lives under the platform data
//!   directory (`%APPDATA%\Route Filter`, `~/.local/share/Route Filter`).
//!
//! A `route-filter.yaml` in the working directory wins over both, which keeps
//! development runs self-contained.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Application name used for directories in installed mode
const APP_NAME: &str = "Route Filter";

/// Config file name
pub const CONFIG_FILE: &str = "route-filter.yaml";

/// Application paths for config, state, and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Path to the state directory (sled database)
    pub state_dir: PathBuf,
    /// Path to the logs directory
    pub logs_dir: PathBuf,
    /// Whether running in portable mode (files next to exe)
    pub is_portable: bool,
}

impl AppPaths {
    /// Detect the appropriate paths based on environment.
    ///
    /// Called before logging is initialized; nothing here logs above debug.
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self::resolve(&exe_dir, &cwd, dirs::data_dir())
    }

    /// Path selection with every input explicit
    pub fn resolve(exe_dir: &Path, cwd: &Path, data_dir: Option<PathBuf>) -> Self {
        if cwd.join(CONFIG_FILE).exists() {
            return Self::rooted_at(cwd);
        }

        if exe_dir.join(".portable").exists() {
            return Self::rooted_at(exe_dir);
        }

        let app_data = data_dir.unwrap_or_else(|| exe_dir.to_path_buf()).join(APP_NAME);
        Self {
            config: app_data.join(CONFIG_FILE),
            state_dir: app_data.join("state"),
            logs_dir: app_data.join("logs"),
            is_portable: false,
        }
    }

    fn rooted_at(dir: &Path) -> Self {
        Self {
            config: dir.join(CONFIG_FILE),
            state_dir: dir.join(".state"),
            logs_dir: dir.join("logs"),
            is_portable: true,
        }
    }

    /// Ensure the state and logs directories exist.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [&self.state_dir, &self.logs_dir] {
            if !dir.exists() {
                debug!("Creating directory: {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Get the sled database path (within state_dir)
    pub fn sled_db_path(&self) -> PathBuf {
        self.state_dir.join("sled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_installed_mode() {
        let exe = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();

        let paths = AppPaths::resolve(exe.path(), cwd.path(), Some(data.path().to_path_buf()));
        assert!(!paths.is_portable);
        assert_eq!(paths.config, data.path().join(APP_NAME).join(CONFIG_FILE));
        assert_eq!(paths.sled_db_path(), data.path().join(APP_NAME).join("state").join("sled"));
    }

    #[test]
    fn test_portable_marker() {
        let exe = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        std::fs::write(exe.path().join(".portable"), "").unwrap();

        let paths = AppPaths::resolve(exe.path(), cwd.path(), None);
        assert!(paths.is_portable);
        assert_eq!(paths.logs_dir, exe.path().join("logs"));
    }

    #[test]
    fn test_config_in_cwd_wins() {
        let exe = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        std::fs::write(exe.path().join(".portable"), "").unwrap();
        std::fs::write(cwd.path().join(CONFIG_FILE), "{}").unwrap();

        let paths = AppPaths::resolve(exe.path(), cwd.path(), None);
        assert_eq!(paths.config, cwd.path().join(CONFIG_FILE));
    }

    #[test]
    fn test_ensure_directories() {
        let root = TempDir::new().unwrap();
        let paths = AppPaths::rooted_at(root.path());
        paths.ensure_directories().unwrap();
        assert!(paths.state_dir.is_dir());
        assert!(paths.logs_dir.is_dir());
    }
}
