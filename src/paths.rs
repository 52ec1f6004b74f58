//! Application path management
//!
//! Resolves where the configuration file lives when `--config` is not given:
//!
//! - **Working directory**: `./config.yaml` wins when it exists (typical when
//!   running next to a checked-out config).
//! - **User config dir** (default): `<config dir>/daw-osc-gw/config.yaml`,
//!   e.g. `~/.config/daw-osc-gw` on Linux.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Application name used for directories
const APP_NAME: &str = "daw-osc-gw";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Default directory for log files
    pub logs_dir: PathBuf,
}

impl AppPaths {
    /// Detect paths from the current working directory and user dirs
    pub fn detect() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(&cwd, dirs::config_dir())
    }

    fn resolve(cwd: &Path, config_dir: Option<PathBuf>) -> Self {
        let cwd_config = cwd.join(CONFIG_FILE);
        if cwd_config.exists() {
            debug!("Using config from working directory: {}", cwd_config.display());
            return Self {
                config: cwd_config,
                logs_dir: cwd.join("logs"),
            };
        }

        let app_dir = config_dir.unwrap_or_else(|| cwd.to_path_buf()).join(APP_NAME);
        debug!("Using config from user directory: {}", app_dir.display());
        Self {
            config: app_dir.join(CONFIG_FILE),
            logs_dir: app_dir.join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cwd_config_wins() {
        let cwd = tempdir().unwrap();
        std::fs::write(cwd.path().join(CONFIG_FILE), "").unwrap();

        let paths = AppPaths::resolve(cwd.path(), Some(PathBuf::from("/nonexistent")));
        assert_eq!(paths.config, cwd.path().join(CONFIG_FILE));
        assert_eq!(paths.logs_dir, cwd.path().join("logs"));
    }

    #[test]
    fn test_falls_back_to_user_dir() {
        let cwd = tempdir().unwrap();
        let user = tempdir().unwrap();

        let paths = AppPaths::resolve(cwd.path(), Some(user.path().to_path_buf()));
        assert_eq!(paths.config, user.path().join(APP_NAME).join(CONFIG_FILE));
    }

    #[test]
    fn test_no_user_dir_uses_cwd() {
        let cwd = tempdir().unwrap();
        let paths = AppPaths::resolve(cwd.path(), None);
        assert_eq!(paths.config, cwd.path().join(APP_NAME).join(CONFIG_FILE));
    }
}
