//! Configuration management for DAW OSC GW
//!
//! Handles loading, validating and saving the YAML configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::surface::MirrorPolicy;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub osc: OscConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub mirroring: MirrorPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Datagram endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OscConfig {
    /// Host the DAW listens on
    #[serde(default = "default_host")]
    pub host: String,
    /// Local port receiving feedback from the DAW
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// DAW port receiving our commands
    #[serde(default = "default_send_port")]
    pub send_port: u16,
}

/// Control surface layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    /// Visible channel slots
    #[serde(default = "default_tracks_count")]
    pub tracks_count: u32,
    /// Page selected on startup
    #[serde(default)]
    pub default_bank: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files (console only when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            listen_port: default_listen_port(),
            send_port: default_send_port(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            tracks_count: default_tracks_count(),
            default_bank: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            info!(
                "No config file at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.osc.host.is_empty() {
            anyhow::bail!("osc.host cannot be empty");
        }
        if self.osc.listen_port == 0 {
            anyhow::bail!("osc.listen_port must be non-zero");
        }
        if self.osc.send_port == 0 {
            anyhow::bail!("osc.send_port must be non-zero");
        }
        if self.surface.tracks_count == 0 {
            anyhow::bail!("surface.tracks_count must be at least 1");
        }

        Ok(())
    }
}

// Default value functions
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_listen_port() -> u16 { 9000 }
fn default_send_port() -> u16 { 8000 }
fn default_tracks_count() -> u32 { 8 }
