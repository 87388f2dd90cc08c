//! Configuration Management
//!
//! Persistent defaults for the cloudapi tool.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Project used when a request leaves it empty
    #[serde(default)]
    pub project: Option<String>,
    /// Location used when a request leaves it empty
    #[serde(default)]
    pub location: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudapi").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective project (CLI > config > environment)
    pub fn effective_project(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, self.project.as_deref(), "CLOUDAPI_PROJECT")
    }

    /// Get effective location (CLI > config > environment)
    pub fn effective_location(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, self.location.as_deref(), "CLOUDAPI_LOCATION")
    }

    /// Set project and save
    pub fn set_project(&mut self, project: &str) -> Result<()> {
        self.project = Some(project.to_string());
        self.save()
    }

    /// Set location and save
    pub fn set_location(&mut self, location: &str) -> Result<()> {
        self.location = Some(location.to_string());
        self.save()
    }
}

fn pick(flag: Option<&str>, configured: Option<&str>, env: &str) -> Option<String> {
    flag.or(configured)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env).ok().filter(|s| !s.is_empty()))
}
