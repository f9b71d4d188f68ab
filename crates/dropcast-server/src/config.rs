//! Server configuration

use dropcast_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration, read from YAML and overridden by CLI flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model artifact path; `None` means `model_lgb.txt` beside the executable
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Accept browser requests from any origin instead of local dev origins only
    #[serde(default)]
    pub cors_any_origin: bool,
}

/// CLI values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model_path: Option<PathBuf>,
    pub listen: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("invalid config file {}: {}", config_path.display(), e))
            })?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model_path) = &overrides.model_path {
            config.model_path = Some(model_path.clone());
        }

        if let Some(listen) = &overrides.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = overrides.port {
            config.port = port;
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            listen: default_listen(),
            port: default_port(),
            cors_any_origin: false,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}
