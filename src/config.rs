//! Config file handling
//!
//! `config.toml` lives in `$SSM_ENV_CONFIG_DIR`, or `ssm-env/` under the
//! platform config directory:
//!
//! ```toml
//! region = "eu-west-1"
//! endpoint = "http://localhost:4566"
//! profile = "ops"
//!
//! [defaults]
//! options = ["-isolate"]
//! ```

use std::path::{Path, PathBuf};

use crate::errors::{Result, SsmEnvError};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "SSM_ENV_CONFIG_DIR";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Flags prepended to every invocation
    pub default_options: Vec<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub profile: Option<String>,
}

impl Config {
    /// Load `config.toml`; a missing file is not an error
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_dir())
    }

    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join("config.toml");

        if !config_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| SsmEnvError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse config file content
    pub fn parse(content: &str) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| SsmEnvError::Config(format!("Invalid config TOML: {}", e)))?;

        let default_options = toml_value
            .get("defaults")
            .and_then(|d| d.get("options"))
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let string_key = |key: &str| {
            toml_value
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Ok(Self {
            default_options,
            region: string_key("region"),
            endpoint: string_key("endpoint"),
            profile: string_key("profile"),
        })
    }

    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("ssm-env"))
            .unwrap_or_else(|| PathBuf::from(".ssm-env"))
    }
}
