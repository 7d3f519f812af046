use crate::utils::error::{TrunkError, TrunkResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for the trunk CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme and host of the registry, without a path
    pub scheme_and_host: String,
    /// Default timeout for API requests in seconds
    pub timeout: u64,
    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme_and_host: "https://trunk.podhub.io".to_string(),
            timeout: 30,
            verify_ssl: true,
        }
    }
}

impl Config {
    /// Load configuration: config file when present, then the
    /// `TRUNK_SCHEME_AND_HOST` environment override
    pub fn load() -> TrunkResult<Self> {
        let file = match Self::config_path() {
            Ok(path) if path.exists() => Some(fs::read_to_string(&path).map_err(|e| {
                TrunkError::Config(format!("Failed to read config file: {}", e))
            })?),
            _ => None,
        };
        Self::from_sources(file.as_deref(), std::env::var("TRUNK_SCHEME_AND_HOST").ok())
    }

    fn from_sources(file: Option<&str>, env_host: Option<String>) -> TrunkResult<Self> {
        let mut config: Config = match file {
            Some(contents) => toml::from_str(contents)?,
            None => Self::default(),
        };
        if let Some(host) = env_host.filter(|h| !h.is_empty()) {
            config.scheme_and_host = host;
        }
        config.validate()?;
        Ok(config)
    }

    /// Path of the optional config file
    pub fn config_path() -> TrunkResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TrunkError::Config("Unable to find config directory".to_string()))?;
        Ok(config_dir.join("trunk").join("config.toml"))
    }

    fn validate(&self) -> TrunkResult<()> {
        if self.scheme_and_host.is_empty() {
            return Err(TrunkError::Config(
                "Registry URL cannot be empty".to_string(),
            ));
        }
        if !self.scheme_and_host.starts_with("http://")
            && !self.scheme_and_host.starts_with("https://")
        {
            return Err(TrunkError::Config(
                "Registry URL must start with http:// or https://".to_string(),
            ));
        }
        if self.scheme_and_host.parse::<reqwest::Url>().is_err() {
            return Err(TrunkError::Config("Invalid registry URL format".to_string()));
        }
        Ok(())
    }

    /// API base URL all endpoint paths resolve against
    pub fn base_url(&self) -> String {
        format!("{}/api/v1", self.scheme_and_host.trim_end_matches('/'))
    }

    /// Hostname that keys the credential store
    pub fn registry_host(&self) -> TrunkResult<String> {
        let url = self
            .scheme_and_host
            .parse::<reqwest::Url>()
            .map_err(|_| TrunkError::Config("Invalid registry URL format".to_string()))?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| TrunkError::Config("Registry URL has no host".to_string()))
    }
}
