use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{
    CATALOG_PATH, DEFAULT_LIMIT, MAX_BODY_CHARS, MAX_FEATURES, REQUEST_TIMEOUT_SECS,
    SERVER_ADDRESS, USER_AGENT,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankingConfig {
    /// Size of the vocabulary kept by the term-weighting index
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TesterConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_address")]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tester: TesterConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(CATALOG_PATH)
}

fn default_max_features() -> usize {
    MAX_FEATURES
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_max_body_chars() -> usize {
    MAX_BODY_CHARS
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_server_address() -> String {
    SERVER_ADDRESS.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_body_chars: default_max_body_chars(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.ranking.max_features == 0 {
            return Err("ranking.max_features must be at least 1".to_string());
        }
        if self.tester.timeout_secs == 0 {
            return Err("tester.timeout_secs must be at least 1".to_string());
        }
        if self.tester.max_body_chars == 0 {
            return Err("tester.max_body_chars must be at least 1".to_string());
        }
        if self.server.address.trim().is_empty() {
            return Err("server.address must not be empty".to_string());
        }
        Ok(())
    }

    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let f = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(f)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Missing file means defaults; a file that exists must parse.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load_from_yaml(path)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}
