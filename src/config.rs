use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::rpc::{DEFAULT_BLOCK_TIME_SAMPLE, DEFAULT_RECENT_TX_BLOCKS};
use crate::adapters::store::DEFAULT_HISTORY_SIZE;
use crate::adapters::RpcConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    /// Seconds between snapshots; 0 disables the snapshot loop
    pub snapshot_interval: u64,
    pub history_size: usize,
    pub recent_tx_blocks: u64,
    pub block_time_sample: u64,
    /// RPC request timeout in seconds
    pub rpc_timeout: u64,
    pub static_dir: Option<PathBuf>,
    pub log_level: String,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Defaults, then the TOML file named by `CHAINPULSE_CONFIG`, then env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("CHAINPULSE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        if let Some(port) = env_parse("CHAINPULSE_PORT") {
            self.port = port;
        }
        if let Ok(url) = env::var("CHAINPULSE_RPC_URL") {
            self.rpc_url = url;
        }
        if let Some(chain_id) = env_parse("CHAINPULSE_CHAIN_ID") {
            self.chain_id = Some(chain_id);
        }
        if let Some(interval) = env_parse("CHAINPULSE_SNAPSHOT_INTERVAL") {
            self.snapshot_interval = interval;
        }
        if let Some(size) = env_parse("CHAINPULSE_HISTORY_SIZE") {
            self.history_size = size;
        }
        if let Some(blocks) = env_parse("CHAINPULSE_RECENT_TX_BLOCKS") {
            self.recent_tx_blocks = blocks;
        }
        if let Some(sample) = env_parse("CHAINPULSE_BLOCK_TIME_SAMPLE") {
            self.block_time_sample = sample;
        }
        if let Some(timeout) = env_parse("CHAINPULSE_RPC_TIMEOUT") {
            self.rpc_timeout = timeout;
        }
        if let Ok(dir) = env::var("CHAINPULSE_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(level) = env::var("CHAINPULSE_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig::new(self.rpc_url.clone())
            .with_timeout(Duration::from_secs(self.rpc_timeout))
            .with_sampling(self.recent_tx_blocks, self.block_time_sample)
    }

    pub fn snapshot_period(&self) -> Option<Duration> {
        (self.snapshot_interval > 0).then(|| Duration::from_secs(self.snapshot_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            rpc_url: "https://rpc.arc.network".to_string(),
            chain_id: None,
            snapshot_interval: 60,
            history_size: DEFAULT_HISTORY_SIZE,
            recent_tx_blocks: DEFAULT_RECENT_TX_BLOCKS,
            block_time_sample: DEFAULT_BLOCK_TIME_SAMPLE,
            rpc_timeout: 10,
            static_dir: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.history_size, 1440);
        assert_eq!(config.snapshot_period(), Some(Duration::from_secs(60)));
        assert_eq!(config.rpc_config().recent_tx_blocks, 10);
        assert_eq!(config.rpc_config().block_time_sample, 50);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            rpc_url = "http://localhost:8545"
            chain_id = 31337
            history_size = 60
            snapshot_interval = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.chain_id, Some(31337));
        assert_eq!(config.history_size, 60);
        assert_eq!(config.snapshot_period(), None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("port = \"not a number\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/chainpulse.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
