mod client;
mod parser;

use std::time::Duration;

pub use client::RpcNetworkSource;

pub const DEFAULT_RECENT_TX_BLOCKS: u64 = 10;
pub const DEFAULT_BLOCK_TIME_SAMPLE: u64 = 50;
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection and sampling settings for the JSON-RPC source
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub timeout: Duration,
    /// Blocks summed for the recent transaction count
    pub recent_tx_blocks: u64,
    /// Blocks spanned when averaging block time
    pub block_time_sample: u64,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_RPC_TIMEOUT,
            recent_tx_blocks: DEFAULT_RECENT_TX_BLOCKS,
            block_time_sample: DEFAULT_BLOCK_TIME_SAMPLE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sampling(mut self, recent_tx_blocks: u64, block_time_sample: u64) -> Self {
        self.recent_tx_blocks = recent_tx_blocks;
        self.block_time_sample = block_time_sample;
        self
    }
}
