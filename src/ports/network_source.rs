use async_trait::async_trait;

use crate::domain::NetworkMetrics;

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Port for reading live metrics from the chain
#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// Read the current best block, gas price, block time and recent volume
    async fn fetch_metrics(&self) -> Result<NetworkMetrics, SourceError>;

    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64, SourceError>;
}
