use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MetricsSnapshot;

/// Reachability of the upstream node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Healthy,
    Offline,
}

/// Live network metrics as read from the node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub best_block: u64,
    pub best_block_hash: String,
    pub block_time: f64,
    pub gas_price: f64,
    pub recent_transactions: u64,
    pub status: NetworkStatus,
    pub timestamp: DateTime<Utc>,
}

impl NetworkMetrics {
    /// Zeroed record reported while the node cannot be reached.
    /// Never recorded into trend history.
    pub fn offline(timestamp: DateTime<Utc>) -> Self {
        Self {
            best_block: 0,
            best_block_hash: String::new(),
            block_time: 0.0,
            gas_price: 0.0,
            recent_transactions: 0,
            status: NetworkStatus::Offline,
            timestamp,
        }
    }

    pub fn into_snapshot(self) -> MetricsSnapshot {
        MetricsSnapshot::new(
            self.timestamp,
            self.best_block,
            self.gas_price,
            self.block_time,
            self.recent_transactions,
        )
    }
}
