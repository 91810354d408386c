use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time capture of the network's headline metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub block_number: u64,
    /// Gas price in Gwei
    pub gas_price: f64,
    /// Average block interval in seconds
    pub block_time: f64,
    /// Transactions seen across the most recent blocks
    pub transaction_count: u64,
}

impl MetricsSnapshot {
    pub fn new(
        timestamp: DateTime<Utc>,
        block_number: u64,
        gas_price: f64,
        block_time: f64,
        transaction_count: u64,
    ) -> Self {
        Self {
            timestamp,
            block_number,
            gas_price,
            block_time,
            transaction_count,
        }
    }

    /// Time of day in the server's local zone, as shown on chart axes
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
