use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{
    project, AllTrends, Metric, MetricsSnapshot, MetricsStats, NetworkMetrics, TimeWindow,
    TrendPoint,
};
use crate::ports::{MetricStore, NetworkSource, SourceError};

/// Main application service for metrics trends.
///
/// Owns the handles to the trend store and the live network source; one
/// instance is built at startup and shared by the snapshot loop and the
/// HTTP handlers.
pub struct TrendService {
    store: Arc<dyn MetricStore>,
    source: Arc<dyn NetworkSource>,
}

impl TrendService {
    pub fn new(store: Arc<dyn MetricStore>, source: Arc<dyn NetworkSource>) -> Self {
        Self { store, source }
    }

    /// Snapshots inside the window, oldest first
    pub fn history(&self, window: TimeWindow) -> Vec<MetricsSnapshot> {
        self.store.history(window.as_duration())
    }

    pub fn trend(&self, metric: Metric, window: TimeWindow) -> Vec<TrendPoint> {
        project(metric, &self.history(window))
    }

    /// All three series, projected from a single read of the history
    pub fn all_trends(&self, window: TimeWindow) -> AllTrends {
        AllTrends::from_snapshots(&self.history(window))
    }

    /// `None` when the window holds no snapshots yet
    pub fn stats(&self, window: TimeWindow) -> Option<MetricsStats> {
        MetricsStats::from_snapshots(&self.history(window))
    }

    pub fn size(&self) -> usize {
        self.store.len()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn latest(&self) -> Option<MetricsSnapshot> {
        self.store.latest()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    #[cfg(test)]
    pub fn append(&self, snapshot: MetricsSnapshot) {
        self.store.append(snapshot);
    }

    /// Fetch live metrics and append one snapshot.
    ///
    /// A failed fetch appends nothing.
    pub async fn record_snapshot(&self) -> Result<MetricsSnapshot, SourceError> {
        let metrics = match self.source.fetch_metrics().await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!("Skipping snapshot, failed to fetch network metrics: {}", e);
                return Err(e);
            }
        };

        let snapshot = metrics.into_snapshot();
        self.store.append(snapshot.clone());

        debug!(
            block = snapshot.block_number,
            gas_price = snapshot.gas_price,
            history_size = self.store.len(),
            "Recorded metrics snapshot"
        );

        Ok(snapshot)
    }

    /// Current network metrics, or an offline record if the node is unreachable
    pub async fn network_metrics(&self) -> NetworkMetrics {
        match self.source.fetch_metrics().await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!("Failed to fetch network metrics: {}", e);
                NetworkMetrics::offline(Utc::now())
            }
        }
    }

    /// Whether the node answers, and with the expected chain id if one is set
    pub async fn is_connected(&self, expected_chain_id: Option<u64>) -> bool {
        match self.source.chain_id().await {
            Ok(chain_id) => match expected_chain_id {
                Some(expected) if expected != chain_id => {
                    info!("Node reports chain id {}, expected {}", chain_id, expected);
                    false
                }
                _ => true,
            },
            Err(e) => {
                warn!("Provider connection check failed: {}", e);
                false
            }
        }
    }
}
