use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::MetricsSnapshot;

/// Port for storing and retrieving metrics snapshots
#[allow(dead_code)]
pub trait MetricStore: Send + Sync {
    /// Append a snapshot, evicting the oldest entries beyond capacity
    fn append(&self, snapshot: MetricsSnapshot);

    /// Snapshots with `timestamp >= cutoff`, oldest first
    fn history_since(&self, cutoff: DateTime<Utc>) -> Vec<MetricsSnapshot>;

    /// Snapshots taken within `window` of now, oldest first
    fn history(&self, window: Duration) -> Vec<MetricsSnapshot> {
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.history_since(cutoff)
    }

    /// Get the most recent snapshot
    fn latest(&self) -> Option<MetricsSnapshot>;

    /// Maximum number of retained snapshots
    fn capacity(&self) -> usize;

    /// Remove every snapshot
    fn clear(&self);

    /// Get the number of stored snapshots
    fn len(&self) -> usize;

    /// Check if the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
