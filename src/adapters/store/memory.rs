use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::domain::MetricsSnapshot;
use crate::ports::MetricStore;

/// 24 hours at one snapshot per minute
pub const DEFAULT_HISTORY_SIZE: usize = 1440;

/// In-memory ring buffer of metrics snapshots.
///
/// Eviction is by count only: once `max_size` snapshots are held, every
/// append drops the oldest one regardless of its age.
pub struct MemoryStore {
    snapshots: RwLock<VecDeque<MetricsSnapshot>>,
    max_size: usize,
}

impl MemoryStore {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            snapshots: RwLock::new(VecDeque::with_capacity(max_size)),
            max_size,
        }
    }

    // Every mutation leaves the deque consistent, so a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<MetricsSnapshot>> {
        self.snapshots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<MetricsSnapshot>> {
        self.snapshots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl MetricStore for MemoryStore {
    fn append(&self, snapshot: MetricsSnapshot) {
        let mut snapshots = self.write();

        snapshots.push_back(snapshot);
        while snapshots.len() > self.max_size {
            snapshots.pop_front();
        }
    }

    fn history_since(&self, cutoff: DateTime<Utc>) -> Vec<MetricsSnapshot> {
        self.read()
            .iter()
            .filter(|s| s.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    fn latest(&self) -> Option<MetricsSnapshot> {
        self.read().back().cloned()
    }

    fn capacity(&self) -> usize {
        self.max_size
    }

    fn clear(&self) {
        self.write().clear();
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
