use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MetricsSnapshot;

/// Scalar tracked in trend history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    GasPrice,
    BlockTime,
    Transactions,
}

impl Metric {
    /// JSON key used for this metric in API payloads
    pub fn key(&self) -> &'static str {
        match self {
            Metric::GasPrice => "gasPrice",
            Metric::BlockTime => "blockTime",
            Metric::Transactions => "transactions",
        }
    }

    pub fn value_of(&self, snapshot: &MetricsSnapshot) -> MetricValue {
        match self {
            Metric::GasPrice => MetricValue::Float(snapshot.gas_price),
            Metric::BlockTime => MetricValue::Float(snapshot.block_time),
            Metric::Transactions => MetricValue::Count(snapshot.transaction_count),
        }
    }
}

/// Metric reading; counts stay integral on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Float(f64),
}

/// One chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub value: MetricValue,
}

impl TrendPoint {
    pub fn from_snapshot(metric: Metric, snapshot: &MetricsSnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            time: snapshot.display_time(),
            value: metric.value_of(snapshot),
        }
    }
}

/// Project snapshots onto a single metric, keeping their order
pub fn project(metric: Metric, snapshots: &[MetricsSnapshot]) -> Vec<TrendPoint> {
    snapshots
        .iter()
        .map(|s| TrendPoint::from_snapshot(metric, s))
        .collect()
}

/// All three series over the same slice of history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTrends {
    pub gas_price: Vec<TrendPoint>,
    pub block_time: Vec<TrendPoint>,
    pub transactions: Vec<TrendPoint>,
}

impl AllTrends {
    pub fn from_snapshots(snapshots: &[MetricsSnapshot]) -> Self {
        Self {
            gas_price: project(Metric::GasPrice, snapshots),
            block_time: project(Metric::BlockTime, snapshots),
            transactions: project(Metric::Transactions, snapshots),
        }
    }
}

/// Summary of a floating-point series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl SeriesStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(min, max, sum), &v| {
                (min.min(v), max.max(v), sum + v)
            });

        Some(Self {
            average: sum / values.len() as f64,
            max,
            min,
        })
    }
}

/// Summary of a count series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountStats {
    pub average: f64,
    pub max: u64,
    pub min: u64,
    pub total: u64,
}

impl CountStats {
    fn from_values(values: &[u64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let (min, max, total) = rest
            .iter()
            .fold((first, first, first), |(min, max, total), &v| {
                (min.min(v), max.max(v), total.saturating_add(v))
            });

        Some(Self {
            average: total as f64 / values.len() as f64,
            max,
            min,
            total,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsStats {
    pub gas_price: SeriesStats,
    pub block_time: SeriesStats,
    pub transactions: CountStats,
}

impl MetricsStats {
    /// `None` for an empty slice
    pub fn from_snapshots(snapshots: &[MetricsSnapshot]) -> Option<Self> {
        let gas_prices: Vec<f64> = snapshots.iter().map(|s| s.gas_price).collect();
        let block_times: Vec<f64> = snapshots.iter().map(|s| s.block_time).collect();
        let transactions: Vec<u64> = snapshots.iter().map(|s| s.transaction_count).collect();

        Some(Self {
            gas_price: SeriesStats::from_values(&gas_prices)?,
            block_time: SeriesStats::from_values(&block_times)?,
            transactions: CountStats::from_values(&transactions)?,
        })
    }
}
