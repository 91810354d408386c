pub mod metrics;
pub mod network;
pub mod snapshot;
pub mod window;

pub use metrics::{project, AllTrends, Metric, MetricsStats, TrendPoint};
pub use network::{NetworkMetrics, NetworkStatus};
pub use snapshot::MetricsSnapshot;
pub use window::TimeWindow;
