pub mod metric_store;
pub mod network_source;

pub use metric_store::MetricStore;
pub use network_source::{NetworkSource, SourceError};
