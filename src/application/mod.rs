mod trends;

pub use trends::TrendService;
