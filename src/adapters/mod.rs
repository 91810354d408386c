pub mod rpc;
pub mod store;

pub use rpc::{RpcConfig, RpcNetworkSource};
pub use store::MemoryStore;
