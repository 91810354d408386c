mod memory;

pub use memory::{MemoryStore, DEFAULT_HISTORY_SIZE};
