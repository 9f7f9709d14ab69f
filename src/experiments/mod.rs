pub mod storage;
pub mod types;

pub use storage::{load_log, save_log, FileStore, KeyValueStore, MemoryStore};
pub use types::{ExperimentEntry, ExperimentLog};
