mod atomic;
mod snapshot;

pub use snapshot::{SnapshotFile, FORMAT_VERSION, MAGIC};
