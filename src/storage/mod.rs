pub mod persistence;
pub mod table;

pub use persistence::{SnapshotMetadata, StoreSnapshot};
pub use table::{Attributes, MemoryStore, StoreRecord, Table};
