//! Durable snapshots of the attribute store.
//!
//! Snapshots are MessagePack-encoded and written atomically: the bytes go to
//! a temp file in the target directory which is then renamed over the
//! destination, so a crash mid-write never leaves a torn snapshot.

use crate::core::{EnumError, Result};
use crate::storage::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use super::MemoryStore;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub tables: HashMap<String, Table>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub created_at: u64,
    pub table_count: usize,
    pub row_count: usize,
}

impl StoreSnapshot {
    fn new(tables: HashMap<String, Table>) -> Self {
        let table_count = tables.len();
        let row_count = tables.values().map(Table::row_count).sum();
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            version: SNAPSHOT_VERSION,
            tables,
            metadata: SnapshotMetadata {
                created_at,
                table_count,
                row_count,
            },
        }
    }
}

impl MemoryStore {
    /// Write a snapshot of every table to `path`.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = StoreSnapshot::new(self.tables_snapshot()?);
        let bytes = rmp_serde::to_vec(&snapshot)
            .map_err(|e| EnumError::SnapshotError(format!("encode failed: {e}")))?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir)?;
        }
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new()?,
        };
        tmp.write_all(&bytes)?;
        tmp.persist(path)
            .map_err(|e| EnumError::IoError(e.to_string()))?;

        info!(
            path = %path.display(),
            tables = snapshot.metadata.table_count,
            rows = snapshot.metadata.row_count,
            "saved store snapshot"
        );
        Ok(())
    }

    /// Load a store from a snapshot written by [`MemoryStore::save_snapshot`].
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let snapshot: StoreSnapshot = rmp_serde::from_slice(&bytes)
            .map_err(|e| EnumError::SnapshotError(format!("decode failed: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EnumError::SnapshotError(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let store = MemoryStore::new();
        store.replace_tables(snapshot.tables)?;
        info!(path = %path.display(), "loaded store snapshot");
        Ok(store)
    }

    /// Human-readable JSON dump of every table, for inspection and export.
    pub fn export_json(&self) -> Result<String> {
        let tables = self.tables_snapshot()?;
        serde_json::to_string_pretty(&tables)
            .map_err(|e| EnumError::SnapshotError(format!("json export failed: {e}")))
    }
}
