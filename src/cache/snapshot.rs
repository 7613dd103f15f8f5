//! Snapshot persistence for warm starts.
//!
//! One JSON document holding the full price book plus refresh bookkeeping,
//! written with the write-to-temp-then-rename pattern so a crash mid-write
//! never leaves a torn file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PriceBook;
use crate::error::{Error, Result};

/// On-disk snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub cache: PriceBook,
    pub last_refresh: Option<DateTime<Utc>>,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    /// Write the snapshot atomically.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).map_err(Error::persistence)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(Error::persistence)?;
            }
        }

        // Write to temp file first for atomicity
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(Error::persistence)?;

        // Helper to clean up temp file on failure
        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            Error::persistence(e)
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;

        // Atomic rename
        fs::rename(&temp_path, path).map_err(cleanup_and_err)?;

        Ok(())
    }

    /// Read a snapshot. An absent file is a cold start, not an error.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::persistence(err)),
        };
        let snapshot = serde_json::from_str(&raw).map_err(Error::persistence)?;
        Ok(Some(snapshot))
    }
}
