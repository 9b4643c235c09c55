//! Backup stop sentinel body
//!
//! When a base backup finishes uploading, a small JSON object is written at
//! [`StorageLayout::basebackup_sentinel`](crate::StorageLayout::basebackup_sentinel).
//! Its presence marks the backup as complete; its body records where the
//! backup stopped, which the key name alone cannot carry.
//!
//! ```json
//! {"wal_segment_backup_stop": "000000010000000000000004",
//!  "wal_segment_offset_backup_stop": "00000020",
//!  "expanded_size_bytes": 12345}
//! ```

use serde::{Deserialize, Serialize};
use walvault_core::{is_hex_component, is_segment_file_name, BackupDescriptor, Error, Result};

/// Content type the sentinel object is stored with
pub const SENTINEL_CONTENT_TYPE: &str = "application/json";

/// Body of a backup stop sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStopSentinel {
    /// WAL segment file name active when the backup stopped
    pub wal_segment_backup_stop: String,
    /// Hex byte offset within the stop segment
    pub wal_segment_offset_backup_stop: String,
    /// Uncompressed size of the backed up cluster
    pub expanded_size_bytes: u64,
}

impl BackupStopSentinel {
    /// Create a sentinel body, validating the stop position's shape
    pub fn new(
        wal_segment_backup_stop: impl Into<String>,
        wal_segment_offset_backup_stop: impl Into<String>,
        expanded_size_bytes: u64,
    ) -> Result<Self> {
        let sentinel = BackupStopSentinel {
            wal_segment_backup_stop: wal_segment_backup_stop.into(),
            wal_segment_offset_backup_stop: wal_segment_offset_backup_stop.into(),
            expanded_size_bytes,
        };
        sentinel.validate()?;
        Ok(sentinel)
    }

    /// Check the stop segment and offset are well-shaped
    pub fn validate(&self) -> Result<()> {
        if !is_segment_file_name(&self.wal_segment_backup_stop) {
            return Err(Error::Validation(format!(
                "wal_segment_backup_stop {:?} is not a 24-hex-digit file name",
                self.wal_segment_backup_stop
            )));
        }
        if !is_hex_component(&self.wal_segment_offset_backup_stop) {
            return Err(Error::Validation(format!(
                "wal_segment_offset_backup_stop {:?} is not 8 hex digits",
                self.wal_segment_offset_backup_stop
            )));
        }
        Ok(())
    }

    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a fetched body
    ///
    /// # Errors
    ///
    /// `Error::Serialization` for malformed JSON or missing fields,
    /// `Error::Validation` for a badly shaped stop position.
    pub fn from_json(body: &str) -> Result<Self> {
        let sentinel: BackupStopSentinel = serde_json::from_str(body)?;
        sentinel.validate()?;
        Ok(sentinel)
    }

    /// Descriptor with the stop position and size filled in
    pub fn apply_to(&self, backup: BackupDescriptor) -> BackupDescriptor {
        backup
            .with_stop(
                self.wal_segment_backup_stop.clone(),
                self.wal_segment_offset_backup_stop.clone(),
            )
            .with_expanded_size(self.expanded_size_bytes)
    }
}

/// Outcome of fetching a sentinel body from the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentinelFetch {
    /// The body was read
    Body(String),
    /// The fetch gave up after its retries
    TimedOut,
}

impl SentinelFetch {
    /// Fold the outcome into a descriptor
    ///
    /// A timed-out fetch marks the sentinel-carried fields as timed out
    /// rather than failing, so a listing can still show the backup.
    pub fn apply_to(&self, backup: BackupDescriptor) -> Result<BackupDescriptor> {
        match self {
            SentinelFetch::Body(body) => Ok(BackupStopSentinel::from_json(body)?.apply_to(backup)),
            SentinelFetch::TimedOut => Ok(backup.with_detail_timed_out()),
        }
    }
}
