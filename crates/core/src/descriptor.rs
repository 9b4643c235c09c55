//! Backup descriptor
//!
//! Exhaustively enumerates what can be known about one base backup. Not
//! every access path learns every field: a descriptor decoded from a key
//! path only knows where the backup started, and a listing that was asked
//! not to fetch details knows a little more. Each field is therefore a
//! [`Field`], which keeps "not fetched" and "fetch timed out" apart from
//! real data.

use crate::error::{Error, Result};
use crate::segment::{is_hex_component, is_segment_file_name, SegmentNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One descriptor field in one of three states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Field<T> {
    /// The value is known
    Known(T),
    /// Nobody tried to fetch the value
    Unknown,
    /// Fetching was attempted and gave up after retries
    TimedOut,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unknown
    }
}

impl<T> Field<T> {
    /// Borrow the value if known
    pub fn known(&self) -> Option<&T> {
        match self {
            Field::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Consume and return the value if known
    pub fn into_known(self) -> Option<T> {
        match self {
            Field::Known(v) => Some(v),
            _ => None,
        }
    }

    /// True for `Known`
    pub fn is_known(&self) -> bool {
        matches!(self, Field::Known(_))
    }

    /// True for `Unknown`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Unknown)
    }

    /// True for `TimedOut`
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Field::TimedOut)
    }

    /// Borrowing view
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Known(v) => Field::Known(v),
            Field::Unknown => Field::Unknown,
            Field::TimedOut => Field::TimedOut,
        }
    }

    /// Map a known value, preserving the other states
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Known(v) => Field::Known(f(v)),
            Field::Unknown => Field::Unknown,
            Field::TimedOut => Field::TimedOut,
        }
    }

    /// Borrow the value or fail with a validation error naming the field
    pub fn require(&self, name: &str) -> Result<&T> {
        match self {
            Field::Known(v) => Ok(v),
            Field::Unknown => Err(Error::Validation(format!("{} is unknown", name))),
            Field::TimedOut => Err(Error::Validation(format!(
                "{} could not be fetched (timeout)",
                name
            ))),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Unknown, Field::Known)
    }
}

/// Everything that can be known about one base backup
///
/// Field-by-field equality. Build with [`BackupDescriptor::from_start`] and
/// the `with_*` methods; once built it is not mutated by anything in this
/// workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDescriptor {
    /// Backup or object name
    pub name: Field<String>,
    /// Last-modified time of the backup's sentinel object
    pub last_modified: Field<DateTime<Utc>>,
    /// Uncompressed size of the backed up cluster
    pub expanded_size_bytes: Field<u64>,
    /// WAL segment file name active when the backup started
    pub wal_segment_backup_start: Field<String>,
    /// Hex byte offset within the start segment
    pub wal_segment_offset_backup_start: Field<String>,
    /// WAL segment file name active when the backup stopped
    pub wal_segment_backup_stop: Field<String>,
    /// Hex byte offset within the stop segment
    pub wal_segment_offset_backup_stop: Field<String>,
}

impl BackupDescriptor {
    /// Descriptor knowing only its start position
    ///
    /// This is exactly what a key path carries.
    pub fn from_start(segment: impl Into<String>, offset: impl Into<String>) -> Self {
        BackupDescriptor {
            wal_segment_backup_start: Field::Known(segment.into()),
            wal_segment_offset_backup_start: Field::Known(offset.into()),
            ..Default::default()
        }
    }

    /// Set the name (builder pattern)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Field::Known(name.into());
        self
    }

    /// Set the last-modified time (builder pattern)
    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Field::Known(at);
        self
    }

    /// Set the expanded size (builder pattern)
    pub fn with_expanded_size(mut self, bytes: u64) -> Self {
        self.expanded_size_bytes = Field::Known(bytes);
        self
    }

    /// Set the stop position (builder pattern)
    pub fn with_stop(mut self, segment: impl Into<String>, offset: impl Into<String>) -> Self {
        self.wal_segment_backup_stop = Field::Known(segment.into());
        self.wal_segment_offset_backup_stop = Field::Known(offset.into());
        self
    }

    /// Mark the sentinel-carried details as timed out
    ///
    /// Used when the sentinel body could not be fetched.
    pub fn with_detail_timed_out(mut self) -> Self {
        self.expanded_size_bytes = Field::TimedOut;
        self.wal_segment_backup_stop = Field::TimedOut;
        self.wal_segment_offset_backup_stop = Field::TimedOut;
        self
    }

    /// Validated start file name and offset
    ///
    /// Checks shape only: a 24-hex-digit file name (timeline zero included)
    /// and an 8-hex-digit offset. These two fields determine every key of
    /// the backup, so nothing else is required for encoding.
    pub fn start_identity(&self) -> Result<(&str, &str)> {
        let segment = self
            .wal_segment_backup_start
            .require("wal_segment_backup_start")?;
        let offset = self
            .wal_segment_offset_backup_start
            .require("wal_segment_offset_backup_start")?;
        if !is_segment_file_name(segment) {
            return Err(Error::Validation(format!(
                "wal_segment_backup_start {:?} is not a 24-hex-digit file name",
                segment
            )));
        }
        if !is_hex_component(offset) {
            return Err(Error::Validation(format!(
                "wal_segment_offset_backup_start {:?} is not 8 hex digits",
                offset
            )));
        }
        Ok((segment, offset))
    }

    /// Backup name, `base_<start segment>_<start offset>`
    pub fn backup_name(&self) -> Result<String> {
        let (segment, offset) = self.start_identity()?;
        Ok(format!("base_{}_{}", segment, offset))
    }

    /// Start segment as a [`SegmentNumber`]
    pub fn start_segment(&self) -> Result<SegmentNumber> {
        SegmentNumber::from_file_name(
            self.wal_segment_backup_start
                .require("wal_segment_backup_start")?,
        )
    }

    /// Stop segment as a [`SegmentNumber`]
    pub fn stop_segment(&self) -> Result<SegmentNumber> {
        SegmentNumber::from_file_name(
            self.wal_segment_backup_stop
                .require("wal_segment_backup_stop")?,
        )
    }
}
