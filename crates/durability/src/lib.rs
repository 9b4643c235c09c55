//! WAL archive bookkeeping for walvault
//!
//! This crate tracks what a WAL archive holds:
//!
//! - IntervalSet: sorted disjoint closed intervals with merge-on-insert
//! - SharedIntervalSet: the same behind a `parking_lot` read/write lock
//! - WalFileName: segment, timeline history and backup history file names
//! - SegmentCoverage: archived segments by exact and timeline-agnostic
//!   position, plus the retention horizon of a set of backups

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coverage;
pub mod interval_set;
pub mod shared;
pub mod wal_file;

pub use coverage::{first_required_position, SegmentCoverage};
pub use interval_set::{Interval, IntervalSet, SegmentIndex};
pub use shared::SharedIntervalSet;
pub use wal_file::WalFileName;
