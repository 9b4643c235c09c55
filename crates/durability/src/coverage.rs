//! Archived WAL coverage
//!
//! Records which segments an archive holds in two projections: the exact
//! timeline-qualified position and the bare `(log, segment)` position. The
//! first answers "is this exact file archived", the second answers "is
//! this stretch of WAL archived on some timeline" and drives retention.

use crate::interval_set::{Interval, IntervalSet};
use crate::wal_file::WalFileName;
use tracing::debug;
use walvault_core::{BackupDescriptor, Error, Result, SegmentNumber};

/// Segments discovered in a WAL archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCoverage {
    exact: IntervalSet<u128>,
    positions: IntervalSet<u64>,
}

impl SegmentCoverage {
    /// Create empty coverage
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one segment
    pub fn record(&mut self, segment: &SegmentNumber) {
        self.exact.insert_point(segment.with_timeline());
        self.positions.insert_point(segment.without_timeline());
    }

    /// Record every segment from `first` to `last` inclusive
    ///
    /// # Errors
    ///
    /// `Error::Validation` if the two ends are on different timelines, and
    /// `Error::InvariantViolation` if `first` is after `last`.
    pub fn record_range(&mut self, first: &SegmentNumber, last: &SegmentNumber) -> Result<()> {
        if first.timeline() != last.timeline() {
            return Err(Error::Validation(format!(
                "segment range crosses timelines: {:?} to {:?}",
                first.timeline(),
                last.timeline()
            )));
        }
        self.exact
            .insert(first.with_timeline(), last.with_timeline())?;
        self.positions
            .insert(first.without_timeline(), last.without_timeline())?;
        Ok(())
    }

    /// Record a WAL-directory file, returning whether it was a segment
    ///
    /// History files carry no segment range and are ignored.
    pub fn record_file(&mut self, file: &WalFileName) -> bool {
        match file {
            WalFileName::Segment(seg) => {
                self.record(seg);
                true
            }
            other => {
                debug!(
                    target: "walvault::durability",
                    file = %other,
                    "Ignoring non-segment WAL file"
                );
                false
            }
        }
    }

    /// Whether this exact timeline-qualified segment is recorded
    pub fn covers(&self, segment: &SegmentNumber) -> bool {
        self.exact.contains(segment.with_timeline()).is_some()
    }

    /// Whether this `(log, segment)` position is recorded on any timeline
    pub fn covers_position(&self, segment: &SegmentNumber) -> bool {
        self.positions.contains(segment.without_timeline()).is_some()
    }

    /// Oldest recorded `(log, segment)` position
    pub fn oldest_position(&self) -> Option<u64> {
        self.positions.min()
    }

    /// Timeline-agnostic ranges, ascending
    pub fn position_ranges(&self) -> &[Interval<u64>] {
        self.positions.intervals()
    }

    /// Timeline-qualified ranges, ascending
    pub fn exact_ranges(&self) -> &[Interval<u128>] {
        self.exact.intervals()
    }
}

/// Oldest WAL position any of `backups` needs for restore
///
/// The minimum timeline-agnostic start position. Segments strictly below it
/// are not needed by any listed backup on any timeline. Returns `None` for
/// an empty iterator.
///
/// # Errors
///
/// Propagates the error of the first descriptor without a valid start
/// segment.
pub fn first_required_position<'a, I>(backups: I) -> Result<Option<u64>>
where
    I: IntoIterator<Item = &'a BackupDescriptor>,
{
    let mut horizon: Option<u64> = None;
    for backup in backups {
        let position = backup.start_segment()?.without_timeline();
        horizon = Some(horizon.map_or(position, |h| h.min(position)));
    }
    Ok(horizon)
}
