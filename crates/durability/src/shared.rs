//! Thread-safe interval set handle
//!
//! Archive scanners run in parallel and each records the segments it finds.
//! Inserts take the write lock for the duration of one merge, lookups share
//! the read lock, so readers never observe a half-merged set.

use crate::interval_set::{Interval, IntervalSet, SegmentIndex};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;
use walvault_core::Result;

/// Cloneable handle to one shared [`IntervalSet`]
///
/// Clones refer to the same set.
#[derive(Debug)]
pub struct SharedIntervalSet<T> {
    inner: Arc<RwLock<IntervalSet<T>>>,
}

impl<T> Clone for SharedIntervalSet<T> {
    fn clone(&self) -> Self {
        SharedIntervalSet {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: SegmentIndex> Default for SharedIntervalSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SegmentIndex> SharedIntervalSet<T> {
    /// Create an empty shared set
    pub fn new() -> Self {
        Self::from_set(IntervalSet::new())
    }

    /// Share an existing set
    pub fn from_set(set: IntervalSet<T>) -> Self {
        SharedIntervalSet {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Insert `[low, high]` under the write lock
    pub fn insert(&self, low: T, high: T) -> Result<Interval<T>> {
        let merged = self.inner.write().insert(low, high)?;
        trace_merge(low, high, merged);
        Ok(merged)
    }

    /// Insert a single position under the write lock
    pub fn insert_point(&self, x: T) -> Interval<T> {
        let merged = self.inner.write().insert_point(x);
        trace_merge(x, x, merged);
        merged
    }

    /// The interval containing `x`, if any
    pub fn contains(&self, x: T) -> Option<Interval<T>> {
        self.inner.read().contains(x)
    }

    /// Number of disjoint intervals
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True if the set is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Verify the structural invariants under the read lock
    pub fn check_invariant(&self) -> Result<()> {
        self.inner.read().check_invariant()
    }

    /// Point-in-time copy of the set
    pub fn snapshot(&self) -> IntervalSet<T> {
        self.inner.read().clone()
    }
}

fn trace_merge<T: SegmentIndex>(low: T, high: T, merged: Interval<T>) {
    trace!(
        target: "walvault::durability",
        low = ?low,
        high = ?high,
        merged_low = ?merged.low,
        merged_high = ?merged.high,
        "Recorded interval"
    );
}
