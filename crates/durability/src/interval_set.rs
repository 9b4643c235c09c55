//! Sorted set of disjoint closed intervals
//!
//! Tracks which segment positions are present in a WAL archive. Inserting
//! a range merges it with every interval it overlaps or touches, so the
//! stored intervals always satisfy:
//!
//! - each interval has `low <= high`
//! - intervals are sorted by `low`
//! - consecutive intervals leave a gap of at least one position
//!
//! Membership is a binary search over the low bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use walvault_core::{Error, Result};

/// Position type an [`IntervalSet`] can hold
///
/// Positions are discrete, so two intervals are adjacent when one ends
/// exactly one position before the other starts.
pub trait SegmentIndex: Copy + Ord + fmt::Debug {
    /// Next position, or `None` at the top of the domain
    fn successor(self) -> Option<Self>;
}

macro_rules! impl_segment_index {
    ($($t:ty),*) => {
        $(
            impl SegmentIndex for $t {
                #[inline]
                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }
            }
        )*
    };
}

impl_segment_index!(u32, u64, u128);

/// Closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval<T> {
    /// Inclusive lower bound
    pub low: T,
    /// Inclusive upper bound
    pub high: T,
}

impl<T: SegmentIndex> Interval<T> {
    /// Create an interval, rejecting `low > high`
    pub fn new(low: T, high: T) -> Result<Self> {
        if low > high {
            return Err(Error::InvariantViolation(format!(
                "interval low bound {:?} exceeds high bound {:?}",
                low, high
            )));
        }
        Ok(Interval { low, high })
    }

    /// Single-position interval
    pub fn point(x: T) -> Self {
        Interval { low: x, high: x }
    }

    /// Whether `x` lies within the interval
    #[inline]
    pub fn contains(&self, x: T) -> bool {
        self.low <= x && x <= self.high
    }

    /// True if `self` ends strictly before `low` with at least one position
    /// between them
    #[inline]
    fn ends_before_gap(&self, low: T) -> bool {
        match self.high.successor() {
            Some(next) => next < low,
            None => false,
        }
    }
}

/// Set of positions stored as maximal disjoint intervals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Interval<T>>", into = "Vec<Interval<T>>")]
#[serde(bound(
    serialize = "T: SegmentIndex + Serialize",
    deserialize = "T: SegmentIndex + Deserialize<'de>"
))]
pub struct IntervalSet<T> {
    intervals: Vec<Interval<T>>,
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        IntervalSet {
            intervals: Vec::new(),
        }
    }
}

impl<T: SegmentIndex> IntervalSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `[low, high]`, merging with overlapping or adjacent intervals
    ///
    /// Returns the interval now containing the inserted range.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvariantViolation` if `low > high`. The set is left
    /// unchanged in that case.
    pub fn insert(&mut self, low: T, high: T) -> Result<Interval<T>> {
        let new = Interval::new(low, high)?;
        Ok(self.merge(new))
    }

    /// Insert a single position
    pub fn insert_point(&mut self, x: T) -> Interval<T> {
        self.merge(Interval::point(x))
    }

    fn merge(&mut self, new: Interval<T>) -> Interval<T> {
        // First interval that is not strictly before `new` with a gap.
        let start = self
            .intervals
            .partition_point(|iv| iv.ends_before_gap(new.low));
        // One past the last interval that starts at or before `high + 1`.
        let end = match new.high.successor() {
            Some(next) => self.intervals.partition_point(|iv| iv.low <= next),
            None => self.intervals.len(),
        };

        let merged = if start < end {
            Interval {
                low: new.low.min(self.intervals[start].low),
                high: new.high.max(self.intervals[end - 1].high),
            }
        } else {
            new
        };

        self.intervals.splice(start..end, std::iter::once(merged));
        merged
    }

    /// The interval containing `x`, if any
    pub fn contains(&self, x: T) -> Option<Interval<T>> {
        let idx = self.intervals.partition_point(|iv| iv.low <= x);
        if idx == 0 {
            return None;
        }
        let candidate = self.intervals[idx - 1];
        candidate.contains(x).then_some(candidate)
    }

    /// Whether every position of `[low, high]` is in the set
    pub fn covers(&self, low: T, high: T) -> bool {
        low <= high && self.contains(low).map_or(false, |iv| high <= iv.high)
    }

    /// Verify the structural invariants
    ///
    /// Always holds for sets built through [`insert`](Self::insert); exposed
    /// for tests and for callers that want to assert it after bulk loads.
    pub fn check_invariant(&self) -> Result<()> {
        for iv in &self.intervals {
            if iv.low > iv.high {
                return Err(Error::InvariantViolation(format!(
                    "interval [{:?}, {:?}] is inverted",
                    iv.low, iv.high
                )));
            }
        }
        for pair in self.intervals.windows(2) {
            if !pair[0].ends_before_gap(pair[1].low) {
                return Err(Error::InvariantViolation(format!(
                    "intervals [{:?}, {:?}] and [{:?}, {:?}] overlap or touch",
                    pair[0].low, pair[0].high, pair[1].low, pair[1].high
                )));
            }
        }
        Ok(())
    }

    /// Intervals in ascending order
    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Iterate intervals in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &Interval<T>> {
        self.intervals.iter()
    }

    /// Number of disjoint intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True if no position is in the set
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Smallest position in the set
    pub fn min(&self) -> Option<T> {
        self.intervals.first().map(|iv| iv.low)
    }

    /// Largest position in the set
    pub fn max(&self) -> Option<T> {
        self.intervals.last().map(|iv| iv.high)
    }
}

impl<T: SegmentIndex> TryFrom<Vec<Interval<T>>> for IntervalSet<T> {
    type Error = Error;

    fn try_from(intervals: Vec<Interval<T>>) -> Result<Self> {
        let mut set = IntervalSet::new();
        for iv in intervals {
            set.insert(iv.low, iv.high)?;
        }
        Ok(set)
    }
}

impl<T> From<IntervalSet<T>> for Vec<Interval<T>> {
    fn from(set: IntervalSet<T>) -> Self {
        set.intervals
    }
}

impl<T: SegmentIndex> FromIterator<T> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for x in iter {
            set.insert_point(x);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
