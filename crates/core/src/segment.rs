//! WAL segment numbering
//!
//! A WAL segment is identified by three 32-bit components rendered as
//! uppercase hex: timeline, log and segment. The file name of a segment is
//! the 24-character concatenation `TTTTTTTTLLLLLLLLSSSSSSSS`.
//!
//! ## Orderings
//!
//! Two integer projections give the segment space a total order:
//!
//! - [`SegmentNumber::with_timeline`]: `timeline‖log‖segment` as one 96-bit
//!   number. Correct within a timeline, and ranks a later timeline above an
//!   earlier one even if the later timeline has progressed less far.
//! - [`SegmentNumber::without_timeline`]: `log‖segment` as one 64-bit number.
//!   The same `(log, segment)` pair is the same physical WAL position on
//!   every timeline, so this order survives a timeline fork and is the one
//!   to use for conservative garbage collection.
//!
//! Timeline zero is rejected: it would compare equal to "no timeline" in
//! the timeline-sensitive projection.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::str::FromStr;

/// Width in hex digits of each segment component
pub const COMPONENT_HEX_WIDTH: usize = 8;

/// Unanchored pattern for a 24-digit segment file name
///
/// Named groups: `filename`, `tli`, `log`, `seg`. Composed into the larger
/// key patterns of the storage layout.
pub const SEGMENT_FILENAME_PATTERN: &str =
    r"(?P<filename>(?P<tli>[0-9A-F]{8})(?P<log>[0-9A-F]{8})(?P<seg>[0-9A-F]{8}))";

// Compile-time constant pattern
#[allow(clippy::expect_used)]
static SEGMENT_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}$", SEGMENT_FILENAME_PATTERN))
        .expect("constant regex pattern is valid")
});

/// A (timeline, log, segment) triple identifying one WAL segment
///
/// Immutable once constructed. Equality is field-wise; there is
/// no `Ord` impl because the two orderings disagree across timelines. Use
/// [`cmp_with_timeline`](Self::cmp_with_timeline) or
/// [`cmp_without_timeline`](Self::cmp_without_timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentNumber {
    timeline: Option<u32>,
    log: u32,
    segment: u32,
}

impl SegmentNumber {
    /// Construct from hex string components
    ///
    /// Each present component must be exactly 8 uppercase hex digits, and a
    /// timeline must be strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if any check fails.
    pub fn new(timeline: Option<&str>, log: &str, segment: &str) -> Result<Self> {
        let timeline = timeline
            .map(|tli| parse_component("timeline", tli))
            .transpose()?;
        let log = parse_component("log", log)?;
        let segment = parse_component("segment", segment)?;
        Self::from_parts(timeline, log, segment)
    }

    /// Construct from numeric components
    ///
    /// Widths are guaranteed by the types; only the timeline rule is checked.
    pub fn from_parts(timeline: Option<u32>, log: u32, segment: u32) -> Result<Self> {
        if timeline == Some(0) {
            return Err(Error::Validation(
                "timeline 0 is not a legitimate timeline".to_string(),
            ));
        }
        Ok(SegmentNumber {
            timeline,
            log,
            segment,
        })
    }

    /// Parse a 24-hex-digit segment file name
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the name is not exactly 8+8+8 uppercase hex
    /// digits, or `Error::Validation` if it names timeline zero.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let caps = SEGMENT_FILENAME
            .captures(name)
            .ok_or_else(|| Error::parse(name, "not a 24-hex-digit WAL segment file name"))?;
        Self::new(Some(&caps["tli"]), &caps["log"], &caps["seg"])
    }

    /// Timeline, if known
    pub fn timeline(&self) -> Option<u32> {
        self.timeline
    }

    /// Log number
    pub fn log(&self) -> u32 {
        self.log
    }

    /// Segment number within the log
    pub fn segment(&self) -> u32 {
        self.segment
    }

    /// The 24-digit file name, or `None` without a timeline
    pub fn file_name(&self) -> Option<String> {
        self.timeline
            .map(|tli| format!("{:08X}{:08X}{:08X}", tli, self.log, self.segment))
    }

    /// Integer value of `timeline‖log‖segment`
    ///
    /// A missing timeline contributes zero, which no real timeline can.
    #[inline]
    pub fn with_timeline(&self) -> u128 {
        (u128::from(self.timeline.unwrap_or(0)) << 64) | u128::from(self.without_timeline())
    }

    /// Integer value of `log‖segment`
    #[inline]
    pub fn without_timeline(&self) -> u64 {
        (u64::from(self.log) << 32) | u64::from(self.segment)
    }

    /// Timeline-sensitive ordering
    pub fn cmp_with_timeline(&self, other: &Self) -> Ordering {
        self.with_timeline().cmp(&other.with_timeline())
    }

    /// Timeline-insensitive ordering
    pub fn cmp_without_timeline(&self, other: &Self) -> Ordering {
        self.without_timeline().cmp(&other.without_timeline())
    }

    /// Same position moved onto another timeline
    pub fn on_timeline(&self, timeline: u32) -> Result<Self> {
        Self::from_parts(Some(timeline), self.log, self.segment)
    }
}

impl FromStr for SegmentNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_file_name(s)
    }
}

/// Parse one 8-digit uppercase hex component
///
/// `what` names the component in the validation error.
pub fn parse_component(what: &str, s: &str) -> Result<u32> {
    if s.len() != COMPONENT_HEX_WIDTH {
        return Err(Error::Validation(format!(
            "{} must be {} hex digits, got {:?} ({} chars)",
            what,
            COMPONENT_HEX_WIDTH,
            s,
            s.len()
        )));
    }
    if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')) {
        return Err(Error::Validation(format!(
            "{} must be uppercase hex, got {:?}",
            what, s
        )));
    }
    u32::from_str_radix(s, 16)
        .map_err(|e| Error::Validation(format!("{} {:?} is not hex: {}", what, s, e)))
}

/// Whether `s` is exactly 8 uppercase hex digits
///
/// Used for byte offsets, which share the component width.
pub fn is_hex_component(s: &str) -> bool {
    parse_component("component", s).is_ok()
}

/// Whether `s` is a syntactically valid segment file name
///
/// Unlike [`SegmentNumber::from_file_name`] this accepts timeline zero,
/// which still forms a well-shaped key.
pub fn is_segment_file_name(s: &str) -> bool {
    SEGMENT_FILENAME.is_match(s)
}
