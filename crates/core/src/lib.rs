//! Core types for walvault
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error taxonomy shared by every crate
//! - SegmentNumber: (timeline, log, segment) WAL position with two orderings
//! - Field: present / unknown / timed-out wrapper for fetched metadata
//! - BackupDescriptor: everything known about one base backup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod error;
pub mod segment;

pub use descriptor::{BackupDescriptor, Field};
pub use error::{Error, Result};
pub use segment::{
    is_hex_component, is_segment_file_name, parse_component, SegmentNumber, COMPONENT_HEX_WIDTH,
    SEGMENT_FILENAME_PATTERN,
};
