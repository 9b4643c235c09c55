//! Tar partition names
//!
//! A base backup is uploaded as numbered, compressed tar volumes named
//! `part_<n>.tar.lzo`. The layout itself accepts any single-component part
//! name; this type is the canonical naming the uploader uses.

use crate::patterns::match_volume;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use walvault_core::{Error, Result};

/// A canonical tar partition name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TarPartitionName {
    number: u64,
    /// Digits exactly as they appear in the name
    digits: String,
}

impl TarPartitionName {
    /// Name for partition `number`
    pub fn new(number: u64) -> Self {
        TarPartitionName {
            number,
            digits: number.to_string(),
        }
    }

    /// Partition number
    pub fn number(&self) -> u64 {
        self.number
    }
}

impl FromStr for TarPartitionName {
    type Err = Error;

    /// Parse `part_<digits>.tar.lzo`
    ///
    /// Leading zeros are kept so the name re-renders unchanged.
    fn from_str(s: &str) -> Result<Self> {
        let digits = match_volume(s).ok_or_else(|| Error::parse(s, "not a tar partition name"))?;
        let number = digits
            .parse::<u64>()
            .map_err(|e| Error::parse(s, format!("partition number out of range: {}", e)))?;
        Ok(TarPartitionName {
            number,
            digits: digits.to_string(),
        })
    }
}

impl fmt::Display for TarPartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part_{}.tar.lzo", self.digits)
    }
}

impl Ord for TarPartitionName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for TarPartitionName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
