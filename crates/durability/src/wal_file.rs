//! WAL directory file names
//!
//! Besides segments, a PostgreSQL WAL archive holds two kinds of small
//! metadata files, all named by hex components:
//!
//! | Kind | Format |
//! |---|---|
//! | segment | `%08X%08X%08X` |
//! | timeline history | `%08X.history` |
//! | backup history | `%08X%08X%08X.%08X.backup` |

use std::fmt;
use std::str::FromStr;
use walvault_core::{parse_component, Error, Result, SegmentNumber, COMPONENT_HEX_WIDTH};

const HISTORY_SUFFIX: &str = ".history";
const BACKUP_SUFFIX: &str = ".backup";

/// A classified WAL-directory leaf name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalFileName {
    /// A 16 MiB WAL segment
    Segment(SegmentNumber),

    /// History file written when a timeline is created
    TimelineHistory(u32),

    /// Backup history file written when a base backup stops
    BackupHistory {
        /// Segment the backup started in
        segment: SegmentNumber,
        /// Byte offset of the start within that segment
        offset: u32,
    },
}

impl WalFileName {
    /// Parse a WAL-directory leaf name
    ///
    /// # Errors
    ///
    /// `Error::Parse` if the name has none of the three shapes, or
    /// `Error::Validation` if a component is out of range (timeline zero).
    pub fn parse(name: &str) -> Result<Self> {
        if let Some(tli) = name.strip_suffix(HISTORY_SUFFIX) {
            if tli.len() == COMPONENT_HEX_WIDTH {
                return Self::history(name, tli);
            }
        }

        if let Some(stem) = name.strip_suffix(BACKUP_SUFFIX) {
            if let Some((segment, offset)) = stem.split_once('.') {
                let segment = SegmentNumber::from_file_name(segment).map_err(|e| match e {
                    Error::Parse { .. } => {
                        Error::parse(name, "backup history segment is not 24 hex digits")
                    }
                    other => other,
                })?;
                let offset = parse_component("backup offset", offset)
                    .map_err(|_| Error::parse(name, "backup offset is not 8 hex digits"))?;
                return Ok(WalFileName::BackupHistory { segment, offset });
            }
        }

        SegmentNumber::from_file_name(name)
            .map(WalFileName::Segment)
            .map_err(|e| match e {
                Error::Parse { .. } => Error::parse(name, "not a WAL segment or history file"),
                other => other,
            })
    }

    fn history(name: &str, tli: &str) -> Result<Self> {
        let timeline = parse_component("timeline", tli)
            .map_err(|_| Error::parse(name, "timeline is not 8 hex digits"))?;
        if timeline == 0 {
            return Err(Error::Validation(
                "timeline 0 is not a legitimate timeline".to_string(),
            ));
        }
        Ok(WalFileName::TimelineHistory(timeline))
    }

    /// Timeline the file belongs to
    pub fn timeline(&self) -> Option<u32> {
        match self {
            WalFileName::Segment(seg) | WalFileName::BackupHistory { segment: seg, .. } => {
                seg.timeline()
            }
            WalFileName::TimelineHistory(tli) => Some(*tli),
        }
    }

    /// The segment named, for segment and backup history files
    pub fn segment(&self) -> Option<SegmentNumber> {
        match self {
            WalFileName::Segment(seg) | WalFileName::BackupHistory { segment: seg, .. } => {
                Some(*seg)
            }
            WalFileName::TimelineHistory(_) => None,
        }
    }

    /// True for a WAL segment
    pub fn is_segment(&self) -> bool {
        matches!(self, WalFileName::Segment(_))
    }
}

impl fmt::Display for WalFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalFileName::Segment(seg) => write_segment(f, seg),
            WalFileName::TimelineHistory(tli) => write!(f, "{:08X}{}", tli, HISTORY_SUFFIX),
            WalFileName::BackupHistory { segment, offset } => {
                write_segment(f, segment)?;
                write!(f, ".{:08X}{}", offset, BACKUP_SUFFIX)
            }
        }
    }
}

// Parsed segments always carry a timeline
fn write_segment(f: &mut fmt::Formatter<'_>, seg: &SegmentNumber) -> fmt::Result {
    write!(
        f,
        "{:08X}{:08X}{:08X}",
        seg.timeline().unwrap_or(0),
        seg.log(),
        seg.segment()
    )
}

impl FromStr for WalFileName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
