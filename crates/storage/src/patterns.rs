//! Key-name patterns
//!
//! Compiled once and shared by every layout. All patterns are anchored at
//! both ends: a key component either is an artifact name or it is not.

use once_cell::sync::Lazy;
use regex::Regex;
use walvault_core::SEGMENT_FILENAME_PATTERN;

/// Suffix of the completion marker written next to a backup directory
pub const SENTINEL_SUFFIX: &str = "_backup_stop_sentinel.json";

/// Leaf name of the server version file inside a backup directory
pub const EXTENDED_VERSION_FILE: &str = "extended_version.txt";

/// Directory holding a backup's tar partitions
pub const TAR_PARTITIONS_DIR: &str = "tar_partitions";

fn base_backup_body() -> String {
    format!(r"base_{}_(?P<offset>[0-9A-F]{{8}})", SEGMENT_FILENAME_PATTERN)
}

// Compile-time constant patterns
#[allow(clippy::expect_used)]
static BASE_BACKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}$", base_backup_body())).expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static COMPLETE_BASE_BACKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^{}{}$",
        base_backup_body(),
        regex::escape(SENTINEL_SUFFIX)
    ))
    .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static VOLUME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^part_(?P<number>[0-9]+)\.tar\.lzo$").expect("constant regex pattern is valid")
});

/// Start segment and offset of a backup directory name (`base_<seg>_<off>`)
pub fn match_base_backup(component: &str) -> Option<(&str, &str)> {
    captures_start(&BASE_BACKUP, component)
}

/// Start segment and offset of a sentinel name (`base_<seg>_<off>_backup_stop_sentinel.json`)
pub fn match_sentinel(component: &str) -> Option<(&str, &str)> {
    captures_start(&COMPLETE_BASE_BACKUP, component)
}

/// Digits of a canonical tar partition name (`part_<n>.tar.lzo`)
pub fn match_volume(component: &str) -> Option<&str> {
    VOLUME
        .captures(component)
        .and_then(|caps| caps.name("number"))
        .map(|m| m.as_str())
}

fn captures_start<'a>(re: &Regex, component: &'a str) -> Option<(&'a str, &'a str)> {
    let caps = re.captures(component)?;
    let filename = caps.name("filename")?.as_str();
    let offset = caps.name("offset")?.as_str();
    Some((filename, offset))
}
