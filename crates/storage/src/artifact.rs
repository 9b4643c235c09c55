//! Decoded artifact keys
//!
//! The decoder does not hand back a callable; it hands back one of a closed
//! set of artifact kinds, each carrying exactly the arguments needed to
//! re-encode it with [`StorageLayout::encode`](crate::StorageLayout::encode).

use std::fmt;
use walvault_core::BackupDescriptor;

/// A key path classified by the artifact it names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKey {
    /// Completion marker of a base backup
    BackupSentinel(BackupDescriptor),
    /// Server version file inside a backup directory
    ExtendedVersion(BackupDescriptor),
    /// One tar partition of a base backup
    TarPartition {
        /// Backup the partition belongs to
        backup: BackupDescriptor,
        /// Leaf name of the partition object
        part_name: String,
    },
    /// An archived WAL file
    WalFile(String),
}

impl ArtifactKey {
    /// Kind tag of this key
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactKey::BackupSentinel(_) => ArtifactKind::BackupSentinel,
            ArtifactKey::ExtendedVersion(_) => ArtifactKind::ExtendedVersion,
            ArtifactKey::TarPartition { .. } => ArtifactKind::TarPartition,
            ArtifactKey::WalFile(_) => ArtifactKind::WalFile,
        }
    }

    /// Backup this key belongs to, if it belongs to one
    pub fn backup(&self) -> Option<&BackupDescriptor> {
        match self {
            ArtifactKey::BackupSentinel(backup)
            | ArtifactKey::ExtendedVersion(backup)
            | ArtifactKey::TarPartition { backup, .. } => Some(backup),
            ArtifactKey::WalFile(_) => None,
        }
    }
}

/// Artifact kinds that have decodable keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `base_<seg>_<off>_backup_stop_sentinel.json`
    BackupSentinel,
    /// `base_<seg>_<off>/extended_version.txt`
    ExtendedVersion,
    /// `base_<seg>_<off>/tar_partitions/<part>`
    TarPartition,
    /// `wal_<version>/<name>`
    WalFile,
}

impl ArtifactKind {
    /// Stable lowercase name, for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::BackupSentinel => "backup_sentinel",
            ArtifactKind::ExtendedVersion => "extended_version",
            ArtifactKind::TarPartition => "tar_partition",
            ArtifactKind::WalFile => "wal_file",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
