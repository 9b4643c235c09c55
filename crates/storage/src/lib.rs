//! Object-store storage layout for walvault
//!
//! This crate implements the key-naming scheme for backups in an object
//! store:
//! - StorageLayout: pure encoders from backup descriptors to keys, and the
//!   decoder back to a typed [`ArtifactKey`]
//! - Patterns: key-name regular expressions, compiled once
//! - BackupStopSentinel: JSON body of a backup's completion marker
//! - TarPartitionName: canonical `part_<n>.tar.lzo` names
//! - BackupCatalog: completed backups found in an object listing
//! - LayoutConfig: serde-loadable layout configuration
//!
//! Nothing here performs I/O. Callers list, fetch and store objects and use
//! this crate to name and recognize them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod config;
pub mod layout;
pub mod listing;
pub mod partition;
pub mod patterns;
pub mod sentinel;

pub use artifact::{ArtifactKey, ArtifactKind};
pub use config::LayoutConfig;
pub use layout::{StorageLayout, CURRENT_VERSION, S3_SCHEME};
pub use listing::{BackupCatalog, BackupQuery, ListedObject, LATEST_QUERY};
pub use partition::TarPartitionName;
pub use patterns::{EXTENDED_VERSION_FILE, SENTINEL_SUFFIX, TAR_PARTITIONS_DIR};
pub use sentinel::{BackupStopSentinel, SentinelFetch, SENTINEL_CONTENT_TYPE};
