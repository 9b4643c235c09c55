//! walvault - object-store layout and WAL bookkeeping for PostgreSQL backups
//!
//! walvault names every artifact a continuous-archiving backup tool stores in
//! an S3-style bucket, recognizes those names again in an object listing,
//! and orders WAL segments across timeline forks.
//!
//! # Quick Start
//!
//! ```
//! use walvault::{ArtifactKey, BackupDescriptor, StorageLayout};
//!
//! let layout = StorageLayout::new("s3://backups/pg-main")?;
//! let backup = BackupDescriptor::from_start("000000010000000000000002", "00000028");
//!
//! let key = layout.basebackup_sentinel(&backup)?;
//! assert_eq!(
//!     key,
//!     "pg-main/basebackups_005/base_000000010000000000000002_00000028_backup_stop_sentinel.json"
//! );
//!
//! match layout.parse(&layout.url_for(&key))? {
//!     ArtifactKey::BackupSentinel(found) => assert_eq!(found.backup_name()?, backup.backup_name()?),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok::<(), walvault::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `walvault-core`: error taxonomy, segment numbers, backup descriptors
//! - `walvault-storage`: the layout codec, backup listing and sentinel bodies
//! - `walvault-durability`: interval sets and archived-segment coverage
//!
//! Nothing in walvault performs I/O; callers bring their own object-store
//! client and feed listings and fetched bodies in.

pub use walvault_core::*;
pub use walvault_durability::*;
pub use walvault_storage::*;
