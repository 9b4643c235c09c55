//! Shared fixtures

use walvault::{BackupDescriptor, StorageLayout};

pub const BASE_URL: &str = "s3://foo/bar";

pub fn layout() -> StorageLayout {
    StorageLayout::new(BASE_URL).unwrap()
}

pub fn descriptor(segment: &str, offset: &str) -> BackupDescriptor {
    BackupDescriptor::from_start(segment, offset)
}
