//! Decoder classification of foreign and malformed keys

use crate::common::*;
use walvault::{Error, StorageLayout};

#[test]
fn outside_bucket_or_prefix_is_structural() {
    let layout = layout();
    for url in [
        "s3://other/bar/wal_005/000000010000000000000002",
        "s3://foo/barn/wal_005/000000010000000000000002",
        "s3://foo/wal_005/000000010000000000000002",
        "http://foo/bar/wal_005/000000010000000000000002",
        "s3://foo/bar/wal_005/000000010000000000000002?versionId=3",
        "",
    ] {
        match layout.parse(url) {
            Err(Error::Structural { .. }) => {}
            other => panic!("{url:?} gave {other:?}"),
        }
    }
}

#[test]
fn unknown_shapes_inside_prefix_are_skippable() {
    let layout = layout();
    for key in [
        "bar/basebackups_005/base_000000010000000000000002_00000028",
        "bar/basebackups_005/base_00000001000000000000000_00000028_backup_stop_sentinel.json",
        "bar/basebackups_005/base_000000010000000000000002_00000028/tar_partitions",
        "bar/basebackups_004/base_000000010000000000000002_00000028/extended_version.txt",
        "bar/wal_004/000000010000000000000002",
        "bar/a/b/c/d/e/f",
    ] {
        let err = layout.parse_key(key).unwrap_err();
        assert!(err.is_skippable(), "{key:?} gave {err:?}");
    }
}

#[test]
fn bad_base_urls_are_configuration_errors() {
    for url in ["file:///srv/backups", "s3:///no-bucket", "not a url"] {
        let err = StorageLayout::new(url).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{url:?} gave {err:?}");
    }

    let err = StorageLayout::new("gs://foo/bar").unwrap_err();
    assert_eq!(err.to_string(), "bad S3 URL scheme passed");
    assert!(err.detail().is_some());
}
