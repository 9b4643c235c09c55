//! decode(encode(x)) re-encodes to the same key for every leaf artifact

use crate::common::*;
use proptest::prelude::*;
use walvault::{ArtifactKey, StorageLayout, TarPartitionName};

fn assert_round_trip(layout: &StorageLayout, key: &str) -> ArtifactKey {
    let url = layout.url_for(key);
    let artifact = layout
        .parse(&url)
        .unwrap_or_else(|e| panic!("{url} did not decode: {e:?}"));
    assert_eq!(layout.encode(&artifact).unwrap(), key, "{url}");
    artifact
}

#[test]
fn sentinel_for_all_zero_start() {
    let layout = layout();
    let backup = descriptor("000000000000000000000000", "11111111");
    let key = layout.basebackup_sentinel(&backup).unwrap();
    assert!(key.ends_with("base_000000000000000000000000_11111111_backup_stop_sentinel.json"));

    match assert_round_trip(&layout, &key) {
        ArtifactKey::BackupSentinel(found) => {
            assert_eq!(
                found.wal_segment_backup_start.known().map(String::as_str),
                Some("000000000000000000000000")
            );
            assert_eq!(
                found.wal_segment_offset_backup_start.known().map(String::as_str),
                Some("11111111")
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn extended_version_file_for_any_descriptor() {
    let layout = layout();
    for (segment, offset) in [
        ("000000010000000000000002", "00000028"),
        ("FFFFFFFFFFFFFFFFFFFFFFFF", "FFFFFFFF"),
        ("000000000000000000000000", "00000000"),
    ] {
        let key = layout
            .basebackup_extended_version(&descriptor(segment, offset))
            .unwrap();
        assert!(key.ends_with("extended_version.txt"));
        assert!(matches!(
            assert_round_trip(&layout, &key),
            ArtifactKey::ExtendedVersion(_)
        ));
    }
}

#[test]
fn tar_partitions_and_wal_files() {
    let layout = layout();
    let backup = descriptor("000000010000000000000002", "00000028");

    for n in [0u64, 1, 9, 10, 12345] {
        let part = TarPartitionName::new(n).to_string();
        let key = layout.basebackup_tar_partition(&backup, &part).unwrap();
        match assert_round_trip(&layout, &key) {
            ArtifactKey::TarPartition { part_name, .. } => {
                assert_eq!(part_name.parse::<TarPartitionName>().unwrap().number(), n);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    for name in [
        "000000010000000000000002",
        "00000002.history",
        "000000010000000000000002.00000028.backup",
        "000000010000000000000002.lzo",
    ] {
        let key = layout.wal_path(name).unwrap();
        assert_eq!(
            assert_round_trip(&layout, &key),
            ArtifactKey::WalFile(name.to_string())
        );
    }
}

#[test]
fn prefixes_of_any_depth() {
    let backup = descriptor("000000010000000000000002", "00000028");
    for base in ["s3://foo", "s3://foo/", "s3://foo/a", "s3://foo/a/b/c/"] {
        let layout = StorageLayout::new(base).unwrap();
        for key in [
            layout.basebackup_sentinel(&backup).unwrap(),
            layout.basebackup_extended_version(&backup).unwrap(),
            layout.basebackup_tar_partition(&backup, "part_1.tar.lzo").unwrap(),
            layout.wal_path("000000010000000000000002").unwrap(),
        ] {
            assert_round_trip(&layout, &key);
        }
    }
}

fn arb_prefix() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z0-9 _-]{1,6}|[éü]{1,3}", 0..4).prop_map(|parts| parts.join("/"))
}

proptest! {
    #[test]
    fn any_prefix_round_trips(prefix in arb_prefix(), log in any::<u32>(), seg in any::<u32>()) {
        let base = format!("s3://foo/{}", prefix);
        let layout = StorageLayout::new(&base).unwrap();
        let start = format!("00000001{:08X}{:08X}", log, seg);
        let backup = descriptor(&start, "00000028");

        for key in [
            layout.basebackup_sentinel(&backup).unwrap(),
            layout.basebackup_extended_version(&backup).unwrap(),
            layout.basebackup_tar_partition(&backup, "part_0.tar.lzo").unwrap(),
            layout.wal_path(&start).unwrap(),
        ] {
            prop_assert!(key.starts_with(layout.prefix()));
            let artifact = layout.parse(&layout.url_for(&key)).unwrap();
            prop_assert_eq!(layout.encode(&artifact).unwrap(), key);
        }
    }
}
