//! Property tests for segment orderings and descriptors

use proptest::prelude::*;
use std::cmp::Ordering;
use walvault_core::{BackupDescriptor, Error, Field, SegmentNumber};

fn arb_segment() -> impl Strategy<Value = SegmentNumber> {
    (proptest::option::of(1u32..=u32::MAX), any::<u32>(), any::<u32>())
        .prop_map(|(tli, log, seg)| SegmentNumber::from_parts(tli, log, seg).unwrap())
}

fn arb_named_segment() -> impl Strategy<Value = SegmentNumber> {
    (1u32..=u32::MAX, any::<u32>(), any::<u32>())
        .prop_map(|(tli, log, seg)| SegmentNumber::from_parts(Some(tli), log, seg).unwrap())
}

// ============================================================================
// Total Orders
// ============================================================================

proptest! {
    #[test]
    fn orders_are_antisymmetric(a in arb_segment(), b in arb_segment()) {
        prop_assert_eq!(a.cmp_with_timeline(&b), b.cmp_with_timeline(&a).reverse());
        prop_assert_eq!(a.cmp_without_timeline(&b), b.cmp_without_timeline(&a).reverse());
    }

    #[test]
    fn orders_are_transitive(a in arb_segment(), b in arb_segment(), c in arb_segment()) {
        if a.cmp_with_timeline(&b) != Ordering::Greater && b.cmp_with_timeline(&c) != Ordering::Greater {
            prop_assert_ne!(a.cmp_with_timeline(&c), Ordering::Greater);
        }
        if a.cmp_without_timeline(&b) != Ordering::Greater && b.cmp_without_timeline(&c) != Ordering::Greater {
            prop_assert_ne!(a.cmp_without_timeline(&c), Ordering::Greater);
        }
    }

    #[test]
    fn sorting_yields_chain(mut v in proptest::collection::vec(arb_segment(), 0..20)) {
        v.sort_by(|x, y| x.cmp_with_timeline(y));
        for pair in v.windows(2) {
            prop_assert!(pair[0].with_timeline() <= pair[1].with_timeline());
        }
        v.sort_by(|x, y| x.cmp_without_timeline(y));
        for pair in v.windows(2) {
            prop_assert!(pair[0].without_timeline() <= pair[1].without_timeline());
        }
    }

    #[test]
    fn equal_under_both_orders_means_equal(a in arb_named_segment(), b in arb_named_segment()) {
        let both_equal = a.cmp_with_timeline(&b) == Ordering::Equal
            && a.cmp_without_timeline(&b) == Ordering::Equal;
        prop_assert_eq!(both_equal, a == b);
    }

    #[test]
    fn same_timeline_orders_agree(tli in 1u32..=u32::MAX, a in any::<(u32, u32)>(), b in any::<(u32, u32)>()) {
        let x = SegmentNumber::from_parts(Some(tli), a.0, a.1).unwrap();
        let y = SegmentNumber::from_parts(Some(tli), b.0, b.1).unwrap();
        prop_assert_eq!(x.cmp_with_timeline(&y), x.cmp_without_timeline(&y));
    }

    #[test]
    fn file_name_round_trips(s in arb_named_segment()) {
        let name = s.file_name().unwrap();
        prop_assert_eq!(name.len(), 24);
        prop_assert_eq!(SegmentNumber::from_file_name(&name).unwrap(), s);
    }

    #[test]
    fn lowercase_hex_rejected(s in arb_named_segment()) {
        let name = s.file_name().unwrap();
        let lower = name.to_lowercase();
        prop_assume!(lower != name);
        prop_assert!(SegmentNumber::from_file_name(&lower).is_err());
    }
}

// ============================================================================
// Descriptors
// ============================================================================

mod descriptors {
    use super::*;

    #[test]
    fn test_backup_name_requires_start_fields() {
        let missing = BackupDescriptor::default();
        assert!(matches!(missing.backup_name(), Err(Error::Validation(_))));

        let timed_out = BackupDescriptor {
            wal_segment_backup_start: Field::TimedOut,
            ..BackupDescriptor::from_start("000000010000000000000002", "00000028")
        };
        assert!(timed_out.backup_name().is_err());
    }

    #[test]
    fn test_start_segment_matches_name() {
        let backup = BackupDescriptor::from_start("00000001000000A200000003", "00000028");
        assert_eq!(
            backup.backup_name().unwrap(),
            "base_00000001000000A200000003_00000028"
        );
        let start = backup.start_segment().unwrap();
        assert_eq!(start.log(), 0xA2);
        assert_eq!(start.segment(), 3);
    }

    #[test]
    fn test_all_zero_start_is_well_shaped() {
        let backup = BackupDescriptor::from_start("000000000000000000000000", "00000000");
        assert!(backup.start_identity().is_ok());
        // Timeline zero cannot be a SegmentNumber.
        assert!(backup.start_segment().is_err());
    }
}
