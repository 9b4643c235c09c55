//! Segment validation and the two total orders

use std::cmp::Ordering;
use walvault::{Error, SegmentNumber};

#[test]
fn timeline_zero_and_bad_widths_fail_validation() {
    assert!(matches!(
        SegmentNumber::new(Some("00000000"), "00000001", "00000001"),
        Err(Error::Validation(_))
    ));
    for (tli, log, seg) in [
        (None, "0000001", "00000001"),
        (Some("00000001"), "000000001", "00000001"),
        (Some("00000001"), "00000001", ""),
    ] {
        assert!(matches!(
            SegmentNumber::new(tli, log, seg),
            Err(Error::Validation(_))
        ));
    }
}

#[test]
fn same_timeline_orders_agree_with_log_segment_order() {
    let mut segments: Vec<SegmentNumber> = [(3, 1), (1, 0xFF), (2, 0), (1, 2)]
        .into_iter()
        .map(|(log, seg)| SegmentNumber::from_parts(Some(4), log, seg).unwrap())
        .collect();

    segments.sort_by(|a, b| a.cmp_with_timeline(b));
    let with: Vec<_> = segments.iter().map(|s| (s.log(), s.segment())).collect();
    segments.sort_by(|a, b| a.cmp_without_timeline(b));
    let without: Vec<_> = segments.iter().map(|s| (s.log(), s.segment())).collect();

    assert_eq!(with, vec![(1, 2), (1, 0xFF), (2, 0), (3, 1)]);
    assert_eq!(with, without);
}

#[test]
fn timeline_fork_orders_disagree() {
    let tl1 = SegmentNumber::new(Some("00000001"), "00000010", "00000001").unwrap();
    let tl7 = SegmentNumber::new(Some("00000007"), "00000001", "00000002").unwrap();

    assert_eq!(tl7.cmp_with_timeline(&tl1), Ordering::Greater);
    assert_eq!(tl1.cmp_without_timeline(&tl7), Ordering::Greater);
}
