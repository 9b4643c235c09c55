//! Interval set membership after merges

use walvault::{Interval, IntervalSet, SegmentCoverage, SegmentNumber, SharedIntervalSet};

#[test]
fn bridging_insert_merges_into_one_interval() {
    let mut set = IntervalSet::new();
    set.insert(1u64, 5).unwrap();
    set.insert(10, 15).unwrap();
    set.insert(4, 12).unwrap();

    assert_eq!(set.intervals(), &[Interval { low: 1, high: 15 }]);
    assert!(set.contains(9).is_some());
    assert!(set.contains(16).is_none());
}

#[test]
fn empty_set_and_boundaries() {
    let mut set = IntervalSet::<u64>::new();
    for x in [0, 1, u64::MAX] {
        assert!(set.contains(x).is_none());
    }

    set.insert(20, 30).unwrap();
    assert!(set.contains(20).is_some());
    assert!(set.contains(30).is_some());
    assert!(set.contains(19).is_none());
    assert!(set.contains(31).is_none());
}

#[test]
fn parallel_segment_discovery() {
    let shared = SharedIntervalSet::<u64>::new();
    std::thread::scope(|scope| {
        for worker in 0..4u32 {
            let shared = shared.clone();
            scope.spawn(move || {
                for seg in (worker..64).step_by(4) {
                    let number = SegmentNumber::from_parts(Some(1), 0, seg).unwrap();
                    shared.insert_point(number.without_timeline());
                }
            });
        }
    });
    assert_eq!(shared.snapshot().intervals(), &[Interval { low: 0, high: 63 }]);

    let mut coverage = SegmentCoverage::new();
    coverage
        .record_range(
            &SegmentNumber::from_parts(Some(1), 0, 0).unwrap(),
            &SegmentNumber::from_parts(Some(1), 0, 63).unwrap(),
        )
        .unwrap();
    assert_eq!(coverage.position_ranges(), shared.snapshot().intervals());
}
