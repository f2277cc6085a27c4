use pdf_filter::ranges::OPEN_END;
use pdf_filter::*;

#[test]
fn test_adjacent_ranges_merge() {
    let mut set = IntervalSet::new();
    set.add(1, 5);
    set.add(5, 10);
    set.finish();

    assert_eq!(set.intervals(), &[(1, 10)]);
    assert!(set.contains(4));
    assert!(!set.contains(10));
}

#[test]
fn test_overlapping_ranges_keep_larger_end() {
    let mut set = IntervalSet::new();
    set.add(1, 10);
    set.add(3, 5);
    set.add(20, 25);
    set.finish();

    assert_eq!(set.intervals(), &[(1, 10), (20, 25)]);
    assert!(set.contains(9));
    assert!(!set.contains(15));
    assert!(set.contains(20));
}

#[test]
fn test_default_covers_every_page() {
    let set = IntervalSet::default();
    for page in [1, 2, 100, 1_000_000] {
        assert!(set.contains(page));
    }
    assert!(!set.contains(0));
}

#[test]
fn test_empty_set_contains_nothing() {
    let mut set = IntervalSet::new();
    set.finish();
    assert!(set.is_empty());
    assert!(!set.contains(1));
    assert_eq!(set.next(0), None);
}

#[test]
fn test_next() {
    let mut set = IntervalSet::new();
    set.add(2, 4);
    set.add(7, 8);
    set.finish();

    assert_eq!(set.next(0), Some(2));
    assert_eq!(set.next(2), Some(3));
    assert_eq!(set.next(3), Some(7));
    assert_eq!(set.next(7), None);
}

#[test]
fn test_parse_page_ranges() {
    let set: IntervalSet = "1-3,7,10-".parse().unwrap();
    assert_eq!(set.intervals(), &[(1, 4), (7, 8), (10, OPEN_END)]);

    let set: IntervalSet = "-2, 5".parse().unwrap();
    assert_eq!(set.intervals(), &[(1, 3), (5, 6)]);

    let set: IntervalSet = "".parse().unwrap();
    assert_eq!(set, IntervalSet::default());
}

#[test]
fn test_parse_invalid_page_ranges() {
    for text in ["abc", "0", "5-2", "1,,2", "3-x"] {
        let result = text.parse::<IntervalSet>();
        assert!(
            matches!(result, Err(ImposeError::Config(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_clear() {
    let mut set = IntervalSet::default();
    set.clear();
    assert!(set.is_empty());
}

#[test]
fn test_parse_huge_page_number_is_rejected() {
    let max = usize::MAX.to_string();
    for text in [format!("1-{}", max), max.clone(), format!("{}-{}", max, max)] {
        let result = text.parse::<IntervalSet>();
        assert!(
            matches!(result, Err(ImposeError::Config(_))),
            "{:?} should be rejected",
            text
        );
    }

    let set: IntervalSet = format!("2-{}", usize::MAX - 2).parse().unwrap();
    assert!(set.contains(usize::MAX - 2));
}
