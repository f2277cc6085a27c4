use pdf_filter::*;

#[test]
fn test_stats_no_pages() {
    let result = calculate_statistics(0, &ProcessingParameters::default());
    assert!(matches!(result, Err(ImposeError::NoPages)));
}

#[test]
fn test_stats_invalid_parameters() {
    let params = ProcessingParameters {
        num_copies: 0,
        ..Default::default()
    };
    assert!(calculate_statistics(3, &params).is_err());
}

#[test]
fn test_stats_one_up() {
    let stats = calculate_statistics(5, &ProcessingParameters::default()).unwrap();
    assert_eq!(stats.source_pages, 5);
    assert_eq!(stats.output_sheets, 5);
    assert_eq!(stats.output_pages, 5);
    assert_eq!(stats.blank_pages_added, 0);
}

#[test]
fn test_stats_four_up_with_copies() {
    let params = ProcessingParameters {
        nup: NupParameters::preset(4).unwrap(),
        num_copies: 3,
        ..Default::default()
    };
    let stats = calculate_statistics(10, &params).unwrap();
    assert_eq!(stats.output_sheets, 3);
    assert_eq!(stats.output_pages, 9);
}

#[test]
fn test_stats_booklet() {
    let params = ProcessingParameters {
        booklet: BookletMode::On,
        ..Default::default()
    };

    // 9 pages pad to 12, i.e. 6 two-up sheet sides
    let stats = calculate_statistics(9, &params).unwrap();
    assert_eq!(stats.output_sheets, 6);
    assert_eq!(stats.blank_pages_added, 0);

    // a single page leaves the second side empty
    let stats = calculate_statistics(1, &params).unwrap();
    assert_eq!(stats.output_sheets, 2);
    assert_eq!(stats.blank_pages_added, 1);
}

#[test]
fn test_stats_shuffle_only_counts_fillers() {
    let params = ProcessingParameters {
        booklet: BookletMode::ShuffleOnly,
        ..Default::default()
    };
    let stats = calculate_statistics(9, &params).unwrap();
    assert_eq!(stats.output_sheets, 12);
    assert_eq!(stats.blank_pages_added, 3);
}

#[test]
fn test_stats_even_duplex_padding() {
    let params = ProcessingParameters {
        even_duplex: true,
        ..Default::default()
    };
    let stats = calculate_statistics(7, &params).unwrap();
    assert_eq!(stats.output_sheets, 8);
    assert_eq!(stats.blank_pages_added, 1);
}

#[test]
fn test_stats_page_range() {
    let params = ProcessingParameters {
        page_range: "3-".parse().unwrap(),
        ..Default::default()
    };
    let stats = calculate_statistics(10, &params).unwrap();
    assert_eq!(stats.output_sheets, 8);
}
