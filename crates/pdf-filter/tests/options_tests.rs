use pdf_filter::*;

#[test]
fn test_default_parameters_are_valid() {
    let params = ProcessingParameters::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.num_copies, 1);
    assert_eq!(params.normal_landscape, Rotation::Rot270);
    assert_eq!(params.nup.count(), 1);
}

#[test]
fn test_validation_zero_copies() {
    let params = ProcessingParameters {
        num_copies: 0,
        ..Default::default()
    };
    assert!(matches!(params.validate(), Err(ImposeError::Config(_))));
}

#[test]
fn test_validation_invalid_grid() {
    let mut params = ProcessingParameters::default();
    params.nup.nup_x = 5;
    params.nup.nup_y = 1;
    assert!(params.validate().is_err());

    params.nup.nup_x = 2;
    params.nup.nup_y = 3;
    assert!(params.validate().is_ok());
}

#[test]
fn test_validation_booklet_signature() {
    let mut params = ProcessingParameters {
        book_signature: Some(6),
        ..Default::default()
    };
    assert!(params.validate().is_err());

    params.book_signature = Some(0);
    assert!(params.validate().is_err());

    params.book_signature = Some(16);
    assert!(params.validate().is_ok());
}

#[test]
fn test_validation_page_box_outside_sheet() {
    let mut params = ProcessingParameters::default();
    params.page.right = 700.0;
    assert!(params.validate().is_err());

    let mut params = ProcessingParameters::default();
    params.page.bottom = 800.0;
    assert!(params.validate().is_err());
}

#[test]
fn test_validation_no_page_set() {
    let params = ProcessingParameters {
        even_pages: false,
        odd_pages: false,
        ..Default::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn test_with_page_filters() {
    let params = ProcessingParameters {
        even_pages: false,
        page_range: "1-5".parse().unwrap(),
        ..Default::default()
    };
    assert!(params.with_page(1));
    assert!(!params.with_page(2));
    assert!(params.with_page(5));
    assert!(!params.with_page(7));
}

#[test]
fn test_needs_even_padding() {
    let mut params = ProcessingParameters::default();
    assert!(!params.needs_even_padding());
    params.even_duplex = true;
    assert!(params.needs_even_padding());

    let params = ProcessingParameters {
        odd_pages: false,
        ..Default::default()
    };
    assert!(params.needs_even_padding());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_parameters() {
    use tempfile::NamedTempFile;

    let params = ProcessingParameters {
        num_copies: 2,
        collate: true,
        orientation: Rotation::Rot90,
        nup: NupParameters::preset(4).unwrap(),
        booklet: BookletMode::ShuffleOnly,
        book_signature: Some(8),
        scaling: ScalingMode::AutoFit,
        border: BorderType::TwoThin,
        page_label: Some("Draft".to_string()),
        page_range: "2-4,9-".parse().unwrap(),
        ..Default::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    params.save(path).await.unwrap();

    // Load
    let loaded = ProcessingParameters::load(path).await.unwrap();
    assert_eq!(loaded, params);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{ "num_copies": 4, "reverse": true }"#).unwrap();

    let loaded = ProcessingParameters::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.num_copies, 4);
    assert!(loaded.reverse);
    assert_eq!(loaded.page, PageRect::default());
    assert!(loaded.page_range.contains(100));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_malformed_config() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();

    let result = ProcessingParameters::load(temp_file.path()).await;
    assert!(matches!(result, Err(ImposeError::Config(_))));
}

#[test]
fn test_duplex_flag_alone_does_not_pad() {
    let params = ProcessingParameters {
        duplex: true,
        ..Default::default()
    };
    assert!(!params.needs_even_padding());

    let params = ProcessingParameters {
        duplex: false,
        even_duplex: true,
        ..Default::default()
    };
    assert!(params.needs_even_padding());
}
