use pdf_filter::*;

#[test]
fn test_nup_possible() {
    for n in [1, 2, 3, 4, 6, 8, 9, 10, 12, 15, 16] {
        assert!(NupParameters::possible(n), "{} should be possible", n);
    }
    for n in [0, 5, 7, 11, 13, 14, 17] {
        assert!(!NupParameters::possible(n), "{} should not be possible", n);
    }
}

#[test]
fn test_nup_presets() {
    let two = NupParameters::preset(2).unwrap();
    assert_eq!((two.nup_x, two.nup_y, two.landscape), (2, 1, true));

    let nine = NupParameters::preset(9).unwrap();
    assert_eq!((nine.nup_x, nine.nup_y, nine.landscape), (3, 3, false));

    assert!(NupParameters::preset(5).is_none());

    let mut params = NupParameters::preset(4).unwrap();
    assert!(!params.set_preset(7));
    assert_eq!(params.count(), 4);
}

#[test]
fn test_nup_preset_shape() {
    let mut params = NupParameters::preset(6).unwrap();
    assert!(params.is_preset_shape());
    std::mem::swap(&mut params.nup_x, &mut params.nup_y);
    assert!(params.is_preset_shape());
    params.nup_x = 5;
    params.nup_y = 1;
    assert!(!params.is_preset_shape());
}

#[test]
fn test_parse_layout() {
    let base = NupParameters::default();
    let params = base.parse_layout("tbrl").unwrap();
    assert_eq!(params.first, Axis::Y);
    assert_eq!(params.ystart, Position::TOP);
    assert_eq!(params.xstart, Position::RIGHT);

    assert!(base.parse_layout("lrrl").is_none());
    assert!(base.parse_layout("lrt").is_none());
    assert!(base.parse_layout("xxyy").is_none());
}

#[test]
fn test_nup_state_signals_new_sheets() {
    let mut params = NupParameters::preset(2).unwrap();
    params.width = 720.0;
    params.height = 576.0;
    let mut state = NupState::new(params);

    let flags: Vec<bool> = (0..5).map(|_| state.next_page(612.0, 792.0).0).collect();
    assert_eq!(flags, vec![true, false, true, false, true]);
    assert_eq!(state.in_pages(), 5);
    assert_eq!(state.out_pages(), 3);

    state.reset();
    assert_eq!(state.in_pages(), 0);
    assert!(state.next_page(612.0, 792.0).0);
}

#[test]
fn test_nup_state_equal_scale_side_by_side() {
    let mut params = NupParameters::preset(2).unwrap();
    params.width = 720.0;
    params.height = 576.0;
    let mut state = NupState::new(params);

    let (_, first) = state.next_page(612.0, 792.0);
    let (_, second) = state.next_page(612.0, 792.0);

    assert_eq!(first.scale, second.scale);
    assert_eq!(first.ypos, second.ypos);
    assert!((second.xpos - first.xpos - 360.0).abs() < 1e-4);
    assert!(first.sub.right <= second.sub.left + 1e-4);
}

#[test]
#[should_panic]
fn test_nup_state_rejects_empty_grid() {
    let params = NupParameters {
        nup_x: 0,
        ..Default::default()
    };
    NupState::new(params);
}

#[test]
fn test_booklet_auto_signature() {
    let order = booklet_shuffle(9, None);
    assert_eq!(order.len(), 12);
    assert!(order.iter().filter(|&&idx| idx >= 9).count() >= 3);
    // filler, page 1, page 2, filler
    assert_eq!(&order[..4], &[11, 0, 1, 10]);
}

#[test]
fn test_booklet_is_permutation() {
    for pages in 1..=20 {
        for signature in [None, Some(4), Some(8), Some(12)] {
            let order = booklet_shuffle(pages, signature);
            assert_eq!(order.len() % 4, 0);
            for page in 0..pages {
                assert_eq!(
                    order.iter().filter(|&&idx| idx == page).count(),
                    1,
                    "page {} of {} with {:?}",
                    page,
                    pages,
                    signature
                );
            }
        }
    }
}

#[test]
fn test_booklet_two_signatures() {
    assert_eq!(
        booklet_shuffle(8, Some(4)),
        vec![3, 0, 1, 2, 7, 4, 5, 6]
    );
}

#[test]
#[should_panic]
fn test_booklet_rejects_bad_signature() {
    booklet_shuffle(8, Some(6));
}
