//! Booklet page ordering
//!
//! Produces the order in which source pages must be printed so that a
//! stack of 2-up duplex sheets, folded in the middle, reads front to back.
//!
//! **One 8-page signature:**
//! - Sheet 1 front: [8, 1], back: [2, 7]
//! - Sheet 2 front: [6, 3], back: [4, 5]

/// Compute the output-to-input page permutation for booklet printing.
///
/// Returns 0-based source indices. The result is padded to a whole number
/// of signatures; indices `>= num_pages` are blank fillers that the caller
/// has to synthesize. With `signature == None` the whole document forms a
/// single signature, rounded up to a multiple of 4.
///
/// # Panics
/// If an explicit signature is zero or not a multiple of 4.
pub fn booklet_shuffle(num_pages: usize, signature: Option<usize>) -> Vec<usize> {
    let signature = signature.unwrap_or_else(|| num_pages.div_ceil(4) * 4);
    if num_pages == 0 {
        return Vec::new();
    }
    assert!(
        signature > 0 && signature % 4 == 0,
        "booklet signature must be a positive multiple of 4"
    );

    let mut order = Vec::with_capacity(num_pages + signature - 1);
    let mut curpage = 0;
    while curpage < num_pages {
        let mut first = curpage;
        let mut last = curpage + signature - 1;
        while first < last {
            order.push(last);
            order.push(first);
            order.push(first + 1);
            order.push(last - 1);
            first += 2;
            last -= 2;
        }
        curpage += signature;
    }
    order
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sheet() {
        assert_eq!(booklet_shuffle(4, None), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_eight_pages() {
        assert_eq!(booklet_shuffle(8, Some(8)), vec![7, 0, 1, 6, 5, 2, 3, 4]);
    }

    #[test]
    fn test_multiple_signatures() {
        // 6 pages in 4-page signatures: second signature is half filler
        assert_eq!(
            booklet_shuffle(6, Some(4)),
            vec![3, 0, 1, 2, 7, 4, 5, 6]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(booklet_shuffle(0, None).is_empty());
    }
}
