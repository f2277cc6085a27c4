use crate::layout::booklet_shuffle;
use crate::options::ProcessingParameters;
use crate::types::*;

/// Predict the output of imposing a document of `source_pages` pages
/// without touching the document.
pub fn calculate_statistics(
    source_pages: usize,
    params: &ProcessingParameters,
) -> Result<ImpositionStatistics> {
    if source_pages == 0 {
        return Err(ImposeError::NoPages);
    }
    params.validate()?;

    let mut nup = params.nup;
    let slots: Vec<usize> = match params.booklet {
        BookletMode::Off => (0..source_pages).collect(),
        mode => {
            if mode == BookletMode::On {
                nup.set_preset(2);
            }
            booklet_shuffle(source_pages, params.book_signature)
        }
    };

    let per_sheet = nup.count();
    let mut output_sheets = 0;
    let mut blank_pages_added = 0;

    for (idx, sheet) in slots.chunks(per_sheet).enumerate() {
        if !params.with_page(idx + 1) {
            continue;
        }
        output_sheets += 1;
        if sheet.iter().all(|&page| page >= source_pages) {
            blank_pages_added += 1;
        }
    }

    if params.needs_even_padding() && output_sheets % 2 == 1 {
        output_sheets += 1;
        blank_pages_added += 1;
    }

    Ok(ImpositionStatistics {
        source_pages,
        output_sheets,
        output_pages: output_sheets * params.num_copies,
        blank_pages_added,
    })
}
