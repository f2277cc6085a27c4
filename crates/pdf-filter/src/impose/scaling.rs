//! Scaling policy resolution

use crate::layout::PageRect;
use crate::options::ProcessingParameters;
use crate::types::ScalingMode;

/// Reduce the requested scaling mode to one of `None`, `Fit`, `Fill` or
/// `Crop` by comparing the first source page against the printable area.
///
/// `first_page` is the page's visible box as reported by the backend.
pub fn resolve_scaling(params: &ProcessingParameters, first_page: &PageRect) -> ScalingMode {
    let mode = params.scaling;
    if !matches!(mode, ScalingMode::Auto | ScalingMode::AutoFit) {
        return mode;
    }

    let (mut width, mut height) = (first_page.width, first_page.height);
    if params.orientation.is_quarter_turn() {
        std::mem::swap(&mut width, &mut height);
    }
    let document_large =
        width >= params.page.printable_width() || height >= params.page.printable_height();
    let margin_defined = !params.page.is_full_sheet();

    let resolved = match mode {
        ScalingMode::Auto if params.fidelity || document_large => {
            if margin_defined {
                ScalingMode::Fit
            } else {
                ScalingMode::Fill
            }
        }
        ScalingMode::Auto => ScalingMode::Crop,
        _ if params.fidelity || document_large => ScalingMode::Crop,
        _ => ScalingMode::Fill,
    };

    log::debug!(
        "scaling {:?} resolved to {:?} (document large: {}, margins: {})",
        mode,
        resolved,
        document_large,
        margin_defined
    );
    resolved
}

// =============================================================================
// Tests
// =============================================================================
