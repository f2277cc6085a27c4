//! Shared constants for page processing
//!
//! This module centralizes magic numbers used when laying out and
//! decorating output pages.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Default Sheet
// =============================================================================

/// Default sheet width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default sheet height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default left/right unprintable margin (points)
pub const DEFAULT_SIDE_MARGIN_PT: f32 = 18.0;

/// Default top/bottom unprintable margin (points)
pub const DEFAULT_VERTICAL_MARGIN_PT: f32 = 36.0;

// =============================================================================
// Borders
// =============================================================================

/// Line width of a thin border rule (points)
pub const BORDER_THIN_WIDTH: f32 = 0.24;

/// Line width of a thick border rule (points)
pub const BORDER_THICK_WIDTH: f32 = 0.5;

/// Inset of the first border rule from the page edge (points)
pub const BORDER_MARGIN: f32 = 2.25;

/// Extra inset of the second rule of a double border (points)
pub const BORDER_DOUBLE_GAP: f32 = 2.0;

// =============================================================================
// Page Labels
// =============================================================================

/// Font size for page labels (points)
pub const LABEL_FONT_SIZE: f32 = 12.0;

/// Padding around the label box (points)
pub const LABEL_MARGIN: f32 = 2.25;

/// Resource name of the label font
pub const LABEL_FONT_NAME: &str = "PfLabel";

// =============================================================================
// Page Accounting
// =============================================================================

/// Prefix of a page-accounting line
pub const PAGE_LOG_PREFIX: &str = "PAGE:";
