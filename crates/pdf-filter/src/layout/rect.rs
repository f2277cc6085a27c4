//! Sheet rectangles
//!
//! A [`PageRect`] describes a sheet (`width` × `height`) together with the
//! box that content may occupy on it. The box edges are coordinates in PDF
//! user space with the origin at the bottom-left corner of the sheet.

use crate::constants::{
    DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT, DEFAULT_SIDE_MARGIN_PT,
    DEFAULT_VERTICAL_MARGIN_PT,
};
use crate::types::Rotation;

/// A sheet size plus the printable (or placed) box on it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    /// Full sheet width
    pub width: f32,
    /// Full sheet height
    pub height: f32,
}

impl Default for PageRect {
    /// US Letter with the customary 18pt/36pt unprintable margins.
    fn default() -> Self {
        Self {
            top: DEFAULT_PAGE_HEIGHT_PT - DEFAULT_VERTICAL_MARGIN_PT,
            left: DEFAULT_SIDE_MARGIN_PT,
            right: DEFAULT_PAGE_WIDTH_PT - DEFAULT_SIDE_MARGIN_PT,
            bottom: DEFAULT_VERTICAL_MARGIN_PT,
            width: DEFAULT_PAGE_WIDTH_PT,
            height: DEFAULT_PAGE_HEIGHT_PT,
        }
    }
}

impl PageRect {
    /// A sheet whose box covers the whole sheet
    pub fn full(width: f32, height: f32) -> Self {
        Self {
            top: height,
            left: 0.0,
            right: width,
            bottom: 0.0,
            width,
            height,
        }
    }

    /// Build from PDF box coordinates; the sheet size is the box size.
    pub fn from_box(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
            width: right - left,
            height: top - bottom,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.right - self.left
    }

    pub fn printable_height(&self) -> f32 {
        self.top - self.bottom
    }

    /// True if the box covers the whole sheet, i.e. no margins were requested.
    pub fn is_full_sheet(&self) -> bool {
        self.printable_width() == self.width && self.printable_height() == self.height
    }

    /// Rotate the box counter-clockwise by `rot` on a `paper_width` ×
    /// `paper_height` sheet and re-express it relative to the rotated sheet.
    ///
    /// A point (x, y) maps to (H-y, x) for 90°, (W-x, H-y) for 180° and
    /// (y, W-x) for 270°. Quarter turns also swap `width` and `height`.
    /// Rotating by `-rot` with the swapped paper size undoes the move.
    pub fn rotate_move(&mut self, rot: Rotation, paper_width: f32, paper_height: f32) {
        let (mut pwidth, mut pheight) = (paper_width, paper_height);

        if matches!(rot, Rotation::Rot180 | Rotation::Rot270) {
            std::mem::swap(&mut self.top, &mut self.bottom);
            std::mem::swap(&mut self.left, &mut self.right);
        }
        if rot.is_quarter_turn() {
            let tmp = self.bottom;
            self.bottom = self.left;
            self.left = self.top;
            self.top = self.right;
            self.right = tmp;

            std::mem::swap(&mut self.width, &mut self.height);
            std::mem::swap(&mut pwidth, &mut pheight);
        }
        if matches!(rot, Rotation::Rot90 | Rotation::Rot180) {
            self.left = pwidth - self.left;
            self.right = pwidth - self.right;
        }
        if matches!(rot, Rotation::Rot180 | Rotation::Rot270) {
            self.top = pheight - self.top;
            self.bottom = pheight - self.bottom;
        }
    }

    /// Uniformly scale the box and the sheet.
    ///
    /// # Panics
    /// If `mult` is zero.
    pub fn scale(&mut self, mult: f32) {
        if mult == 1.0 {
            return;
        }
        assert!(mult != 0.0, "cannot scale a page rectangle by zero");

        self.bottom *= mult;
        self.left *= mult;
        self.top *= mult;
        self.right *= mult;

        self.width *= mult;
        self.height *= mult;
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.left += tx;
        self.bottom += ty;
        self.right += tx;
        self.top += ty;
    }

    /// Merge the fields that `other` defines; undefined fields are left alone.
    pub fn set(&mut self, other: &RectOverride) {
        if let Some(top) = other.top {
            self.top = top;
        }
        if let Some(left) = other.left {
            self.left = left;
        }
        if let Some(right) = other.right {
            self.right = right;
        }
        if let Some(bottom) = other.bottom {
            self.bottom = bottom;
        }
        if let Some(width) = other.width {
            self.width = width;
        }
        if let Some(height) = other.height {
            self.height = height;
        }
    }

    pub fn dump(&self) {
        log::debug!(
            "top: {}, left: {}, right: {}, bottom: {}; width: {}, height: {}",
            self.top,
            self.left,
            self.right,
            self.bottom,
            self.width,
            self.height
        );
    }
}

/// Partial [`PageRect`]: only the `Some` fields override on [`PageRect::set`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectOverride {
    pub top: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl RectOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Tests
// =============================================================================
