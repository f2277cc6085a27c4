//! N-up grid walking
//!
//! [`NupState`] consumes an unbounded stream of source pages and tells the
//! caller, for each one, which cell of the current output sheet it lands
//! in, how far to scale it, and whether it opens a new sheet.
//!
//! ```text
//! 4-up, first = X, xstart = left, ystart = top:
//! ┌───┬───┐
//! │ 0 │ 1 │
//! ├───┼───┤
//! │ 2 │ 3 │
//! └───┴───┘
//! ```

use super::PageRect;
use crate::types::{Axis, Position};

/// Grid configuration for placing several pages on one sheet
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NupParameters {
    /// Columns
    pub nup_x: usize,
    /// Rows
    pub nup_y: usize,
    /// Width of the area the whole grid occupies
    pub width: f32,
    /// Height of the area the whole grid occupies
    pub height: f32,
    /// The grid is laid out on the sheet turned by the normal-landscape rotation
    pub landscape: bool,
    /// Axis that is filled first
    pub first: Axis,
    /// Corner the walk starts from, per axis
    pub xstart: Position,
    pub ystart: Position,
    /// Alignment of a page inside its cell, per axis
    pub xalign: Position,
    pub yalign: Position,
}

impl Default for NupParameters {
    fn default() -> Self {
        Self {
            nup_x: 1,
            nup_y: 1,
            width: 0.0,
            height: 0.0,
            landscape: false,
            first: Axis::X,
            xstart: Position::LEFT,
            ystart: Position::TOP,
            xalign: Position::Center,
            yalign: Position::Center,
        }
    }
}

impl NupParameters {
    /// Whether `nup` pages per sheet is a supported count.
    ///
    /// Only 1, 2, 3, 4, 6, 8, 9, 10, 12, 15 and 16 are accepted.
    pub fn possible(nup: usize) -> bool {
        (1..=16).contains(&nup) && !matches!(nup, 5 | 7 | 11 | 13 | 14)
    }

    /// Grid shape `(nup_x, nup_y, landscape)` for a supported count
    fn preset_shape(nup: usize) -> Option<(usize, usize, bool)> {
        let shape = match nup {
            1 => (1, 1, false),
            2 => (2, 1, true),
            3 => (3, 1, true),
            4 => (2, 2, false),
            6 => (3, 2, true),
            8 => (4, 2, true),
            9 => (3, 3, false),
            10 => (5, 2, true),
            12 => (4, 3, true),
            15 => (5, 3, true),
            16 => (4, 4, false),
            _ => return None,
        };
        Some(shape)
    }

    /// Default parameters with the grid for `nup` pages per sheet.
    pub fn preset(nup: usize) -> Option<Self> {
        let mut params = Self::default();
        params.set_preset(nup).then_some(params)
    }

    /// Overwrite the grid shape with the preset for `nup`, keeping ordering
    /// and alignment. Returns false (and changes nothing) for unsupported counts.
    pub fn set_preset(&mut self, nup: usize) -> bool {
        match Self::preset_shape(nup) {
            Some((nup_x, nup_y, landscape)) => {
                self.nup_x = nup_x;
                self.nup_y = nup_y;
                self.landscape = landscape;
                true
            }
            None => false,
        }
    }

    /// Pages per sheet
    pub fn count(&self) -> usize {
        self.nup_x * self.nup_y
    }

    /// True if the grid shape matches one of the presets (in either orientation).
    pub fn is_preset_shape(&self) -> bool {
        let count = self.count();
        Self::preset_shape(count).is_some_and(|(x, y, _)| {
            (x, y) == (self.nup_x, self.nup_y) || (y, x) == (self.nup_x, self.nup_y)
        })
    }

    /// Apply a walk order such as `"lrtb"` (left-to-right, then top-to-bottom)
    /// or `"btrl"`. The first pair names the axis filled first.
    ///
    /// Returns `None` if the code is malformed.
    pub fn parse_layout(&self, layout: &str) -> Option<Self> {
        let bytes = layout.as_bytes();
        if bytes.len() != 4 {
            return None;
        }
        let (first_axis, first_start) = parse_direction(bytes[0], bytes[1])?;
        let (second_axis, second_start) = parse_direction(bytes[2], bytes[3])?;
        if first_axis == second_axis {
            return None;
        }

        let mut params = *self;
        params.first = first_axis;
        if first_axis == Axis::X {
            params.xstart = first_start;
            params.ystart = second_start;
        } else {
            params.xstart = second_start;
            params.ystart = first_start;
        }
        Some(params)
    }

    pub fn dump(&self) {
        log::debug!(
            "NupX: {}, NupY: {}, width: {}, height: {}, landscape: {}, first: {:?}, \
             start: {:?}/{:?}, align: {:?}/{:?}",
            self.nup_x,
            self.nup_y,
            self.width,
            self.height,
            self.landscape,
            self.first,
            self.xstart,
            self.ystart,
            self.xalign,
            self.yalign
        );
    }
}

/// Parse a two-letter walk direction such as `lr` or `tb`.
fn parse_direction(a: u8, b: u8) -> Option<(Axis, Position)> {
    match (a.to_ascii_lowercase(), b.to_ascii_lowercase()) {
        (b'l', b'r') => Some((Axis::X, Position::LEFT)),
        (b'r', b'l') => Some((Axis::X, Position::RIGHT)),
        (b't', b'b') => Some((Axis::Y, Position::TOP)),
        (b'b', b't') => Some((Axis::Y, Position::BOTTOM)),
        _ => None,
    }
}

/// Where one source page goes on the output sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NupPageEdit {
    /// Offset of the scaled page inside the grid area
    pub xpos: f32,
    pub ypos: f32,
    /// Uniform scale applied to the source page
    pub scale: f32,
    /// The placed page in output space; `width`/`height` hold the source size
    pub sub: PageRect,
}

impl NupPageEdit {
    pub fn dump(&self) {
        log::debug!(
            "xpos: {}, ypos: {}, scale: {}",
            self.xpos,
            self.ypos,
            self.scale
        );
        self.sub.dump();
    }
}

/// Placement state machine for one n-up job
#[derive(Debug, Clone)]
pub struct NupState {
    params: NupParameters,
    in_pages: usize,
    out_pages: usize,
    nup: usize,
    subpage: usize,
}

impl NupState {
    /// # Panics
    /// If the grid has no columns or no rows.
    pub fn new(params: NupParameters) -> Self {
        assert!(
            params.nup_x > 0 && params.nup_y > 0,
            "n-up grid must have at least one cell"
        );
        let nup = params.count();
        Self {
            params,
            in_pages: 0,
            out_pages: 0,
            nup,
            subpage: nup,
        }
    }

    pub fn reset(&mut self) {
        self.in_pages = 0;
        self.out_pages = 0;
        self.subpage = self.nup;
    }

    pub fn in_pages(&self) -> usize {
        self.in_pages
    }

    pub fn out_pages(&self) -> usize {
        self.out_pages
    }

    pub fn params(&self) -> &NupParameters {
        &self.params
    }

    /// Advance to the next cell and compute the placement of an
    /// `in_width` × `in_height` page in it.
    ///
    /// The returned flag is true when this page starts a new output sheet.
    pub fn next_page(&mut self, in_width: f32, in_height: f32) -> (bool, NupPageEdit) {
        self.in_pages += 1;
        self.subpage += 1;
        if self.subpage >= self.nup {
            self.subpage = 0;
            self.out_pages += 1;
        }

        let mut edit = NupPageEdit::default();
        edit.sub.width = in_width;
        edit.sub.height = in_height;

        let (subx, suby) = self.convert_order(self.subpage);
        self.calculate_edit(subx, suby, &mut edit);

        (self.subpage == 0, edit)
    }

    /// Map a linear slot index to grid coordinates (column, row), counting
    /// from the bottom-left cell.
    fn convert_order(&self, subpage: usize) -> (usize, usize) {
        let p = &self.params;
        let (subx, suby) = match p.first {
            Axis::X => (subpage % p.nup_x, subpage / p.nup_x),
            Axis::Y => (subpage / p.nup_y, subpage % p.nup_y),
        };

        (
            from_start(subx, p.nup_x, p.xstart),
            from_start(suby, p.nup_y, p.ystart),
        )
    }

    fn calculate_edit(&self, subx: usize, suby: usize, edit: &mut NupPageEdit) {
        let p = &self.params;

        // cell dimensions
        let width = p.width / p.nup_x as f32;
        let height = p.height / p.nup_y as f32;

        edit.xpos = subx as f32 * width;
        edit.ypos = suby as f32 * height;

        let scalex = width / edit.sub.width;
        let scaley = height / edit.sub.height;
        let mut subwidth = edit.sub.width * scaley;
        let mut subheight = edit.sub.height * scalex;

        if scalex > scaley {
            // height-bound: leftover space is horizontal
            edit.scale = scaley;
            subheight = height;
            edit.xpos += p.xalign.offset(width - subwidth);
        } else {
            edit.scale = scalex;
            subwidth = width;
            edit.ypos += p.yalign.offset(height - subheight);
        }

        edit.sub.left = edit.xpos;
        edit.sub.bottom = edit.ypos;
        edit.sub.right = edit.sub.left + subwidth;
        edit.sub.top = edit.sub.bottom + subheight;
    }
}

/// Turn a step count along one axis into a cell index counted from the
/// start (left/bottom) edge, honoring the corner the walk starts from.
fn from_start(step: usize, cells: usize, start: Position) -> usize {
    match start.sign() {
        -1 => step,
        1 => cells - 1 - step,
        // a centered start has no direction; treat it like a start edge
        _ => step,
    }
}

// =============================================================================
// Tests
// =============================================================================
