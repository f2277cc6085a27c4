//! Document backend capability
//!
//! The imposition engine never touches a document format directly. It
//! drives a [`ProcessingDocument`], which hands out [`ProcessingPage`]
//! handles and takes them back as output. The lopdf implementation lives in
//! [`crate::render`]; tests use an in-memory recorder.
//!
//! Ownership: a page passed to [`ProcessingPage::add_subpage`] or
//! [`ProcessingDocument::add_page`] is consumed. Backends may only accept
//! page handles they created themselves; anything else is a programming
//! error and panics.

use crate::layout::PageRect;
use crate::types::{BorderType, Position, Result, Rotation};
use std::any::Any;
use std::io::Write;

/// One page, either from the source document or created blank
pub trait ProcessingPage {
    /// The visible page box, moved to the origin and turned by the page's
    /// own rotation. Rotations requested through [`rotate`](Self::rotate)
    /// are not reflected.
    fn rect(&self) -> PageRect;

    /// Draw a border just inside `rect`; line weight and inset are
    /// multiplied by `scale`.
    fn add_border_rect(&mut self, rect: &PageRect, border: BorderType, scale: f32);

    /// Composite `sub` onto this page, scaled by `scale` around its origin and
    /// moved to (`xpos`, `ypos`). With `crop`, only the part of `sub` inside
    /// the crop box (in `sub` coordinates) is drawn.
    fn add_subpage(
        &mut self,
        sub: Box<dyn ProcessingPage>,
        xpos: f32,
        ypos: f32,
        scale: f32,
        crop: Option<&PageRect>,
    );

    /// Flip the content horizontally.
    fn mirror(&mut self);

    /// Set the rotation applied when the page is output.
    fn rotate(&mut self, rot: Rotation);

    /// Stamp `label` at the top and bottom of the box `rect`.
    fn add_label(&mut self, rect: &PageRect, label: &str);

    /// Shrink the page box to the aspect ratio of `crop_rect`'s printable area,
    /// aligned by `xpos`/`ypos`. With `scale`, the largest such box that fits
    /// the page is kept; otherwise the printable area's own size is cut out.
    /// Returns the page's own rotation.
    fn crop(
        &mut self,
        crop_rect: &PageRect,
        orientation: Rotation,
        xpos: Position,
        ypos: Position,
        scale: bool,
    ) -> Rotation;

    /// True if the unrotated page box is wider than it is high.
    fn is_landscape(&self, orientation: Rotation) -> bool;

    /// Recover the concrete handle. Backends use this to take back their own pages.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A loaded document plus the output being built from it
pub trait ProcessingDocument {
    /// False if the document forbids printing at any resolution.
    fn check_print_permissions(&self) -> bool;

    /// Handles for every source page, in document order.
    fn pages(&mut self) -> Vec<Box<dyn ProcessingPage>>;

    /// A blank page of the given size.
    fn new_page(&mut self, width: f32, height: f32) -> Box<dyn ProcessingPage>;

    /// Append `page` to the output, at the front if `front` is set.
    fn add_page(&mut self, page: Box<dyn ProcessingPage>, front: bool) -> Result<()>;

    /// Number of pages in the output so far.
    fn output_len(&self) -> usize;

    /// Repeat the output `copies` times: whole sequences when `collate`,
    /// otherwise each page repeated in place.
    fn multiply(&mut self, copies: usize, collate: bool) -> Result<()>;

    /// Rotate every source page whose orientation differs from
    /// `dst_landscape` by `normal_landscape`.
    fn auto_rotate_all(&mut self, dst_landscape: bool, normal_landscape: Rotation);

    /// Drop everything added to the output.
    fn discard_output(&mut self);

    /// Serialize the output document.
    fn emit(&mut self, out: &mut dyn Write) -> Result<()>;
}
