//! Page handles of the lopdf backend
//!
//! A [`LopdfPage`] is a description of an output page that is only turned
//! into PDF objects when it is added to the output. A source page stays a
//! reference to its original object for as long as only its rotation or
//! boxes change; as soon as content is drawn on it, it is wrapped into a
//! blank page that places the source as a Form XObject.

use crate::backend::ProcessingPage;
use crate::layout::PageRect;
use crate::marks::{border_ops, label_ops};
use crate::types::{BorderType, Position, Rotation};
use lopdf::ObjectId;
use std::any::Any;

use super::xobject::xobject_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageOrigin {
    /// Page object of the source document
    Source(ObjectId),
    /// Created by the filter; drawn from `content` and `subpages`
    Blank,
}

#[derive(Debug, Clone)]
pub struct LopdfPage {
    pub(crate) origin: PageOrigin,
    /// Visible box in the page's own (unrotated) user space
    pub(crate) bbox: PageRect,
    /// The page's own `/Rotate`
    pub(crate) base_rotation: Rotation,
    pub(crate) user_unit: f32,
    /// Extra rotation requested for output
    pub(crate) rotation: Rotation,
    pub(crate) bbox_changed: bool,
    pub(crate) content: String,
    pub(crate) subpages: Vec<LopdfPage>,
    pub(crate) uses_label_font: bool,
}

impl LopdfPage {
    pub(crate) fn source(
        id: ObjectId,
        bbox: PageRect,
        base_rotation: Rotation,
        user_unit: f32,
    ) -> Self {
        Self {
            origin: PageOrigin::Source(id),
            bbox,
            base_rotation,
            user_unit,
            rotation: Rotation::Rot0,
            bbox_changed: false,
            content: String::new(),
            subpages: Vec::new(),
            uses_label_font: false,
        }
    }

    pub(crate) fn blank(width: f32, height: f32) -> Self {
        Self {
            origin: PageOrigin::Blank,
            bbox: PageRect::full(width, height),
            base_rotation: Rotation::Rot0,
            user_unit: 1.0,
            rotation: Rotation::Rot0,
            bbox_changed: false,
            content: String::new(),
            subpages: Vec::new(),
            uses_label_font: false,
        }
    }

    /// Take back a handle created by this backend.
    ///
    /// # Panics
    /// If `page` belongs to a different backend.
    pub(crate) fn from_handle(page: Box<dyn ProcessingPage>) -> Self {
        match page.into_any().downcast::<LopdfPage>() {
            Ok(page) => *page,
            Err(_) => panic!("page handle does not belong to the lopdf backend"),
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self.origin, PageOrigin::Source(_))
    }

    /// Number of pages placed onto this one.
    pub fn subpage_count(&self) -> usize {
        self.subpages.len()
    }

    /// Turn a source page into a blank page of the same visible size that
    /// draws the source, so that content can be added on top.
    fn wrap(&mut self) {
        if !self.is_source() {
            return;
        }
        let rect = self.rect();
        let mut inner = std::mem::replace(self, LopdfPage::blank(rect.width, rect.height));
        self.rotation = inner.rotation;
        inner.rotation = Rotation::Rot0;
        self.push_subpage(inner, "");
    }

    fn push_subpage(&mut self, sub: LopdfPage, transform: &str) {
        self.subpages.push(sub);
        let name = xobject_name(self.subpages.len());
        self.content
            .push_str(&format!("q\n{}/{} Do\nQ\n", transform, name));
    }
}

impl ProcessingPage for LopdfPage {
    fn rect(&self) -> PageRect {
        let mut ret = self.bbox;
        ret.width = ret.printable_width();
        ret.height = ret.printable_height();
        ret.translate(-ret.left, -ret.bottom);
        ret.rotate_move(self.base_rotation, ret.width, ret.height);
        ret.scale(self.user_unit);
        ret
    }

    fn add_border_rect(&mut self, rect: &PageRect, border: BorderType, scale: f32) {
        if border == BorderType::None {
            return;
        }
        self.wrap();
        self.content.push_str(&border_ops(rect, border, scale));
    }

    fn add_subpage(
        &mut self,
        sub: Box<dyn ProcessingPage>,
        xpos: f32,
        ypos: f32,
        scale: f32,
        crop: Option<&PageRect>,
    ) {
        let sub = LopdfPage::from_handle(sub);
        self.wrap();

        let mut transform = String::new();
        if let Some(crop) = crop {
            transform.push_str(&format!(
                "{} {} {} {} re W n\n",
                xpos + crop.left * scale,
                ypos + crop.bottom * scale,
                crop.printable_width() * scale,
                crop.printable_height() * scale
            ));
        }
        transform.push_str(&format!("{} 0 0 {} {} {} cm\n", scale, scale, xpos, ypos));
        self.push_subpage(sub, &transform);
    }

    fn mirror(&mut self) {
        self.wrap();
        let width = self.rect().width;
        self.content
            .insert_str(0, &format!("-1 0 0 1 {} 0 cm\n", width));
    }

    fn rotate(&mut self, rot: Rotation) {
        self.rotation = rot;
    }

    fn add_label(&mut self, rect: &PageRect, label: &str) {
        self.wrap();
        self.uses_label_font = true;
        self.content.push_str(&label_ops(rect, label));
    }

    fn crop(
        &mut self,
        crop_rect: &PageRect,
        orientation: Rotation,
        xpos: Position,
        ypos: Position,
        scale: bool,
    ) -> Rotation {
        let width = self.bbox.printable_width();
        let height = self.bbox.printable_height();

        let mut page_width = crop_rect.printable_width();
        let mut page_height = crop_rect.printable_height();
        if orientation.is_quarter_turn() {
            std::mem::swap(&mut page_width, &mut page_height);
        }

        let (final_width, final_height) = if !scale {
            (page_width, page_height)
        } else if width * page_height / page_width <= height {
            (width, width * page_height / page_width)
        } else {
            (height * page_width / page_height, height)
        };

        let posw = xpos.offset(width - final_width);
        let posh = ypos.offset(height - final_height);

        let left = self.bbox.left + posw;
        let bottom = self.bbox.bottom + posh;
        self.bbox = PageRect::from_box(left, bottom, left + final_width, bottom + final_height);
        self.bbox_changed = true;

        self.base_rotation
    }

    fn is_landscape(&self, _orientation: Rotation) -> bool {
        self.bbox.printable_width() > self.bbox.printable_height()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
