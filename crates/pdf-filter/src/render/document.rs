//! lopdf implementation of [`ProcessingDocument`]

use crate::backend::{ProcessingDocument, ProcessingPage};
use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT, LABEL_FONT_NAME};
use crate::layout::PageRect;
use crate::types::{Result, Rotation};
use lopdf::{Dictionary, Document, Object, ObjectId, Permissions, Stream};
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::path::Path;

use super::page::{LopdfPage, PageOrigin};
use super::xobject::{
    box_array, extract_number, form_xobject, get_inherited, get_page_content, get_trim_box,
    rotation_matrix, xobject_name,
};

/// Permission bit 3 of `/P`: print the document
const PERMISSION_PRINT: i64 = 1 << 2;

/// Page attributes that may be inherited from the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

pub struct LopdfDocument {
    doc: Document,
    source_pages: Vec<ObjectId>,
    output: VecDeque<ObjectId>,
    /// Source page objects already placed in the output
    used: HashSet<ObjectId>,
    label_font: Option<ObjectId>,
}

impl LopdfDocument {
    /// Wrap a loaded document. Inherited page attributes are copied onto
    /// every page so pages can be moved into a new page tree.
    pub fn new(mut doc: Document) -> Self {
        let source_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

        for &page_id in &source_pages {
            for key in INHERITABLE_KEYS {
                let has_key = doc
                    .get_dictionary(page_id)
                    .map(|dict| dict.has(key))
                    .unwrap_or(true);
                if has_key {
                    continue;
                }
                if let Some(value) = get_inherited(&doc, page_id, key) {
                    if let Ok(dict) = doc.get_dictionary_mut(page_id) {
                        dict.set(key, value);
                    }
                }
            }
        }

        log::debug!("loaded document with {} pages", source_pages.len());

        Self {
            doc,
            source_pages,
            output: VecDeque::new(),
            used: HashSet::new(),
            label_font: None,
        }
    }

    pub fn load_mem(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(Document::load_mem(bytes)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Document::load(path)?))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn source_len(&self) -> usize {
        self.source_pages.len()
    }

    /// Finish the output page tree and hand back the document.
    pub fn into_document(mut self) -> Result<Document> {
        self.build_page_tree()?;
        Ok(self.doc)
    }

    fn read_page(&self, id: ObjectId) -> LopdfPage {
        let Ok(dict) = self.doc.get_dictionary(id) else {
            log::warn!("page object {:?} is not a dictionary", id);
            let bbox = PageRect::full(DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);
            return LopdfPage::source(id, bbox, Rotation::Rot0, 1.0);
        };

        let bbox = get_trim_box(&self.doc, dict);
        let rotation = dict
            .get(b"Rotate")
            .ok()
            .and_then(|obj| obj.as_i64().ok())
            .map(Rotation::from_pdf_rotate)
            .unwrap_or_default();
        let user_unit = dict
            .get(b"UserUnit")
            .ok()
            .and_then(extract_number)
            .filter(|unit| *unit > 0.0)
            .unwrap_or(1.0);

        LopdfPage::source(id, bbox, rotation, user_unit)
    }

    fn set_rotate(&mut self, id: ObjectId, rot: Rotation) -> Result<()> {
        let dict = self.doc.get_dictionary_mut(id)?;
        if rot == Rotation::Rot0 {
            dict.remove(b"Rotate");
        } else {
            dict.set("Rotate", Object::Integer(rot.to_pdf_rotate()));
        }
        Ok(())
    }

    fn shallow_copy(&mut self, id: ObjectId) -> Result<ObjectId> {
        let dict = self.doc.get_dictionary(id)?.clone();
        Ok(self.doc.add_object(dict))
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    /// Turn a page handle into a page object.
    fn build_page(&mut self, page: LopdfPage) -> Result<ObjectId> {
        let rotate = page.base_rotation + page.rotation;

        match page.origin {
            PageOrigin::Source(id) => {
                let id = if self.used.insert(id) {
                    id
                } else {
                    self.shallow_copy(id)?
                };
                self.set_rotate(id, rotate)?;
                if page.bbox_changed {
                    let dict = self.doc.get_dictionary_mut(id)?;
                    dict.set("TrimBox", box_array(&page.bbox));
                    dict.set("CropBox", box_array(&page.bbox));
                }
                Ok(id)
            }
            PageOrigin::Blank => {
                let resources = self.build_resources(page.subpages, page.uses_label_font)?;
                let content_id = self
                    .doc
                    .add_object(Stream::new(Dictionary::new(), page.content.into_bytes()));

                let mut dict = Dictionary::new();
                dict.set("Type", Object::Name(b"Page".to_vec()));
                dict.set("MediaBox", box_array(&page.bbox));
                dict.set("Resources", Object::Dictionary(resources));
                dict.set("Contents", Object::Reference(content_id));
                if rotate != Rotation::Rot0 {
                    dict.set("Rotate", Object::Integer(rotate.to_pdf_rotate()));
                }
                Ok(self.doc.add_object(dict))
            }
        }
    }

    /// Turn a placed page into a Form XObject showing its visible box upright
    /// at the origin.
    fn build_xobject(&mut self, page: LopdfPage) -> Result<ObjectId> {
        let rotate = page.base_rotation + page.rotation;
        let matrix = rotation_matrix(rotate, &page.bbox, page.user_unit);

        let (resources, content) = match page.origin {
            PageOrigin::Source(id) => {
                let dict = self.doc.get_dictionary(id)?;
                let content = get_page_content(&self.doc, dict)?;
                let resources = dict
                    .get(b"Resources")
                    .cloned()
                    .unwrap_or_else(|_| Object::Dictionary(Dictionary::new()));
                (resources, content)
            }
            PageOrigin::Blank => {
                let resources = self.build_resources(page.subpages, page.uses_label_font)?;
                (Object::Dictionary(resources), page.content.into_bytes())
            }
        };

        let stream = form_xobject(&page.bbox, matrix, resources, content);
        Ok(self.doc.add_object(stream))
    }

    fn build_resources(&mut self, subpages: Vec<LopdfPage>, uses_label_font: bool) -> Result<Dictionary> {
        let mut resources = Dictionary::new();

        if !subpages.is_empty() {
            let mut xobjects = Dictionary::new();
            for (idx, sub) in subpages.into_iter().enumerate() {
                let xobject_id = self.build_xobject(sub)?;
                xobjects.set(xobject_name(idx + 1), Object::Reference(xobject_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        if uses_label_font {
            let font_id = self.label_font();
            let mut fonts = Dictionary::new();
            fonts.set(LABEL_FONT_NAME, Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }

        Ok(resources)
    }

    fn label_font(&mut self) -> ObjectId {
        if let Some(id) = self.label_font {
            return id;
        }
        let font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]);
        let id = self.doc.add_object(font);
        self.label_font = Some(id);
        id
    }

    /// Replace the page tree with one holding exactly the output pages.
    fn build_page_tree(&mut self) -> Result<()> {
        let pages_id = self.doc.new_object_id();

        for &id in &self.output {
            self.doc
                .get_dictionary_mut(id)?
                .set("Parent", Object::Reference(pages_id));
        }

        let kids: Vec<Object> = self.output.iter().map(|&id| Object::Reference(id)).collect();
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.trailer.get(b"Root").and_then(Object::as_reference);
        match catalog_id {
            Ok(catalog_id) => {
                self.doc
                    .get_dictionary_mut(catalog_id)?
                    .set("Pages", Object::Reference(pages_id));
            }
            Err(_) => {
                let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Catalog".to_vec())),
                    ("Pages", Object::Reference(pages_id)),
                ]));
                self.doc.trailer.set("Root", Object::Reference(catalog_id));
            }
        }

        // printed output is written unencrypted
        self.doc.trailer.remove(b"Encrypt");
        self.doc.encryption_state = None;
        self.doc.prune_objects();
        Ok(())
    }
}

impl ProcessingDocument for LopdfDocument {
    fn check_print_permissions(&self) -> bool {
        // lopdf decrypts on load and drops /Encrypt from the trailer
        if let Some(state) = &self.doc.encryption_state {
            return state.permissions().contains(Permissions::PRINTABLE);
        }

        let encrypt = match self.doc.trailer.get(b"Encrypt") {
            Ok(Object::Reference(id)) => self.doc.get_dictionary(*id).ok(),
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        };

        match encrypt
            .and_then(|dict| dict.get(b"P").ok())
            .and_then(|p| p.as_i64().ok())
        {
            Some(p) => p & PERMISSION_PRINT != 0,
            None => true,
        }
    }

    fn pages(&mut self) -> Vec<Box<dyn ProcessingPage>> {
        self.source_pages
            .iter()
            .map(|&id| Box::new(self.read_page(id)) as Box<dyn ProcessingPage>)
            .collect()
    }

    fn new_page(&mut self, width: f32, height: f32) -> Box<dyn ProcessingPage> {
        Box::new(LopdfPage::blank(width, height))
    }

    fn add_page(&mut self, page: Box<dyn ProcessingPage>, front: bool) -> Result<()> {
        let page_id = self.build_page(LopdfPage::from_handle(page))?;
        if front {
            self.output.push_front(page_id);
        } else {
            self.output.push_back(page_id);
        }
        Ok(())
    }

    fn output_len(&self) -> usize {
        self.output.len()
    }

    fn multiply(&mut self, copies: usize, collate: bool) -> Result<()> {
        assert!(copies > 0, "copy count must be at least 1");
        let pages: Vec<ObjectId> = self.output.iter().copied().collect();

        if collate {
            for _ in 1..copies {
                for &id in &pages {
                    let copy = self.shallow_copy(id)?;
                    self.output.push_back(copy);
                }
            }
        } else {
            let mut output = VecDeque::with_capacity(pages.len() * copies);
            for &id in &pages {
                output.push_back(id);
                for _ in 1..copies {
                    output.push_back(self.shallow_copy(id)?);
                }
            }
            self.output = output;
        }
        Ok(())
    }

    fn auto_rotate_all(&mut self, dst_landscape: bool, normal_landscape: Rotation) {
        for idx in 0..self.source_pages.len() {
            let id = self.source_pages[idx];
            let page = self.read_page(id);
            let rect = page.rect();
            let src_landscape = rect.width > rect.height;
            if src_landscape != dst_landscape {
                if let Err(e) = self.set_rotate(id, page.base_rotation + normal_landscape) {
                    log::warn!("could not rotate page {}: {}", idx + 1, e);
                }
            }
        }
    }

    fn discard_output(&mut self) {
        self.output.clear();
    }

    fn emit(&mut self, mut out: &mut dyn Write) -> Result<()> {
        self.build_page_tree()?;
        self.doc.save_to(&mut out)?;
        Ok(())
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("source_pages", &self.source_pages.len())
            .field("output", &self.output.len())
            .finish()
    }
}
