#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use pdf_filter::*;
use std::any::Any;
use std::collections::VecDeque;
use std::io::Write;

/// A placed sub-page and where it went
#[derive(Debug, Clone)]
pub struct Placement {
    pub page: MockPage,
    pub xpos: f32,
    pub ypos: f32,
    pub scale: f32,
    pub crop: Option<PageRect>,
}

/// Page handle that records everything done to it
#[derive(Debug, Clone)]
pub struct MockPage {
    /// 1-based source page number, `None` for created pages
    pub source: Option<usize>,
    pub width: f32,
    pub height: f32,
    pub rotation: Rotation,
    pub mirrored: bool,
    pub labels: Vec<String>,
    pub borders: Vec<(BorderType, f32)>,
    pub crops: Vec<bool>,
    pub subpages: Vec<Placement>,
}

impl MockPage {
    fn new(source: Option<usize>, width: f32, height: f32) -> Self {
        Self {
            source,
            width,
            height,
            rotation: Rotation::Rot0,
            mirrored: false,
            labels: Vec::new(),
            borders: Vec::new(),
            crops: Vec::new(),
            subpages: Vec::new(),
        }
    }

    /// `"3"` for source page 3, `"blank"` for an empty created page,
    /// `"[1,2]"` for a composite sheet.
    pub fn name(&self) -> String {
        match self.source {
            Some(n) => n.to_string(),
            None if self.subpages.is_empty() => "blank".to_string(),
            None => {
                let names: Vec<String> = self.subpages.iter().map(|p| p.page.name()).collect();
                format!("[{}]", names.join(","))
            }
        }
    }
}

impl ProcessingPage for MockPage {
    fn rect(&self) -> PageRect {
        PageRect::full(self.width, self.height)
    }

    fn add_border_rect(&mut self, _rect: &PageRect, border: BorderType, scale: f32) {
        self.borders.push((border, scale));
    }

    fn add_subpage(
        &mut self,
        sub: Box<dyn ProcessingPage>,
        xpos: f32,
        ypos: f32,
        scale: f32,
        crop: Option<&PageRect>,
    ) {
        let page = *sub
            .into_any()
            .downcast::<MockPage>()
            .expect("foreign page handle");
        self.subpages.push(Placement {
            page,
            xpos,
            ypos,
            scale,
            crop: crop.copied(),
        });
    }

    fn mirror(&mut self) {
        self.mirrored = !self.mirrored;
    }

    fn rotate(&mut self, rot: Rotation) {
        self.rotation = rot;
    }

    fn add_label(&mut self, _rect: &PageRect, label: &str) {
        self.labels.push(label.to_string());
    }

    fn crop(
        &mut self,
        _crop_rect: &PageRect,
        _orientation: Rotation,
        _xpos: Position,
        _ypos: Position,
        scale: bool,
    ) -> Rotation {
        self.crops.push(scale);
        Rotation::Rot0
    }

    fn is_landscape(&self, _orientation: Rotation) -> bool {
        self.width > self.height
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// In-memory document backend
#[derive(Debug, Default)]
pub struct MockDocument {
    pub page_sizes: Vec<(f32, f32)>,
    pub forbid_print: bool,
    pub output: VecDeque<MockPage>,
    pub auto_rotated: Option<(bool, Rotation)>,
    pub multiplied: Option<(usize, bool)>,
    pub discarded: bool,
}

impl MockDocument {
    /// `count` US Letter portrait pages
    pub fn letter(count: usize) -> Self {
        Self::with_sizes(vec![(612.0, 792.0); count])
    }

    pub fn with_sizes(page_sizes: Vec<(f32, f32)>) -> Self {
        Self {
            page_sizes,
            ..Default::default()
        }
    }

    pub fn output_names(&self) -> Vec<String> {
        self.output.iter().map(MockPage::name).collect()
    }
}

impl ProcessingDocument for MockDocument {
    fn check_print_permissions(&self) -> bool {
        !self.forbid_print
    }

    fn pages(&mut self) -> Vec<Box<dyn ProcessingPage>> {
        self.page_sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Box::new(MockPage::new(Some(i + 1), w, h)) as Box<dyn ProcessingPage>)
            .collect()
    }

    fn new_page(&mut self, width: f32, height: f32) -> Box<dyn ProcessingPage> {
        Box::new(MockPage::new(None, width, height))
    }

    fn add_page(&mut self, page: Box<dyn ProcessingPage>, front: bool) -> pdf_filter::Result<()> {
        let page = *page
            .into_any()
            .downcast::<MockPage>()
            .expect("foreign page handle");
        if front {
            self.output.push_front(page);
        } else {
            self.output.push_back(page);
        }
        Ok(())
    }

    fn output_len(&self) -> usize {
        self.output.len()
    }

    fn multiply(&mut self, copies: usize, collate: bool) -> pdf_filter::Result<()> {
        self.multiplied = Some((copies, collate));
        let pages: Vec<MockPage> = self.output.drain(..).collect();
        if collate {
            for _ in 0..copies {
                self.output.extend(pages.iter().cloned());
            }
        } else {
            for page in &pages {
                for _ in 0..copies {
                    self.output.push_back(page.clone());
                }
            }
        }
        Ok(())
    }

    fn auto_rotate_all(&mut self, dst_landscape: bool, normal_landscape: Rotation) {
        self.auto_rotated = Some((dst_landscape, normal_landscape));
    }

    fn discard_output(&mut self) {
        self.discarded = true;
        self.output.clear();
    }

    fn emit(&mut self, out: &mut dyn Write) -> pdf_filter::Result<()> {
        writeln!(out, "{}", self.output_names().join(" "))?;
        Ok(())
    }
}

/// Build a minimal PDF with `num_pages` US Letter pages.
pub fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    // Create pages array
    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 24 Tf 72 700 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // MediaBox and Resources are inherited from the page tree root
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Serialize a test document to bytes.
pub fn pdf_bytes(doc: &mut Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}
