//! XObject creation and page dictionary helpers
//!
//! Pages that are placed onto other pages are turned into Form XObjects.
//! Source pages stay in the same lopdf document, so their resources are
//! referenced rather than copied.

use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT};
use crate::layout::PageRect;
use crate::types::{Result, Rotation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Parent chain depth after which inherited lookups give up
const MAX_TREE_DEPTH: usize = 64;

// =============================================================================
// XObject Creation
// =============================================================================

/// Build a Form XObject drawing `content` clipped to `bbox`.
///
/// `matrix` maps form space to the space of the page that draws it.
pub fn form_xobject(
    bbox: &PageRect,
    matrix: [f32; 6],
    resources: Object,
    content: Vec<u8>,
) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Form".to_vec()));
    dict.set("FormType", Object::Integer(1));
    dict.set("BBox", box_array(bbox));
    dict.set(
        "Matrix",
        Object::Array(matrix.iter().map(|&v| Object::Real(v)).collect()),
    );
    dict.set("Resources", resources);
    Stream::new(dict, content)
}

/// Matrix that turns a page box by `rot` (counter-clockwise), moves its
/// lower-left corner to the origin and applies `user_unit`.
pub fn rotation_matrix(rot: Rotation, bbox: &PageRect, user_unit: f32) -> [f32; 6] {
    let (l, b) = (bbox.left, bbox.bottom);
    let (w, h) = (bbox.printable_width(), bbox.printable_height());
    let u = user_unit;

    match rot {
        Rotation::Rot0 => [u, 0.0, 0.0, u, -l * u, -b * u],
        Rotation::Rot90 => [0.0, u, -u, 0.0, (h + b) * u, -l * u],
        Rotation::Rot180 => [-u, 0.0, 0.0, -u, (w + l) * u, (h + b) * u],
        Rotation::Rot270 => [0.0, -u, u, 0.0, -b * u, (w + l) * u],
    }
}

/// Resource name of the n-th (1-based) placed page
pub fn xobject_name(index: usize) -> String {
    format!("X{}", index)
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
pub fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            _ => get_single_content_stream(doc, *id),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Get content from a single content stream reference
fn get_single_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    if let Ok(stream) = doc.get_object(id)?.as_stream() {
        Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()))
    } else {
        Ok(Vec::new())
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend_from_slice(&get_single_content_stream(doc, *id)?);
            result.push(b'\n');
        }
    }

    Ok(result)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up `key` on a page, following the `/Parent` chain for inherited
/// attributes.
pub fn get_inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Read a page box (`/MediaBox`, `/TrimBox`, ...) as a normalized rectangle.
pub fn read_box(doc: &Document, page_dict: &Dictionary, key: &[u8]) -> Option<PageRect> {
    let obj = resolve(doc, page_dict.get(key).ok()?);
    let arr = obj.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }

    let mut coords = [0.0f32; 4];
    for (slot, value) in coords.iter_mut().zip(arr) {
        *slot = extract_number(resolve(doc, value))?;
    }
    let [x1, y1, x2, y2] = coords;
    Some(PageRect::from_box(
        x1.min(x2),
        y1.min(y2),
        x1.max(x2),
        y1.max(y2),
    ))
}

/// The box content is trimmed to: TrimBox, else CropBox, else MediaBox.
pub fn get_trim_box(doc: &Document, page_dict: &Dictionary) -> PageRect {
    [&b"TrimBox"[..], b"CropBox", b"MediaBox"]
        .iter()
        .find_map(|key| read_box(doc, page_dict, key))
        .unwrap_or_else(|| PageRect::full(DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT))
}

pub fn box_array(rect: &PageRect) -> Object {
    Object::Array(vec![
        Object::Real(rect.left),
        Object::Real(rect.bottom),
        Object::Real(rect.right),
        Object::Real(rect.top),
    ])
}

/// Follow a single indirect reference.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Extract numeric value from a PDF object
pub fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
