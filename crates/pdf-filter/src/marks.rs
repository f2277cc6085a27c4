//! Page decoration rendering
//!
//! This module generates PDF content stream operations for the
//! decorations the imposition engine stamps onto pages: border rules and
//! text labels.

use crate::constants::{
    BORDER_DOUBLE_GAP, BORDER_MARGIN, BORDER_THICK_WIDTH, BORDER_THIN_WIDTH, LABEL_FONT_NAME,
    LABEL_FONT_SIZE, LABEL_MARGIN,
};
use crate::layout::PageRect;
use crate::types::BorderType;

/// Generate the rule(s) of `border` just inside the box of `rect`.
///
/// Line weight and insets are multiplied by `scale`, so a caller that
/// draws into content which is later shrunk by `s` passes `1/s` to keep
/// the printed weight constant.
pub fn border_ops(rect: &PageRect, border: BorderType, scale: f32) -> String {
    let mut ops = String::new();
    if border == BorderType::None {
        return ops;
    }

    let base_width = if border.is_thick() {
        BORDER_THICK_WIDTH
    } else {
        BORDER_THIN_WIDTH
    };
    let mut margin = BORDER_MARGIN * scale;

    ops.push_str("q\n");
    ops.push_str(&format!("{} w 0 G\n", base_width * scale));
    ops.push_str(&inset_rect(rect, margin));
    if border.is_double() {
        margin += BORDER_DOUBLE_GAP * scale;
        ops.push_str(&inset_rect(rect, margin));
    }
    ops.push_str("Q\n");

    ops
}

fn inset_rect(rect: &PageRect, margin: f32) -> String {
    format!(
        "{} {} {} {} re S\n",
        rect.left + margin,
        rect.bottom + margin,
        rect.printable_width() - 2.0 * margin,
        rect.printable_height() - 2.0 * margin
    )
}

/// Generate a boxed text label along the top and bottom edges of `rect`.
///
/// The label font must be available as [`LABEL_FONT_NAME`] in the page
/// resources.
pub fn label_ops(rect: &PageRect, label: &str) -> String {
    let margin = LABEL_MARGIN;
    let height = LABEL_FONT_SIZE;
    let box_width = rect.printable_width() - 2.0 * margin;
    let box_height = height + 2.0 * margin;

    let top_box = format!(
        "{} {} {} {} re",
        rect.left + margin,
        rect.top - height - 2.0 * margin,
        box_width,
        box_height
    );
    let bottom_box = format!(
        "{} {} {} {} re",
        rect.left + margin,
        rect.bottom + margin,
        box_width,
        box_height
    );
    let text = escape_pdf_string(label);

    let mut ops = String::new();
    ops.push_str("q\n");

    // white background
    ops.push_str("1 1 1 rg\n");
    ops.push_str(&format!("{} f\n{} f\n", top_box, bottom_box));

    // black outline
    ops.push_str("0 0 0 RG\n");
    ops.push_str(&format!("{} S\n{} S\n", top_box, bottom_box));

    // black text
    ops.push_str("0 0 0 rg\n");
    for baseline in [rect.top - height - margin, rect.bottom + 2.0 * margin] {
        ops.push_str(&format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
            LABEL_FONT_NAME,
            LABEL_FONT_SIZE,
            rect.left + 2.0 * margin,
            baseline,
            text
        ));
    }

    ops.push_str("Q\n");
    ops
}

/// Escape text for a PDF literal string.
///
/// The label font only covers Latin-1; other characters become `?`.
pub fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c if (c as u32) < 0x20 => escaped.push(' '),
            c if (c as u32) < 0x80 => escaped.push(c),
            c if (c as u32) <= 0xff => escaped.push_str(&format!("\\{:03o}", c as u32)),
            _ => escaped.push('?'),
        }
    }
    escaped
}

// =============================================================================
// Tests
// =============================================================================
