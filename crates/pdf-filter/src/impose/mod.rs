//! Page imposition for the print pipeline
//!
//! This module orchestrates one job against a [`ProcessingDocument`]:
//! 1. Check print permission and optionally auto-rotate source pages
//! 2. Reorder pages for booklets
//! 3. Resolve the scaling policy and pre-crop pages for fill/crop
//! 4. Place pages one per sheet, or n-up onto composite sheets
//! 5. Pad for duplex and multiply copies

mod io;
mod scaling;

pub use io::{impose_file, load_pdf, save_pdf};
pub use scaling::resolve_scaling;

use crate::backend::{ProcessingDocument, ProcessingPage};
use crate::constants::PAGE_LOG_PREFIX;
use crate::layout::{NupParameters, NupState, PageRect, booklet_shuffle};
use crate::options::ProcessingParameters;
use crate::types::*;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared with a running job
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a successful imposition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImposeReport {
    pub source_pages: usize,
    /// Pages in the output, copies included
    pub output_pages: usize,
    /// Blank filler and padding pages, counted once per copy set
    pub blank_pages_added: usize,
    pub copies: usize,
}

/// Impose `doc` with `params`, writing page accounting to stderr.
pub fn impose(
    doc: &mut dyn ProcessingDocument,
    params: &ProcessingParameters,
) -> Result<ImposeReport> {
    Imposer::new(params).run(doc)
}

/// Configurable imposition run
pub struct Imposer<'a> {
    params: &'a ProcessingParameters,
    page_log: Option<&'a mut dyn Write>,
    cancel: Option<CancelToken>,
    output_count: usize,
    blank_count: usize,
}

/// Grid geometry derived for one run; the parameters stay untouched.
struct SheetLayout {
    nup: NupParameters,
    orientation: Rotation,
    /// Printable box in the coordinates of the unrotated composite sheet
    area: PageRect,
}

impl<'a> Imposer<'a> {
    pub fn new(params: &'a ProcessingParameters) -> Self {
        Self {
            params,
            page_log: None,
            cancel: None,
            output_count: 0,
            blank_count: 0,
        }
    }

    /// Write `PAGE:` accounting lines to `sink` instead of stderr.
    pub fn with_page_log(mut self, sink: &'a mut dyn Write) -> Self {
        self.page_log = Some(sink);
        self
    }

    pub fn with_cancel(mut self, token: &CancelToken) -> Self {
        self.cancel = Some(token.clone());
        self
    }

    pub fn run(mut self, doc: &mut dyn ProcessingDocument) -> Result<ImposeReport> {
        let params = self.params;

        if !doc.check_print_permissions() {
            log::warn!("Not allowed to print");
            return Err(ImposeError::PrintNotPermitted);
        }

        params.dump();

        if params.auto_rotate {
            let dst_landscape = params.paper_is_landscape
                == matches!(params.orientation, Rotation::Rot0 | Rotation::Rot180);
            doc.auto_rotate_all(dst_landscape, params.normal_landscape);
        }

        let mut pages: Vec<Option<Box<dyn ProcessingPage>>> =
            doc.pages().into_iter().map(Some).collect();
        let num_orig_pages = pages.len();
        let first_rect = match pages.first() {
            Some(Some(page)) => page.rect(),
            _ => return Err(ImposeError::NoPages),
        };

        let mut nup = params.nup;
        let shuffle: Vec<usize> = match params.booklet {
            BookletMode::Off => (0..num_orig_pages).collect(),
            mode => {
                if mode == BookletMode::On {
                    log::debug!("booklet mode forces 2-up");
                    nup.set_preset(2);
                }
                booklet_shuffle(num_orig_pages, params.book_signature)
            }
        };

        // scaling policy
        let mut orientation = params.orientation;
        let scaling = resolve_scaling(params, &first_rect);
        let mut fitplot = scaling == ScalingMode::Fit;
        let mut cropfit = false;
        if matches!(scaling, ScalingMode::Fill | ScalingMode::Crop) {
            if params.no_orientation {
                if let Some(Some(first)) = pages.first() {
                    if first.is_landscape(orientation) {
                        orientation = params.normal_landscape;
                    }
                }
            }
            let fill = scaling == ScalingMode::Fill;
            for page in pages.iter_mut().flatten() {
                page.crop(&params.page, orientation, params.xpos, params.ypos, fill);
            }
            if fill {
                fitplot = true;
            } else {
                cropfit = true;
            }
        }

        if nup.count() == 1 && !fitplot && !cropfit {
            self.place_direct(doc, &mut pages, &shuffle, orientation)?;
        } else {
            let layout = Self::sheet_layout(params, nup, orientation, fitplot);
            self.place_grid(doc, &mut pages, &shuffle, layout, fitplot, cropfit)?;
        }

        if params.needs_even_padding() && self.output_count % 2 == 1 {
            log::debug!("padding output to an even page count");
            let blank = doc.new_page(params.page.width, params.page.height);
            doc.add_page(blank, params.reverse)?;
            self.output_count += 1;
            self.blank_count += 1;
            self.log_page(self.output_count)?;
        }

        self.check_cancelled(doc)?;
        doc.multiply(params.num_copies, params.collate)?;

        Ok(ImposeReport {
            source_pages: num_orig_pages,
            output_pages: doc.output_len(),
            blank_pages_added: self.blank_count,
            copies: params.num_copies,
        })
    }

    /// One page per sheet.
    fn place_direct(
        &mut self,
        doc: &mut dyn ProcessingDocument,
        pages: &mut [Option<Box<dyn ProcessingPage>>],
        shuffle: &[usize],
        orientation: Rotation,
    ) -> Result<()> {
        let params = self.params;

        for (i, &idx) in shuffle.iter().enumerate() {
            if !params.with_page(i + 1) {
                continue;
            }

            let Some(mut page) = pages.get_mut(idx).and_then(Option::take) else {
                let filler = doc.new_page(params.page.width, params.page.height);
                doc.add_page(filler, params.reverse)?;
                self.output_count += 1;
                self.blank_count += 1;
                self.log_page(self.output_count)?;
                continue;
            };

            page.rotate(orientation);
            if params.mirror {
                page.mirror();
            }
            if let Some(label) = &params.page_label {
                page.add_label(&params.page, label);
            }
            if params.border != BorderType::None {
                page.add_border_rect(&params.page, params.border, 1.0);
            }
            doc.add_page(page, params.reverse)?;
            self.output_count += 1;
            self.log_page(self.output_count)?;
        }
        Ok(())
    }

    /// Fold the requested orientation into the grid and work out where the
    /// printable area lies on the unrotated composite sheet.
    fn sheet_layout(
        params: &ProcessingParameters,
        mut nup: NupParameters,
        mut orientation: Rotation,
        fitplot: bool,
    ) -> SheetLayout {
        if orientation.is_quarter_turn() {
            std::mem::swap(&mut nup.nup_x, &mut nup.nup_y);
            nup.landscape = !nup.landscape;
            orientation = orientation - params.normal_landscape;
        }
        if nup.landscape {
            orientation = orientation + params.normal_landscape;
            if nup.count() != 1 || fitplot {
                nup.xalign = Position::Center;
                nup.yalign = Position::BOTTOM;
            }
        }

        // the sheet is output turned by `orientation`, so lay out on the
        // sheet turned back
        let mut area = params.page;
        area.rotate_move(-orientation, params.page.width, params.page.height);
        nup.width = area.printable_width();
        nup.height = area.printable_height();

        log::debug!(
            "grid {}x{} on {}x{} sheet, orientation {}",
            nup.nup_x,
            nup.nup_y,
            area.width,
            area.height,
            orientation.degrees()
        );

        SheetLayout {
            nup,
            orientation,
            area,
        }
    }

    /// Several pages per composite sheet.
    fn place_grid(
        &mut self,
        doc: &mut dyn ProcessingDocument,
        pages: &mut [Option<Box<dyn ProcessingPage>>],
        shuffle: &[usize],
        layout: SheetLayout,
        fitplot: bool,
        cropfit: bool,
    ) -> Result<()> {
        let params = self.params;
        let area = layout.area;
        let single = layout.nup.count() == 1;
        let mut state = NupState::new(layout.nup);

        let mut sheet: Option<Box<dyn ProcessingPage>> = None;
        let mut sheet_is_blank = true;
        let mut sheet_number = 0;

        for &idx in shuffle {
            let page = pages.get_mut(idx).and_then(Option::take);

            let rect = match &page {
                Some(page) if fitplot || cropfit => page.rect(),
                _ => PageRect::full(params.page.width, params.page.height),
            };

            let (new_sheet, edit) = state.next_page(rect.width, rect.height);
            if new_sheet {
                if let Some(done) = sheet.take() {
                    self.flush_sheet(doc, done, sheet_number, sheet_is_blank, layout.orientation)?;
                }
                sheet = Some(doc.new_page(area.width, area.height));
                sheet_is_blank = true;
                sheet_number += 1;
            }

            let Some(mut page) = page else {
                continue;
            };
            let Some(current) = sheet.as_mut() else {
                continue;
            };
            edit.dump();

            if params.border != BorderType::None {
                page.add_border_rect(&rect, params.border, 1.0 / edit.scale);
            }
            if let Some(label) = &params.page_label {
                page.add_label(&params.page, label);
            }

            if cropfit && single {
                let xpos = (area.width - rect.width) / 2.0;
                let ypos = (area.height - rect.height) / 2.0;
                current.add_subpage(page, xpos, ypos, 1.0, None);
            } else if cropfit {
                current.add_subpage(
                    page,
                    edit.xpos + area.left,
                    edit.ypos + area.bottom,
                    edit.scale,
                    None,
                );
            } else {
                current.add_subpage(
                    page,
                    edit.xpos + area.left,
                    edit.ypos + area.bottom,
                    edit.scale,
                    Some(&rect),
                );
            }
            sheet_is_blank = false;
        }

        if let Some(done) = sheet.take() {
            self.flush_sheet(doc, done, sheet_number, sheet_is_blank, layout.orientation)?;
        }
        Ok(())
    }

    fn flush_sheet(
        &mut self,
        doc: &mut dyn ProcessingDocument,
        mut sheet: Box<dyn ProcessingPage>,
        sheet_number: usize,
        is_blank: bool,
        orientation: Rotation,
    ) -> Result<()> {
        self.check_cancelled(doc)?;
        if !self.params.with_page(sheet_number) {
            log::debug!("sheet {} filtered out", sheet_number);
            return Ok(());
        }

        sheet.rotate(orientation);
        if self.params.mirror {
            sheet.mirror();
        }
        doc.add_page(sheet, self.params.reverse)?;
        self.output_count += 1;
        if is_blank {
            self.blank_count += 1;
        }
        log::debug!("sheet {} done", sheet_number);
        self.log_page(self.output_count)
    }

    fn check_cancelled(&self, doc: &mut dyn ProcessingDocument) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            log::info!("imposition cancelled");
            doc.discard_output();
            return Err(ImposeError::Cancelled);
        }
        Ok(())
    }

    /// Emit one page-accounting line for the `number`-th emitted sheet.
    fn log_page(&mut self, number: usize) -> Result<()> {
        if !self.params.page_logging {
            return Ok(());
        }
        let line = format!(
            "{} {} {}\n",
            PAGE_LOG_PREFIX, number, self.params.copies_to_be_logged
        );
        match self.page_log.as_deref_mut() {
            Some(sink) => sink.write_all(line.as_bytes())?,
            None => std::io::stderr().write_all(line.as_bytes())?,
        }
        Ok(())
    }
}
