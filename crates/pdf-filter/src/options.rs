use crate::layout::{NupParameters, PageRect};
use crate::ranges::IntervalSet;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resolved job configuration consumed by [`impose`](crate::impose())
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessingParameters {
    // Copies
    pub num_copies: usize,
    pub collate: bool,
    /// Copies the device makes itself; informational
    pub device_copies: usize,
    /// Device collation hint; informational
    pub device_collate: bool,

    // Sheet geometry
    pub page: PageRect,
    pub orientation: Rotation,
    /// Rotation that turns a portrait sheet into landscape
    pub normal_landscape: Rotation,
    pub paper_is_landscape: bool,
    /// No orientation was requested; scaling may pick one from the document
    pub no_orientation: bool,

    // Duplex
    /// The device prints two-sided; informational. Option resolution
    /// turns it into `even_duplex` where padding is wanted.
    pub duplex: bool,
    pub even_duplex: bool,

    // Layout
    pub nup: NupParameters,
    pub booklet: BookletMode,
    /// Pages per booklet signature, `None` = whole document
    pub book_signature: Option<usize>,
    pub scaling: ScalingMode,
    /// Prefer reproducing the document faithfully over filling the sheet
    pub fidelity: bool,
    pub auto_rotate: bool,
    pub xpos: Position,
    pub ypos: Position,
    pub mirror: bool,
    pub reverse: bool,

    // Decoration
    pub border: BorderType,
    pub page_label: Option<String>,

    // Page selection
    pub even_pages: bool,
    pub odd_pages: bool,
    pub page_range: IntervalSet,

    // Accounting
    pub page_logging: bool,
    pub copies_to_be_logged: usize,
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            num_copies: 1,
            collate: false,
            device_copies: 1,
            device_collate: false,
            page: PageRect::default(),
            orientation: Rotation::Rot0,
            normal_landscape: Rotation::Rot270,
            paper_is_landscape: false,
            no_orientation: false,
            duplex: false,
            even_duplex: false,
            nup: NupParameters::default(),
            booklet: BookletMode::Off,
            book_signature: None,
            scaling: ScalingMode::None,
            fidelity: false,
            auto_rotate: false,
            xpos: Position::Center,
            ypos: Position::Center,
            mirror: false,
            reverse: false,
            border: BorderType::None,
            page_label: None,
            even_pages: true,
            odd_pages: true,
            page_range: IntervalSet::default(),
            page_logging: false,
            copies_to_be_logged: 1,
        }
    }
}

impl ProcessingParameters {
    /// Load parameters from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let params = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(params)
    }

    /// Save parameters to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Check that the parameters are in the normalized form the imposition
    /// core expects.
    pub fn validate(&self) -> Result<()> {
        if self.num_copies == 0 {
            return Err(ImposeError::Config(
                "Number of copies must be at least 1".to_string(),
            ));
        }

        if !self.nup.is_preset_shape() {
            return Err(ImposeError::Config(format!(
                "Unsupported n-up grid {}x{}",
                self.nup.nup_x, self.nup.nup_y
            )));
        }

        if let Some(signature) = self.book_signature {
            if signature == 0 || signature % 4 != 0 {
                return Err(ImposeError::Config(
                    "Booklet signature must be a positive multiple of 4".to_string(),
                ));
            }
        }

        let page = &self.page;
        let horizontal_ok = 0.0 <= page.left && page.left <= page.right && page.right <= page.width;
        let vertical_ok = 0.0 <= page.bottom && page.bottom <= page.top && page.top <= page.height;
        if !(horizontal_ok && vertical_ok) || page.width <= 0.0 || page.height <= 0.0 {
            return Err(ImposeError::Config(
                "Printable area must lie within the sheet".to_string(),
            ));
        }

        if !self.even_pages && !self.odd_pages {
            return Err(ImposeError::Config(
                "Neither odd nor even pages selected".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether output page `outno` (1-based) passes the odd/even and
    /// page-range filters.
    pub fn with_page(&self, outno: usize) -> bool {
        if outno % 2 == 0 {
            if !self.even_pages {
                return false;
            }
        } else if !self.odd_pages {
            return false;
        }
        self.page_range.contains(outno)
    }

    /// Whether the output must be padded to an even page count.
    ///
    /// Depends on `even_duplex` and the odd-page filter only; `duplex`
    /// itself never pads.
    pub fn needs_even_padding(&self) -> bool {
        self.even_duplex || !self.odd_pages
    }

    pub fn dump(&self) {
        log::debug!(
            "copies: {} (collate: {}), device copies: {} (collate: {})",
            self.num_copies,
            self.collate,
            self.device_copies,
            self.device_collate
        );
        log::debug!("page:");
        self.page.dump();
        log::debug!(
            "orientation: {}, normal landscape: {}, paper is landscape: {}, duplex: {} (even: {})",
            self.orientation.degrees(),
            self.normal_landscape.degrees(),
            self.paper_is_landscape,
            self.duplex,
            self.even_duplex
        );
        self.nup.dump();
        log::debug!(
            "booklet: {:?} (signature: {:?}), scaling: {:?}, fidelity: {}, auto-rotate: {}",
            self.booklet,
            self.book_signature,
            self.scaling,
            self.fidelity,
            self.auto_rotate
        );
        log::debug!(
            "position: {:?}/{:?}, mirror: {}, reverse: {}, border: {:?}, label: {:?}",
            self.xpos,
            self.ypos,
            self.mirror,
            self.reverse,
            self.border,
            self.page_label
        );
        log::debug!(
            "even pages: {}, odd pages: {}, page logging: {}",
            self.even_pages,
            self.odd_pages,
            self.page_logging
        );
        self.page_range.dump();
    }
}
