use std::ops::{Add, Neg, Sub};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to process")]
    NoPages,
    #[error("Document does not permit printing")]
    PrintNotPermitted,
    #[error("Job cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Counter-clockwise rotation in quarter turns.
///
/// Rotations form the cyclic group of order 4: `+`, `-` and unary `-`
/// all wrap around, so an out-of-range angle cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

impl Rotation {
    const ALL: [Rotation; 4] = [
        Rotation::Rot0,
        Rotation::Rot90,
        Rotation::Rot180,
        Rotation::Rot270,
    ];

    fn quarter_turns(self) -> usize {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 1,
            Rotation::Rot180 => 2,
            Rotation::Rot270 => 3,
        }
    }

    fn from_quarter_turns(turns: usize) -> Self {
        Self::ALL[turns % 4]
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() as i32 * 90
    }

    /// Convert an angle in degrees. Any multiple of 90 is accepted,
    /// negative angles included.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(
            (degrees / 90).rem_euclid(4) as usize,
        ))
    }

    /// True for 90° and 270°, the rotations that swap width and height.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Rot90 | Rotation::Rot270)
    }

    /// Value of the PDF `/Rotate` key, which counts clockwise.
    pub fn to_pdf_rotate(self) -> i64 {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 270,
            Rotation::Rot180 => 180,
            Rotation::Rot270 => 90,
        }
    }

    /// Interpret a PDF `/Rotate` value. Values that are not multiples of 90
    /// are invalid per the PDF reference and read as no rotation.
    pub fn from_pdf_rotate(value: i64) -> Self {
        if value % 90 != 0 {
            return Rotation::Rot0;
        }
        -Self::from_quarter_turns((value / 90).rem_euclid(4) as usize)
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, rhs: Rotation) -> Rotation {
        Rotation::from_quarter_turns(self.quarter_turns() + rhs.quarter_turns())
    }
}

impl Sub for Rotation {
    type Output = Rotation;

    fn sub(self, rhs: Rotation) -> Rotation {
        self + (-rhs)
    }
}

impl Neg for Rotation {
    type Output = Rotation;

    fn neg(self) -> Rotation {
        Rotation::from_quarter_turns(4 - self.quarter_turns())
    }
}

/// Alignment along one axis.
///
/// `Start` is left on the X axis and bottom on the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Start,
    #[default]
    Center,
    End,
}

impl Position {
    pub const LEFT: Position = Position::Start;
    pub const RIGHT: Position = Position::End;
    pub const BOTTOM: Position = Position::Start;
    pub const TOP: Position = Position::End;

    /// -1, 0 or 1.
    pub fn sign(self) -> i32 {
        match self {
            Position::Start => -1,
            Position::Center => 0,
            Position::End => 1,
        }
    }

    /// Offset that aligns an object inside `free` units of leftover space.
    pub fn offset(self, free: f32) -> f32 {
        match self {
            Position::Start => 0.0,
            Position::Center => free / 2.0,
            Position::End => free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    X,
    Y,
}

/// Decorative rule drawn around a placed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderType {
    #[default]
    None,
    OneThin,
    OneThick,
    TwoThin,
    TwoThick,
}

impl BorderType {
    const THICK: u8 = 0x01;
    const ONE: u8 = 0x02;
    const TWO: u8 = 0x04;

    pub fn bits(self) -> u8 {
        match self {
            BorderType::None => 0,
            BorderType::OneThin => Self::ONE,
            BorderType::OneThick => Self::ONE | Self::THICK,
            BorderType::TwoThin => Self::TWO,
            BorderType::TwoThick => Self::TWO | Self::THICK,
        }
    }

    pub fn is_thick(self) -> bool {
        self.bits() & Self::THICK != 0
    }

    pub fn is_double(self) -> bool {
        self.bits() & Self::TWO != 0
    }
}

/// How source pages are reconciled with the target sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Place pages at their natural size
    #[default]
    None,
    /// Scale to fit the printable area (preserve aspect ratio)
    Fit,
    /// Crop to the sheet aspect, then scale to fill
    Fill,
    /// Crop to the printable area without scaling
    Crop,
    /// Pick Fit, Fill or Crop from the document and the margins
    Auto,
    /// Pick Fill or Crop from the document size
    AutoFit,
}

/// Booklet imposition mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BookletMode {
    #[default]
    Off,
    /// Reorder pages and force 2-up
    On,
    /// Reorder pages only, keep the configured n-up
    ShuffleOnly,
}

/// Statistics about a processed job
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Number of pages in the source document
    pub source_pages: usize,
    /// Output sheets for a single copy, filler sheets included
    pub output_sheets: usize,
    /// Output page count after copy multiplication
    pub output_pages: usize,
    /// Blank pages synthesized per copy (booklet fillers and duplex padding)
    pub blank_pages_added: usize,
}
