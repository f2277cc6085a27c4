use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use pdf_filter::constants::mm_to_pt;
use pdf_filter::{
    BookletMode, BorderType, ImposeError, IntervalSet, NupParameters, PageRect,
    ProcessingParameters, Rotation, ScalingMode,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdffilter",
    about = "Impose PDF pages for printing: n-up, booklets, copies",
    version
)]
struct Cli {
    /// Input PDF file
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF file
    #[arg(short, long, required_unless_present = "stats_only")]
    output: Option<PathBuf>,

    /// JSON parameter file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of copies
    #[arg(long)]
    copies: Option<usize>,

    /// Print copies as complete sets
    #[arg(long)]
    collate: bool,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Unprintable margin in mm (uniform on all sides)
    #[arg(long)]
    margin: Option<f32>,

    /// Pages per sheet (1, 2, 3, 4, 6, 8, 9, 10, 12, 15 or 16)
    #[arg(long)]
    number_up: Option<usize>,

    /// Order of pages on a sheet, e.g. lrtb or btlr
    #[arg(long)]
    number_up_layout: Option<String>,

    /// Content rotation in degrees, counter-clockwise
    #[arg(long, allow_hyphen_values = true)]
    orientation: Option<i32>,

    /// Pages to print, e.g. "1-3,7,10-"
    #[arg(long)]
    page_ranges: Option<String>,

    /// Which output pages to print
    #[arg(long, value_enum)]
    page_set: Option<PageSetArg>,

    /// Reverse the output order
    #[arg(long)]
    reverse: bool,

    /// Mirror pages horizontally
    #[arg(long)]
    mirror: bool,

    /// Booklet mode
    #[arg(long, value_enum)]
    booklet: Option<BookletArg>,

    /// Pages per booklet signature (multiple of 4)
    #[arg(long)]
    signature: Option<usize>,

    /// Border drawn around each page
    #[arg(long, value_enum)]
    page_border: Option<BorderArg>,

    /// Text stamped at the top and bottom of each page
    #[arg(long)]
    page_label: Option<String>,

    /// Scaling mode
    #[arg(long, value_enum)]
    scaling: Option<ScalingArg>,

    /// Pad the output to an even number of pages
    #[arg(long)]
    even_duplex: bool,

    /// Rotate pages whose orientation does not match the paper
    #[arg(long)]
    auto_rotate: bool,

    /// Write "PAGE: n copies" accounting lines to stderr
    #[arg(long)]
    page_log: bool,

    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperArg {
    /// Sheet size in points
    fn dimensions_pt(self) -> (f32, f32) {
        let (width_mm, height_mm) = match self {
            PaperArg::A3 => (297.0, 420.0),
            PaperArg::A4 => (210.0, 297.0),
            PaperArg::A5 => (148.0, 210.0),
            PaperArg::Letter => (215.9, 279.4),
            PaperArg::Legal => (215.9, 355.6),
            PaperArg::Tabloid => (279.4, 431.8),
        };
        (mm_to_pt(width_mm), mm_to_pt(height_mm))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSetArg {
    All,
    Odd,
    Even,
}

#[derive(Clone, Copy, ValueEnum)]
enum BookletArg {
    Off,
    On,
    ShuffleOnly,
}

#[derive(Clone, Copy, ValueEnum)]
enum BorderArg {
    None,
    Single,
    SingleThick,
    Double,
    DoubleThick,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    None,
    Fit,
    Fill,
    Crop,
    Auto,
    AutoFit,
}

impl From<BookletArg> for BookletMode {
    fn from(arg: BookletArg) -> Self {
        match arg {
            BookletArg::Off => Self::Off,
            BookletArg::On => Self::On,
            BookletArg::ShuffleOnly => Self::ShuffleOnly,
        }
    }
}

impl From<BorderArg> for BorderType {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::None => Self::None,
            BorderArg::Single => Self::OneThin,
            BorderArg::SingleThick => Self::OneThick,
            BorderArg::Double => Self::TwoThin,
            BorderArg::DoubleThick => Self::TwoThick,
        }
    }
}

impl From<ScalingArg> for ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::None => Self::None,
            ScalingArg::Fit => Self::Fit,
            ScalingArg::Fill => Self::Fill,
            ScalingArg::Crop => Self::Crop,
            ScalingArg::Auto => Self::Auto,
            ScalingArg::AutoFit => Self::AutoFit,
        }
    }
}

impl Cli {
    /// Override `params` with every flag that was given.
    fn apply(&self, params: &mut ProcessingParameters) -> Result<()> {
        if let Some(copies) = self.copies {
            params.num_copies = copies;
        }
        if self.collate {
            params.collate = true;
        }

        if self.paper.is_some() || self.margin.is_some() {
            let (width, height) = match self.paper {
                Some(paper) => paper.dimensions_pt(),
                None => (params.page.width, params.page.height),
            };
            params.page = match self.margin {
                Some(margin) => {
                    let margin = mm_to_pt(margin);
                    let mut page = PageRect::full(width, height);
                    page.left = margin;
                    page.bottom = margin;
                    page.right = width - margin;
                    page.top = height - margin;
                    page
                }
                None => {
                    // keep the current margins on the new sheet
                    let page = params.page;
                    PageRect {
                        top: height - (page.height - page.top),
                        left: page.left,
                        right: width - (page.width - page.right),
                        bottom: page.bottom,
                        width,
                        height,
                    }
                }
            };
        }

        if let Some(count) = self.number_up {
            if !params.nup.set_preset(count) {
                bail!("Unsupported number-up value: {}", count);
            }
        }
        if let Some(layout) = &self.number_up_layout {
            params.nup = match params.nup.parse_layout(layout) {
                Some(nup) => nup,
                None => bail!("Invalid number-up layout: {}", layout),
            };
        }

        if let Some(degrees) = self.orientation {
            params.orientation = match Rotation::from_degrees(degrees) {
                Some(rot) => rot,
                None => bail!("Orientation must be a multiple of 90 degrees"),
            };
            params.no_orientation = false;
        }

        if let Some(ranges) = &self.page_ranges {
            params.page_range = ranges.parse::<IntervalSet>()?;
        }
        match self.page_set {
            Some(PageSetArg::All) => {
                params.odd_pages = true;
                params.even_pages = true;
            }
            Some(PageSetArg::Odd) => {
                params.odd_pages = true;
                params.even_pages = false;
            }
            Some(PageSetArg::Even) => {
                params.odd_pages = false;
                params.even_pages = true;
            }
            None => {}
        }

        if self.reverse {
            params.reverse = true;
        }
        if self.mirror {
            params.mirror = true;
        }
        if let Some(booklet) = self.booklet {
            params.booklet = booklet.into();
        }
        if let Some(signature) = self.signature {
            params.book_signature = Some(signature);
        }
        if let Some(border) = self.page_border {
            params.border = border.into();
        }
        if let Some(label) = &self.page_label {
            params.page_label = Some(label.clone());
        }
        if let Some(scaling) = self.scaling {
            params.scaling = scaling.into();
        }
        if self.even_duplex {
            params.even_duplex = true;
        }
        if self.auto_rotate {
            params.auto_rotate = true;
        }
        if self.page_log {
            params.page_logging = true;
        }

        Ok(())
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut params = match &cli.config {
        Some(path) => ProcessingParameters::load(path).await?,
        None => ProcessingParameters::default(),
    };
    cli.apply(&mut params)?;
    params.validate()?;

    let mut doc = pdf_filter::load_pdf(&cli.input).await?;

    // Calculate and show statistics
    let stats = pdf_filter::calculate_statistics(doc.source_len(), &params)?;
    println!("Imposition Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);

    if cli.stats_only {
        return Ok(());
    }
    let Some(output) = cli.output else {
        bail!("No output file given");
    };

    // Perform imposition
    let (doc, report) = tokio::task::spawn_blocking(move || {
        let report = pdf_filter::impose(&mut doc, &params)?;
        Ok::<_, ImposeError>((doc, report))
    })
    .await??;
    pdf_filter::save_pdf(doc, &output).await?;

    log::info!(
        "{} source pages, {} output pages ({} copies)",
        report.source_pages,
        report.output_pages,
        report.copies
    );
    println!("Imposed → {}", output.display());

    Ok(())
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ProcessingParameters {
        let mut argv = vec!["pdffilter", "-i", "in.pdf", "-o", "out.pdf"];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);
        let mut params = ProcessingParameters::default();
        cli.apply(&mut params).unwrap();
        params
    }

    #[test]
    fn test_defaults_untouched() {
        assert_eq!(parse(&[]), ProcessingParameters::default());
    }

    #[test]
    fn test_number_up_and_layout() {
        let params = parse(&["--number-up", "4", "--number-up-layout", "tblr"]);
        assert_eq!((params.nup.nup_x, params.nup.nup_y), (2, 2));
        assert_eq!(params.nup.first, pdf_filter::Axis::Y);
    }

    #[test]
    fn test_orientation_and_page_set() {
        let params = parse(&["--orientation", "-90", "--page-set", "even"]);
        assert_eq!(params.orientation, Rotation::Rot270);
        assert!(!params.odd_pages);
        assert!(params.even_pages);
    }

    #[test]
    fn test_paper_with_margin() {
        let params = parse(&["--paper", "a4", "--margin", "10"]);
        assert!((params.page.width - 595.276).abs() < 0.01);
        assert!((params.page.left - 28.346).abs() < 0.01);
        assert!((params.page.width - params.page.right - params.page.left).abs() < 0.001);
    }

    #[test]
    fn test_booklet_flags() {
        let params = parse(&["--booklet", "on", "--signature", "8", "--copies", "2", "--collate"]);
        assert_eq!(params.booklet, BookletMode::On);
        assert_eq!(params.book_signature, Some(8));
        assert_eq!(params.num_copies, 2);
        assert!(params.collate);
    }

    #[test]
    fn test_invalid_number_up() {
        let cli = Cli::parse_from(["pdffilter", "-i", "a.pdf", "-o", "b.pdf", "--number-up", "5"]);
        let mut params = ProcessingParameters::default();
        assert!(cli.apply(&mut params).is_err());
    }

    #[test]
    fn test_stats_only_needs_no_output() {
        let cli = Cli::try_parse_from(["pdffilter", "-i", "a.pdf", "--stats-only"]).unwrap();
        assert!(cli.output.is_none());
        assert!(Cli::try_parse_from(["pdffilter", "-i", "a.pdf"]).is_err());
    }
}
