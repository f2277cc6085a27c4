pub mod backend;
pub mod constants;
pub mod impose;
pub mod layout;
pub mod marks;
mod options;
pub mod ranges;
pub mod render;
mod stats;
mod types;

pub use backend::{ProcessingDocument, ProcessingPage};
pub use impose::{
    CancelToken, ImposeReport, Imposer, impose, impose_file, load_pdf, resolve_scaling, save_pdf,
};
pub use layout::{NupPageEdit, NupParameters, NupState, PageRect, RectOverride, booklet_shuffle};
pub use options::*;
pub use ranges::IntervalSet;
pub use render::{LopdfDocument, LopdfPage};
pub use stats::calculate_statistics;
pub use types::*;
