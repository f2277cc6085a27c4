//! Layout calculation modules
//!
//! This module handles the geometric side of page processing:
//! - Sheet rectangles and their rotation algebra
//! - N-up grid walking (which cell the next page lands in)
//! - Booklet page ordering

mod booklet;
mod nup;
mod rect;

pub use booklet::*;
pub use nup::*;
pub use rect::*;
