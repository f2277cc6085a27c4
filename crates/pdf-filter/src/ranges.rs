//! Page-range sets
//!
//! An [`IntervalSet`] is built by adding half-open ranges over 1-based page
//! numbers and is then finalized once with [`IntervalSet::finish`], which
//! sorts and coalesces the ranges. Queries are only valid after that.

use crate::types::{ImposeError, Result};
use std::str::FromStr;

/// Upper bound of an open-ended range
pub const OPEN_END: usize = usize::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSet {
    data: Vec<(usize, usize)>,
}

impl Default for IntervalSet {
    /// No range given means every page: `[1, ∞)`.
    fn default() -> Self {
        let mut set = Self::new();
        set.add(1, OPEN_END);
        set.finish();
        set
    }
}

impl IntervalSet {
    /// An empty set, ready for [`add`](Self::add).
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Add the half-open range `[start, end)`. Empty ranges are ignored.
    pub fn add(&mut self, start: usize, end: usize) {
        if start < end {
            self.data.push((start, end));
        }
    }

    /// Add `[start, ∞)`.
    pub fn add_from(&mut self, start: usize) {
        self.add(start, OPEN_END);
    }

    /// Sort the ranges and merge those that touch or overlap.
    pub fn finish(&mut self) {
        if self.data.is_empty() {
            return;
        }
        self.data.sort_unstable();

        let mut pos = 0;
        for it in 1..self.data.len() {
            let (start, end) = self.data[it];
            if self.data[pos].1 >= start {
                self.data[pos].1 = self.data[pos].1.max(end);
            } else {
                pos += 1;
                self.data[pos] = (start, end);
            }
        }
        self.data.truncate(pos + 1);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The normalized ranges, in order.
    pub fn intervals(&self) -> &[(usize, usize)] {
        &self.data
    }

    pub fn contains(&self, value: usize) -> bool {
        // first interval starting after `value`
        let idx = self.data.partition_point(|&(start, _)| start <= value);
        if idx == 0 {
            return false;
        }
        value < self.data[idx - 1].1
    }

    /// Smallest member strictly greater than `value`, if any.
    pub fn next(&self, value: usize) -> Option<usize> {
        let value = value.checked_add(1)?;
        let idx = self.data.partition_point(|&(start, _)| start <= value);
        if idx > 0 && value < self.data[idx - 1].1 {
            return Some(value);
        }
        self.data.get(idx).map(|&(start, _)| start)
    }

    pub fn dump(&self) {
        if self.data.is_empty() {
            log::debug!("(empty)");
            return;
        }
        let ranges: Vec<String> = self
            .data
            .iter()
            .map(|&(start, end)| {
                if end == OPEN_END {
                    format!("[{},inf)", start)
                } else {
                    format!("[{},{})", start, end)
                }
            })
            .collect();
        log::debug!("{}", ranges.join(" "));
    }
}

impl FromStr for IntervalSet {
    type Err = ImposeError;

    /// Parse page-range text such as `"1-3,7,10-"`.
    ///
    /// Bounds are inclusive; `a-` runs to the end of the document and `-b`
    /// starts at page 1. An empty string selects every page.
    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let mut set = Self::new();
        for part in text.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((lower, upper)) => {
                    let start = if lower.trim().is_empty() {
                        1
                    } else {
                        parse_page(lower, part)?
                    };
                    let end = if upper.trim().is_empty() {
                        OPEN_END
                    } else {
                        parse_end(upper, part)?
                    };
                    (start, end)
                }
                None => {
                    (parse_page(part, part)?, parse_end(part, part)?)
                }
            };
            if start >= end {
                return Err(ImposeError::Config(format!(
                    "Empty page range: {}",
                    part
                )));
            }
            set.add(start, end);
        }
        set.finish();
        Ok(set)
    }
}

fn parse_page(text: &str, part: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(ImposeError::Config(format!("Invalid page range: {}", part))),
    }
}

/// Exclusive end of a range whose last page is `text`.
fn parse_end(text: &str, part: &str) -> Result<usize> {
    parse_page(text, part)?
        .checked_add(1)
        .filter(|&end| end != OPEN_END)
        .ok_or_else(|| ImposeError::Config(format!("Page number too large: {}", part)))
}
