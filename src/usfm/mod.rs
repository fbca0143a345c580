//! USFM parsing and rendering.
//!
//! The assembler only depends on the [`MarkupParser`] trait. [`UsfmParser`] is
//! the built-in implementation; callers may supply their own.
//!
//! # Example
//!
//! ```
//! use rc2usfm::usfm::{MarkupParser, UsfmParser};
//! use rc2usfm::MarkerKind;
//!
//! let markers = UsfmParser::new().parse("\\c 1 \\v 1 In the beginning").unwrap();
//! assert_eq!(markers[0].kind, MarkerKind::Chapter(1));
//! ```

mod parser;
mod render;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::Marker;

pub use parser::UsfmParser;
pub use render::render_usfm;

/// Markers dropped by the default parser configuration.
///
/// `\s5` is the chunk-break marker translation studio writes into every chunk.
pub const DEFAULT_IGNORED_MARKERS: &[&str] = &["s5", "fqa*"];

/// Errors produced while parsing a single piece of USFM text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid chapter number '{value}' at byte {offset}")]
    InvalidChapterNumber { value: String, offset: usize },

    #[error("verse marker without a number at byte {offset}")]
    MissingVerseNumber { offset: usize },
}

/// A parser turning raw markup into an ordered sequence of top-level markers.
pub trait MarkupParser {
    fn parse(&self, text: &str) -> Result<Vec<Marker>, ParseError>;
}

/// Configuration for [`UsfmParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Marker names to drop while parsing. Closing markers are written with
    /// their trailing `*` (`"fqa*"`).
    pub ignored_markers: BTreeSet<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ignored_markers: DEFAULT_IGNORED_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParserOptions {
    /// Options with the default ignored markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that ignore nothing.
    pub fn empty() -> Self {
        Self {
            ignored_markers: BTreeSet::new(),
        }
    }

    pub fn with_ignored(mut self, marker: impl Into<String>) -> Self {
        self.ignored_markers.insert(marker.into());
        self
    }

    pub fn is_ignored(&self, marker: &str) -> bool {
        self.ignored_markers.contains(marker)
    }
}
