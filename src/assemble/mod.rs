//! Book assembly: turn a resource container into one USFM document.
//!
//! The book is built in two steps:
//! 1. Book-level header markers from the manifest and the `front-title` fragment
//! 2. One sub-document per numeric chapter token, in numeric order
//!
//! # Example
//!
//! ```
//! use rc2usfm::{AssembleOptions, Manifest, MemoryContainer, assemble_book};
//!
//! let container = MemoryContainer::new(Manifest::new("EXO", "Exodus"))
//!     .with_fragment("2-1", "\\v 1 Second chapter")
//!     .with_fragment("1-1", "\\v 1 First chapter");
//!
//! let book = assemble_book(&container, &AssembleOptions::new()).unwrap();
//! let chapters: Vec<_> = book.chapters().iter().map(|c| c.chapter_number()).collect();
//! assert_eq!(chapters, vec![Some(1), Some(2)]);
//! ```

mod chapter;
pub mod fragment;

use log::debug;

use crate::container::ResourceContainer;
use crate::error::Result;
use crate::model::{Document, Marker, MarkerKind};
use crate::usfm::{MarkupParser, ParserOptions, UsfmParser};

use fragment::{FRONT_TITLE, chapter_tokens};

/// Value of the `\ide` marker written into every book.
pub const ENCODING: &str = "UTF-8";

/// Configuration for [`assemble_book`].
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Only assemble fragments the manifest lists as finished.
    pub only_finished: bool,
    /// Options for the built-in USFM parser.
    pub parser: ParserOptions,
}

impl AssembleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_only_finished(mut self, only_finished: bool) -> Self {
        self.only_finished = only_finished;
        self
    }

    pub fn with_parser_options(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

/// Assemble a book using the built-in [`UsfmParser`].
pub fn assemble_book(container: &dyn ResourceContainer, options: &AssembleOptions) -> Result<Document> {
    let parser = UsfmParser::with_options(options.parser.clone());
    assemble_book_with_parser(container, options.only_finished, &parser)
}

/// Assemble a book with a caller-supplied parser.
///
/// Fails with [`Error::Manifest`](crate::Error::Manifest) when the manifest
/// cannot be read and [`Error::FragmentParse`](crate::Error::FragmentParse)
/// when any chunk fails to parse. There is no partial result.
pub fn assemble_book_with_parser(
    container: &dyn ResourceContainer,
    only_finished: bool,
    parser: &dyn MarkupParser,
) -> Result<Document> {
    let manifest = container.manifest()?;
    let names = container.fragment_names(only_finished)?;

    let title = match container.read_fragment(FRONT_TITLE)? {
        Some(title) => title,
        None => manifest.project.name.clone(),
    };

    let mut document = Document::new();
    for marker in header_markers(&manifest.project.id, &title) {
        document.insert(marker);
    }

    let chapters = chapter_tokens(&names);
    debug!(
        "Assembling {} chapters from {} fragments",
        chapters.len(),
        names.len()
    );

    for token in chapters {
        document.append(chapter::assemble_chapter(container, &names, token, parser)?);
    }

    Ok(document)
}

/// Book-level markers, in the order they appear at the top of the book.
fn header_markers(project_id: &str, title: &str) -> [Marker; 7] {
    [
        Marker::new(MarkerKind::Id(project_id.to_string())),
        Marker::new(MarkerKind::Encoding(ENCODING.to_string())),
        Marker::new(MarkerKind::TocLong(title.to_string())),
        Marker::new(MarkerKind::TocShort(title.to_string())),
        Marker::new(MarkerKind::TocAbbreviation(project_id.to_string())),
        Marker::new(MarkerKind::Header(title.to_string())),
        Marker::new(MarkerKind::MainTitle(title.to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_markers_order() {
        let tags: Vec<String> = header_markers("GEN", "Genesis")
            .iter()
            .map(|m| m.kind.tag())
            .collect();
        assert_eq!(tags, vec!["id", "ide", "toc1", "toc2", "toc3", "h", "mt"]);
    }

    #[test]
    fn test_options_builder() {
        let options = AssembleOptions::new()
            .with_only_finished(true)
            .with_parser_options(ParserOptions::empty());
        assert!(options.only_finished);
        assert!(options.parser.ignored_markers.is_empty());
        assert!(!AssembleOptions::default().only_finished);
    }
}
