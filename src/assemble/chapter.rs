//! Chapter assembly: select, order, parse and merge one chapter's fragments.

use log::{debug, warn};

use super::fragment::{chapter_title_fragment, chunk_number, parse_number};
use crate::container::ResourceContainer;
use crate::error::{Error, Result};
use crate::model::{Document, Marker, MarkerKind};
use crate::usfm::MarkupParser;

/// How the parsed fragments of a chapter relate to its chapter marker.
#[derive(Debug)]
enum ChapterShape {
    /// The first fragment opened the chapter itself (`\c N` in the text).
    Existing(Vec<Marker>),
    /// No chapter marker in front; one is created around the fragments.
    Synthesized(Marker),
    /// The chapter token is not a number, so no chapter marker can be made.
    Flat(Vec<Marker>),
}

/// Build the sub-document for chapter `chapter` from `names`.
///
/// The result always starts with a paragraph break. Missing fragments are
/// skipped; a fragment that fails to parse aborts with [`Error::FragmentParse`].
pub(crate) fn assemble_chapter(
    container: &dyn ResourceContainer,
    names: &[String],
    chapter: &str,
    parser: &dyn MarkupParser,
) -> Result<Document> {
    let title_name = chapter_title_fragment(chapter);
    let title = if names.iter().any(|name| *name == title_name) {
        container.read_fragment(&title_name)?
    } else {
        None
    };

    let mut chunks: Vec<(u32, &str)> = names
        .iter()
        .filter_map(|name| chunk_number(name, chapter).map(|chunk| (chunk, name.as_str())))
        .collect();
    chunks.sort_by_key(|(chunk, _)| *chunk);
    debug!("Chapter {chapter}: {} chunks", chunks.len());

    let mut buffer = Vec::new();
    for (_, name) in chunks {
        let Some(text) = container.read_fragment(name)? else {
            debug!("Fragment {name} is listed but missing, skipping");
            continue;
        };
        let markers = parser.parse(&text).map_err(|source| Error::FragmentParse {
            fragment: name.to_string(),
            source,
        })?;
        buffer.extend(markers);
    }

    let shape = classify(buffer, chapter);
    Ok(into_document(shape, title))
}

/// Decide the chapter shape from the first parsed node.
fn classify(buffer: Vec<Marker>, chapter: &str) -> ChapterShape {
    let mut markers = buffer.into_iter();
    match markers.next() {
        Some(first) if first.kind.is_chapter() => {
            ChapterShape::Existing(absorb_trailing(first, markers))
        }
        first => {
            let buffer: Vec<Marker> = first.into_iter().chain(markers).collect();
            match parse_number(chapter) {
                Some(number) => {
                    ChapterShape::Synthesized(Marker::with_children(MarkerKind::Chapter(number), buffer))
                }
                None => ChapterShape::Flat(buffer),
            }
        }
    }
}

/// Move nodes that follow a chapter into it, the way `\c` scopes everything
/// up to the next `\c`. Later chapter containers stay separate top-level nodes.
fn absorb_trailing(first: Marker, trailing: impl Iterator<Item = Marker>) -> Vec<Marker> {
    let mut chapters = vec![first];
    for marker in trailing {
        if marker.kind.is_chapter() {
            warn!(
                "Chapter {:?} found inside the fragments of chapter {:?}; keeping both",
                marker.chapter_number(),
                chapters[0].chapter_number()
            );
            chapters.push(marker);
        } else if let Some(current) = chapters.last_mut() {
            current.children.push(marker);
        }
    }
    chapters
}

fn into_document(shape: ChapterShape, title: Option<String>) -> Document {
    let mut document = Document::new();
    document.insert(Marker::new(MarkerKind::Paragraph));

    match shape {
        ChapterShape::Existing(mut chapters) => {
            if let Some(first) = chapters.first_mut() {
                insert_label(first, title);
            }
            for chapter in chapters {
                document.insert(chapter);
            }
        }
        ChapterShape::Synthesized(mut chapter) => {
            insert_label(&mut chapter, title);
            document.insert(chapter);
        }
        ChapterShape::Flat(markers) => {
            for marker in markers {
                document.insert(marker);
            }
        }
    }

    document
}

fn insert_label(chapter: &mut Marker, title: Option<String>) {
    if let Some(title) = title {
        chapter
            .children
            .insert(0, Marker::new(MarkerKind::ChapterLabel(title)));
    }
}
