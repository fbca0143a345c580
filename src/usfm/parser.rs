//! USFM text to marker tree.
//!
//! The parser is a single forward scan: `memchr` finds the next backslash,
//! everything before it is text, and the marker that follows either opens a
//! node or closes one. Open nodes live on a stack ordered by nesting level
//! (chapter > paragraph > verse > note > note content > character); opening a
//! node closes every open node at the same or a deeper level.
//!
//! The single whitespace character after a marker (or after its argument) is
//! part of the marker. Text keeps its edge whitespace so inline markers can be
//! written back exactly where they were; runs of whitespace collapse to one
//! space, and whitespace at the start or end of a paragraph-level node is
//! dropped.

use memchr::memchr;

use super::{MarkupParser, ParseError, ParserOptions};
use crate::model::{Marker, MarkerKind};

/// Character-style markers closed by an explicit `\tag*`.
const CHARACTER_MARKERS: &[&str] = &[
    "add", "bd", "bdit", "bk", "dc", "em", "fig", "it", "k", "nd", "no", "ord", "pn", "png", "qac",
    "qs", "qt", "rq", "sc", "sig", "sls", "sup", "tl", "w", "wa", "wg", "wh", "wj",
];

/// Nesting level of an open node. Higher levels nest inside lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Chapter,
    Block,
    Verse,
    Note,
    NoteContent,
    Character,
}

/// Default USFM parser.
#[derive(Debug, Clone, Default)]
pub struct UsfmParser {
    options: ParserOptions,
}

impl UsfmParser {
    /// Create a parser with the default ignored markers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
}

impl MarkupParser for UsfmParser {
    fn parse(&self, text: &str) -> Result<Vec<Marker>, ParseError> {
        let bytes = text.as_bytes();
        let mut tree = TreeBuilder::default();
        let mut pos = 0;

        while pos < bytes.len() {
            let Some(rel) = memchr(b'\\', &bytes[pos..]) else {
                tree.push_text(&text[pos..]);
                break;
            };
            let start = pos + rel;
            tree.push_text(&text[pos..start]);

            let Some(token) = read_marker(text, start) else {
                // A backslash with no marker name after it is literal text
                tree.push_text("\\");
                pos = start + 1;
                continue;
            };
            pos = token.end;

            if token.closing {
                if !self.options.is_ignored(&format!("{}*", token.name)) {
                    tree.close(token.name.trim_start_matches('+'));
                }
            } else if self.options.is_ignored(token.name) {
                pos = skip_delimiter(text, pos);
            } else {
                pos = open_marker(&mut tree, text, token.name, start, pos)?;
            }
        }

        Ok(tree.finish())
    }
}

struct MarkerToken<'a> {
    name: &'a str,
    closing: bool,
    /// Byte offset just past the marker.
    end: usize,
}

/// Read the marker starting at the backslash at `start`. `None` when no
/// marker name follows the backslash.
fn read_marker(text: &str, start: usize) -> Option<MarkerToken<'_>> {
    let name_start = start + 1;
    let rest = &text[name_start..];
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '\\' || c == '*')
        .unwrap_or(rest.len());

    if name_len == 0 {
        return None;
    }

    let name = &rest[..name_len];
    let mut end = name_start + name_len;
    let closing = rest[name_len..].starts_with('*');
    if closing {
        end += 1;
    }

    Some(MarkerToken { name, closing, end })
}

/// Open the node for `name` and return the position after any argument and
/// delimiter it consumed.
fn open_marker(
    tree: &mut TreeBuilder,
    text: &str,
    name: &str,
    start: usize,
    pos: usize,
) -> Result<usize, ParseError> {
    let nested = name.starts_with('+');
    let tag = name.trim_start_matches('+');

    let next = match tag {
        "id" => open_header(tree, text, pos, MarkerKind::Id),
        "ide" => open_header(tree, text, pos, MarkerKind::Encoding),
        "toc1" => open_header(tree, text, pos, MarkerKind::TocLong),
        "toc2" => open_header(tree, text, pos, MarkerKind::TocShort),
        "toc3" => open_header(tree, text, pos, MarkerKind::TocAbbreviation),
        "h" => open_header(tree, text, pos, MarkerKind::Header),
        "cl" => {
            let (value, next) = read_until_marker(text, pos);
            tree.open_leaf(Marker::new(MarkerKind::ChapterLabel(value)), Level::Block);
            next
        }
        "c" => {
            let (value, next) = read_word(text, pos);
            let number = value
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidChapterNumber {
                    value: value.to_string(),
                    offset: start,
                })?;
            tree.open(Marker::new(MarkerKind::Chapter(number)), Level::Chapter, false);
            skip_delimiter(text, next)
        }
        "v" => {
            let (value, next) = read_word(text, pos);
            if value.is_empty() {
                return Err(ParseError::MissingVerseNumber { offset: start });
            }
            tree.open(Marker::new(MarkerKind::Verse(value.to_string())), Level::Verse, false);
            skip_delimiter(text, next)
        }
        "p" => {
            tree.open(Marker::new(MarkerKind::Paragraph), Level::Block, false);
            skip_delimiter(text, pos)
        }
        "f" | "fe" | "ef" | "x" | "ex" => {
            let (caller, next) = read_word(text, pos);
            let kind = MarkerKind::Note {
                tag: tag.to_string(),
                caller: caller.to_string(),
            };
            tree.open(Marker::new(kind), Level::Note, false);
            skip_delimiter(text, next)
        }
        _ if CHARACTER_MARKERS.contains(&tag) => {
            let kind = MarkerKind::Character(tag.to_string());
            tree.open(Marker::new(kind), Level::Character, nested);
            skip_delimiter(text, pos)
        }
        _ if tag.len() > 1 && (tag.starts_with('f') || tag.starts_with('x')) => {
            let kind = MarkerKind::NoteContent(tag.to_string());
            tree.open(Marker::new(kind), Level::NoteContent, false);
            skip_delimiter(text, pos)
        }
        _ => match split_level(tag) {
            ("mt", _) => open_header(tree, text, pos, MarkerKind::MainTitle),
            ("s", level) => {
                tree.open(Marker::new(MarkerKind::Section(level)), Level::Block, false);
                skip_delimiter(text, pos)
            }
            ("q", level) => {
                tree.open(Marker::new(MarkerKind::Poetry(level)), Level::Block, false);
                skip_delimiter(text, pos)
            }
            _ => {
                tree.open(Marker::new(MarkerKind::Block(tag.to_string())), Level::Block, false);
                skip_delimiter(text, pos)
            }
        },
    };

    Ok(next)
}

/// Book-level markers take the rest of the text up to the next marker as their value.
fn open_header(tree: &mut TreeBuilder, text: &str, pos: usize, kind: fn(String) -> MarkerKind) -> usize {
    let (value, next) = read_until_marker(text, pos);
    tree.open_leaf(Marker::new(kind(value)), Level::Chapter);
    next
}

/// Split a trailing numeric level off a tag: `"s2"` becomes `("s", 2)`, `"q"` becomes `("q", 1)`.
fn split_level(tag: &str) -> (&str, u8) {
    let base = tag.trim_end_matches(|c: char| c.is_ascii_digit());
    let level = tag[base.len()..].parse::<u8>().unwrap_or(1);
    (base, level)
}

/// Read one whitespace-delimited word after `pos`, stopping at the next marker.
fn read_word(text: &str, pos: usize) -> (&str, usize) {
    let rest = &text[pos..];
    let skipped = rest.len() - rest.trim_start().len();
    let word_start = pos + skipped;
    let word = &text[word_start..];
    let len = word
        .find(|c: char| c.is_whitespace() || c == '\\')
        .unwrap_or(word.len());
    (&text[word_start..word_start + len], word_start + len)
}

/// Read the text up to the next marker, whitespace-normalized.
fn read_until_marker(text: &str, pos: usize) -> (String, usize) {
    let end = memchr(b'\\', &text.as_bytes()[pos..])
        .map(|rel| pos + rel)
        .unwrap_or(text.len());
    (normalize_whitespace(&text[pos..end]), end)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Skip the one whitespace character (or `\r\n`) that ends a marker.
fn skip_delimiter(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    if rest.starts_with("\r\n") {
        return pos + 2;
    }
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => pos + c.len_utf8(),
        _ => pos,
    }
}

/// Collapse whitespace runs to a single space, keeping a space at either edge.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Add text to a sibling list, merging it into a preceding text leaf. Text
/// that starts a node loses its leading whitespace.
fn append_text(siblings: &mut Vec<Marker>, text: &str) {
    if let Some(Marker {
        kind: MarkerKind::Text(last),
        ..
    }) = siblings.last_mut()
    {
        *last = collapse_whitespace(&format!("{last}{text}"));
        return;
    }

    let text = if siblings.is_empty() { text.trim_start() } else { text };
    if !text.is_empty() {
        siblings.push(Marker::text(text));
    }
}

/// Drop whitespace at the end of a node's content.
fn trim_trailing_text(children: &mut Vec<Marker>) {
    if let Some(Marker {
        kind: MarkerKind::Text(last),
        ..
    }) = children.last_mut()
    {
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        if last.is_empty() {
            children.pop();
        }
    }
}

/// Stack of open nodes plus the finished top-level sequence.
#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Marker>,
    stack: Vec<(Marker, Level)>,
}

impl TreeBuilder {
    fn open(&mut self, marker: Marker, level: Level, nested: bool) {
        self.close_from(level, nested);
        self.stack.push((marker, level));
    }

    fn open_leaf(&mut self, marker: Marker, level: Level) {
        self.close_from(level, false);
        self.attach(marker);
    }

    /// Close open nodes at `level` or deeper. A nested character marker
    /// (`\+nd`) stays inside the enclosing character marker.
    fn close_from(&mut self, level: Level, nested: bool) {
        while let Some((_, top)) = self.stack.last() {
            if *top < level || (nested && *top == Level::Character) {
                break;
            }
            self.pop();
        }
    }

    /// Close the innermost open node written as `tag`, and everything inside it.
    /// An end marker with no matching open node is dropped.
    fn close(&mut self, tag: &str) {
        let Some(index) = self.stack.iter().rposition(|(m, _)| m.kind.tag() == tag) else {
            return;
        };
        while self.stack.len() > index {
            self.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        let text = collapse_whitespace(text);
        append_text(self.siblings(), &text);
    }

    fn attach(&mut self, marker: Marker) {
        self.siblings().push(marker);
    }

    /// Children of the innermost open node, or the top-level sequence.
    fn siblings(&mut self) -> &mut Vec<Marker> {
        match self.stack.last_mut() {
            Some((parent, _)) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn pop(&mut self) {
        if let Some((mut marker, level)) = self.stack.pop() {
            if level <= Level::Verse {
                trim_trailing_text(&mut marker.children);
            }
            self.attach(marker);
        }
    }

    fn finish(mut self) -> Vec<Marker> {
        while !self.stack.is_empty() {
            self.pop();
        }
        trim_trailing_text(&mut self.roots);
        self.roots
    }
}
