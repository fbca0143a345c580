//! USFM renderer - serializes a marker tree back to USFM text.
//!
//! Paragraph-level markers (headers, chapters, paragraphs, verses, headings)
//! start a new line. Notes, note content and character markers are written
//! inline. Text leaves carry their own whitespace, so the only separator the
//! writer adds is the single space that ends an opening marker.

use crate::model::{Document, Marker, MarkerKind};

/// Render a document as USFM text.
pub fn render_usfm(document: &Document) -> String {
    let mut writer = UsfmWriter::default();
    for marker in document.contents() {
        writer.write_marker(marker);
    }
    writer.finish()
}

#[derive(Default)]
struct UsfmWriter {
    out: String,
    /// Depth of open character markers (nested ones are written as `\+tag`).
    character_depth: usize,
    /// An opening marker was just written and content still needs its delimiter.
    pending_space: bool,
}

impl UsfmWriter {
    fn write_marker(&mut self, marker: &Marker) {
        match &marker.kind {
            MarkerKind::Id(value)
            | MarkerKind::Encoding(value)
            | MarkerKind::TocLong(value)
            | MarkerKind::TocShort(value)
            | MarkerKind::TocAbbreviation(value)
            | MarkerKind::Header(value)
            | MarkerKind::MainTitle(value)
            | MarkerKind::ChapterLabel(value) => {
                self.start_line(&marker.kind.tag());
                self.push_argument(value.trim());
                self.write_children(marker);
            }
            MarkerKind::Chapter(number) => {
                self.start_line("c");
                self.push_argument(&number.to_string());
                self.write_children(marker);
            }
            MarkerKind::Verse(number) => {
                self.start_line("v");
                self.push_argument(number);
                self.write_children(marker);
            }
            MarkerKind::Paragraph
            | MarkerKind::Section(_)
            | MarkerKind::Poetry(_)
            | MarkerKind::Block(_) => {
                self.start_line(&marker.kind.tag());
                self.write_children(marker);
            }
            MarkerKind::Note { tag, caller } => {
                self.open_inline(tag);
                self.push_argument(caller);
                self.write_children(marker);
                self.close_inline(tag);
            }
            MarkerKind::NoteContent(tag) => {
                self.open_inline(tag);
                self.write_children(marker);
            }
            MarkerKind::Character(tag) => {
                let tag = if self.character_depth > 0 {
                    format!("+{tag}")
                } else {
                    tag.clone()
                };
                self.open_inline(&tag);
                self.character_depth += 1;
                self.write_children(marker);
                self.character_depth -= 1;
                self.close_inline(&tag);
            }
            MarkerKind::Text(text) => self.push_text(text),
        }
    }

    fn write_children(&mut self, marker: &Marker) {
        for child in &marker.children {
            self.write_marker(child);
        }
    }

    fn start_line(&mut self, tag: &str) {
        self.trim_line_end();
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push('\\');
        self.out.push_str(tag);
        self.pending_space = true;
    }

    fn open_inline(&mut self, tag: &str) {
        self.push_delimiter();
        self.out.push('\\');
        self.out.push_str(tag);
        self.pending_space = true;
    }

    fn close_inline(&mut self, tag: &str) {
        self.pending_space = false;
        self.out.push('\\');
        self.out.push_str(tag);
        self.out.push('*');
    }

    /// Write a marker argument (chapter number, verse number, note caller).
    fn push_argument(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.push_delimiter();
        self.out.push_str(value);
        self.pending_space = true;
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !text.starts_with(' ') {
            self.push_delimiter();
        }
        self.pending_space = false;
        self.out.push_str(text);
    }

    fn push_delimiter(&mut self) {
        if self.pending_space {
            self.out.push(' ');
            self.pending_space = false;
        }
    }

    fn trim_line_end(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    fn finish(mut self) -> String {
        self.trim_line_end();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usfm::{MarkupParser, UsfmParser};

    fn verse(number: &str, text: &str) -> Marker {
        Marker::with_children(MarkerKind::Verse(number.into()), vec![Marker::text(text)])
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_usfm(&Document::new()), "");
    }

    #[test]
    fn test_render_headers_and_chapter() {
        let doc = Document::from_markers(vec![
            Marker::new(MarkerKind::Id("GEN".into())),
            Marker::new(MarkerKind::Encoding("UTF-8".into())),
            Marker::new(MarkerKind::Paragraph),
            Marker::with_children(
                MarkerKind::Chapter(1),
                vec![
                    Marker::new(MarkerKind::ChapterLabel("Chapter One".into())),
                    verse("1", "In the beginning"),
                    verse("2", "And the earth"),
                ],
            ),
        ]);

        assert_eq!(
            render_usfm(&doc),
            "\\id GEN\n\\ide UTF-8\n\\p\n\\c 1\n\\cl Chapter One\n\\v 1 In the beginning\n\\v 2 And the earth\n"
        );
    }

    #[test]
    fn test_render_inline_markers() {
        let markers = UsfmParser::new()
            .parse("\\v 1 The \\w word \\+nd Lord\\+nd*\\w* spoke\\f + \\ft note\\f* again")
            .unwrap();
        let rendered = render_usfm(&Document::from_markers(markers));
        assert_eq!(
            rendered,
            "\\v 1 The \\w word \\+nd Lord\\+nd*\\w* spoke\\f + \\ft note\\f* again\n"
        );
    }

    #[test]
    fn test_render_is_reparseable() {
        let source = "\\c 1\n\\p\n\\v 1 One\n\\v 2 Two\n\\s Heading\n\\q2\n\\v 3 Three\n";
        let parser = UsfmParser::new();
        let first = Document::from_markers(parser.parse(source).unwrap());
        let rendered = render_usfm(&first);
        assert_eq!(rendered, source);

        let second = Document::from_markers(parser.parse(&rendered).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_punctuation_after_closing_markers_round_trips() {
        let source = "\\v 4 Dan and \\add Naphtali\\add*. The \\nd Lord\\nd*'s word\\f + \\ft n\\f*.\n";
        let markers = UsfmParser::new().parse(source).unwrap();
        assert_eq!(render_usfm(&Document::from_markers(markers)), source);
    }

    #[test]
    fn test_space_inside_character_marker_kept() {
        let source = "\\v 1 \\add a \\add* and \\f + \\fr 1:1 \\ft note \\f* b\n";
        let markers = UsfmParser::new().parse(source).unwrap();
        assert_eq!(render_usfm(&Document::from_markers(markers)), source);
    }

    #[test]
    fn test_empty_block_then_text() {
        let doc = Document::from_markers(vec![
            Marker::new(MarkerKind::Paragraph),
            Marker::with_children(MarkerKind::Section(1), vec![Marker::text("Heading")]),
        ]);
        assert_eq!(render_usfm(&doc), "\\p\n\\s Heading\n");
    }
}
