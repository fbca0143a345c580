//! USFM marker nodes and their kinds.

/// Kind of a marker node (independent of how it was written in the source).
///
/// Book-level header markers carry their text inline. Containers such as
/// chapters, paragraphs and verses hold their content as children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `\id` book identifier.
    Id(String),
    /// `\ide` character encoding.
    Encoding(String),
    /// `\toc1` long table-of-contents text.
    TocLong(String),
    /// `\toc2` short table-of-contents text.
    TocShort(String),
    /// `\toc3` book abbreviation.
    TocAbbreviation(String),
    /// `\h` running header.
    Header(String),
    /// `\mt` main title.
    MainTitle(String),
    /// `\c` chapter container.
    Chapter(u32),
    /// `\cl` translated chapter label.
    ChapterLabel(String),
    /// `\p` paragraph. Childless when used as a break.
    Paragraph,
    /// `\v` verse. The number is kept as written (`"1"`, `"3-4"`).
    Verse(String),
    /// `\s`, `\s1`.. section heading.
    Section(u8),
    /// `\q`, `\q1`.. poetic line.
    Poetry(u8),
    /// Any other paragraph-level marker (`\m`, `\b`, `\d`, `\pi`..).
    Block(String),
    /// Footnote or cross reference (`\f`, `\fe`, `\x`).
    Note { tag: String, caller: String },
    /// Content marker inside a note (`\ft`, `\fr`, `\fqa`, `\xo`..).
    NoteContent(String),
    /// Inline character marker closed by `\tag*` (`\w`, `\add`, `\nd`..).
    Character(String),
    /// Leaf text content.
    Text(String),
}

impl MarkerKind {
    /// The USFM tag this kind is written with, without the leading backslash.
    pub fn tag(&self) -> String {
        match self {
            MarkerKind::Id(_) => "id".into(),
            MarkerKind::Encoding(_) => "ide".into(),
            MarkerKind::TocLong(_) => "toc1".into(),
            MarkerKind::TocShort(_) => "toc2".into(),
            MarkerKind::TocAbbreviation(_) => "toc3".into(),
            MarkerKind::Header(_) => "h".into(),
            MarkerKind::MainTitle(_) => "mt".into(),
            MarkerKind::Chapter(_) => "c".into(),
            MarkerKind::ChapterLabel(_) => "cl".into(),
            MarkerKind::Paragraph => "p".into(),
            MarkerKind::Verse(_) => "v".into(),
            MarkerKind::Section(1) => "s".into(),
            MarkerKind::Section(level) => format!("s{level}"),
            MarkerKind::Poetry(1) => "q".into(),
            MarkerKind::Poetry(level) => format!("q{level}"),
            MarkerKind::Block(tag)
            | MarkerKind::Note { tag, .. }
            | MarkerKind::NoteContent(tag)
            | MarkerKind::Character(tag) => tag.clone(),
            MarkerKind::Text(_) => String::new(),
        }
    }

    pub fn is_chapter(&self) -> bool {
        matches!(self, MarkerKind::Chapter(_))
    }

    pub fn is_chapter_label(&self) -> bool {
        matches!(self, MarkerKind::ChapterLabel(_))
    }

    pub fn is_verse(&self) -> bool {
        matches!(self, MarkerKind::Verse(_))
    }
}

/// A node in the marker tree. Every node owns its children exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub children: Vec<Marker>,
}

impl Marker {
    /// Create a marker with no children.
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: MarkerKind, children: Vec<Marker>) -> Self {
        Self { kind, children }
    }

    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MarkerKind::Text(text.into()))
    }

    /// Chapter number, if this is a chapter container.
    pub fn chapter_number(&self) -> Option<u32> {
        match self.kind {
            MarkerKind::Chapter(number) => Some(number),
            _ => None,
        }
    }

    /// Direct children matching `pred`.
    pub fn children_where<F>(&self, pred: F) -> Vec<&Marker>
    where
        F: Fn(&MarkerKind) -> bool,
    {
        self.children.iter().filter(|m| pred(&m.kind)).collect()
    }

    /// All descendants (not including `self`) matching `pred`, in document order.
    pub fn find_all<F>(&self, pred: F) -> Vec<&Marker>
    where
        F: Fn(&MarkerKind) -> bool,
    {
        self.children
            .iter()
            .flat_map(|child| child.iter_dfs())
            .filter(|m| pred(&m.kind))
            .collect()
    }

    /// Iterate over this node and all descendants in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter { stack: vec![self] }
    }

    /// Text of all `Text` leaves below this node, whitespace-normalized.
    pub fn plain_text(&self) -> String {
        let text: String = self
            .iter_dfs()
            .filter_map(|m| match &m.kind {
                MarkerKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Depth-first iterator over a marker and its descendants.
pub struct DfsIter<'a> {
    stack: Vec<&'a Marker>,
}

impl<'a> DfsIter<'a> {
    pub(crate) fn from_roots(roots: &'a [Marker]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a Marker;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(current.children.iter().rev());

        Some(current)
    }
}
