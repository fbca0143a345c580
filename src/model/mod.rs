//! Core data model for assembled USFM books.
//!
//! A [`Document`] is an ordered sequence of top-level [`Marker`]s. Chapter
//! containers own their verses, paragraphs and labels; no node is shared
//! between two containers.

mod node;

pub use node::{DfsIter, Marker, MarkerKind};

/// An assembled book (or a chapter sub-document produced during assembly).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    markers: Vec<Marker>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markers(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    /// Append a top-level marker.
    pub fn insert(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Append every top-level marker of `other`, preserving order.
    pub fn append(&mut self, other: Document) {
        self.markers.extend(other.markers);
    }

    /// Top-level markers.
    pub fn contents(&self) -> &[Marker] {
        &self.markers
    }

    pub fn into_markers(self) -> Vec<Marker> {
        self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterate over all nodes in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter::from_roots(&self.markers)
    }

    /// All nodes at any depth matching `pred`, in document order.
    pub fn find_all<F>(&self, pred: F) -> Vec<&Marker>
    where
        F: Fn(&MarkerKind) -> bool,
    {
        self.iter_dfs().filter(|m| pred(&m.kind)).collect()
    }

    /// All chapter containers at any depth.
    pub fn chapters(&self) -> Vec<&Marker> {
        self.find_all(MarkerKind::is_chapter)
    }

    /// Find a chapter container by number.
    pub fn chapter(&self, number: u32) -> Option<&Marker> {
        self.iter_dfs()
            .find(|m| m.chapter_number() == Some(number))
    }
}
