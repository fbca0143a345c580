//! In-memory container.

use super::ResourceContainer;
use crate::error::Result;
use crate::manifest::Manifest;

/// A container whose manifest and fragments live in memory.
///
/// Fragments are listed in insertion order.
///
/// ```
/// use rc2usfm::{Manifest, MemoryContainer, ResourceContainer};
///
/// let container = MemoryContainer::new(Manifest::new("EXO", "Exodus"))
///     .with_fragment("01-01", "\\c 1 \\v 1 First verse");
/// assert_eq!(container.fragment_names(false).unwrap(), vec!["01-01"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    manifest: Manifest,
    fragments: Vec<(String, String)>,
}

impl MemoryContainer {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            fragments: Vec::new(),
        }
    }

    /// Add a fragment, replacing any existing fragment with the same name.
    pub fn with_fragment(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();
        match self.fragments.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = text,
            None => self.fragments.push((name, text)),
        }
    }
}

impl ResourceContainer for MemoryContainer {
    fn manifest(&self) -> Result<Manifest> {
        Ok(self.manifest.clone())
    }

    fn discover_fragments(&self) -> Result<Vec<String>> {
        Ok(self.fragments.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_fragment(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .fragments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone()))
    }
}
