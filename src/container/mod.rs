//! Resource containers: where fragment text and the manifest come from.
//!
//! A container stores a book as many small fragments named
//! `<chapter>-<chunk>` (plus reserved names such as `front-title` and
//! `<chapter>-title`). On disk a fragment lives at `<chapter>/<chunk>.txt`.
//!
//! Three providers implement [`ResourceContainer`]:
//! - [`DirectoryContainer`]: a project directory
//! - [`ArchiveContainer`]: a `.tstudio` / `.zip` export
//! - [`MemoryContainer`]: fragments held in memory

mod archive;
mod directory;
mod memory;

pub use archive::ArchiveContainer;
pub use directory::DirectoryContainer;
pub use memory::MemoryContainer;

use std::path::Path;

use crate::error::Result;
use crate::manifest::Manifest;

/// File name of a project manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Extension of fragment files.
pub const FRAGMENT_EXTENSION: &str = "txt";

/// Source of named text fragments plus the project manifest.
///
/// All reads take `&self` and have no side effects.
pub trait ResourceContainer: Send + Sync {
    /// Load the project manifest. Fails with [`Error::Manifest`](crate::Error::Manifest)
    /// when it is missing or malformed.
    fn manifest(&self) -> Result<Manifest>;

    /// Every fragment name present in the container, in no particular order.
    fn discover_fragments(&self) -> Result<Vec<String>>;

    /// Read one fragment. Returns `Ok(None)` when no fragment exists under `name`;
    /// errors are reserved for real I/O failures.
    fn read_fragment(&self, name: &str) -> Result<Option<String>>;

    /// Fragment names to assemble. With `only_finished`, exactly the manifest's
    /// finished list; otherwise everything discoverable.
    fn fragment_names(&self, only_finished: bool) -> Result<Vec<String>> {
        if only_finished {
            return Ok(self.manifest()?.finished_chunks);
        }
        self.discover_fragments()
    }
}

/// Open a container, choosing the provider from what `path` is: a directory
/// opens as a [`DirectoryContainer`], anything else as an [`ArchiveContainer`].
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn ResourceContainer>> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(DirectoryContainer::open(path)?))
    } else {
        Ok(Box::new(ArchiveContainer::open(path)?))
    }
}

/// Storage path of a fragment: `"1-2"` is stored at `"1/2.txt"`.
pub fn fragment_path(name: &str) -> String {
    format!("{}.{}", name.replace('-', "/"), FRAGMENT_EXTENSION)
}

/// Fragment name of a stored file: `<parent directory>-<file stem>`.
///
/// Returns `None` for files that are not `.txt` or have no parent directory.
pub fn fragment_name_from_path(path: &str) -> Option<String> {
    let mut components = path.rsplit('/').filter(|c| !c.is_empty());
    let file = components.next()?;
    let parent = components.next()?;
    let stem = file.strip_suffix(FRAGMENT_EXTENSION)?.strip_suffix('.')?;
    Some(format!("{parent}-{stem}"))
}
