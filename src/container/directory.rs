//! Project directory container.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use super::{FRAGMENT_EXTENSION, MANIFEST_FILE, ResourceContainer, fragment_path};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::util::decode_text;

/// A translation project stored as a plain directory tree:
///
/// ```text
/// project/
///   manifest.json
///   front/title.txt
///   01/title.txt
///   01/01.txt
///   01/04.txt
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryContainer {
    root: PathBuf,
}

impl DirectoryContainer {
    /// Open the project directory at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidContainer(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        info!("Opened directory container {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceContainer for DirectoryContainer {
    fn manifest(&self) -> Result<Manifest> {
        let path = self.root.join(MANIFEST_FILE);
        let bytes = fs::read(&path).map_err(|e| {
            Error::Manifest(format!("could not load manifest {}: {e}", path.display()))
        })?;
        Manifest::from_bytes(&bytes, &path.display().to_string())
    }

    fn discover_fragments(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(FRAGMENT_EXTENSION)
            {
                continue;
            }

            let parent = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy());
            let stem = path.file_stem().map(|s| s.to_string_lossy());
            if let (Some(parent), Some(stem)) = (parent, stem) {
                names.push(format!("{parent}-{stem}"));
            }
        }

        debug!("Discovered {} fragments in {}", names.len(), self.root.display());
        Ok(names)
    }

    fn read_fragment(&self, name: &str) -> Result<Option<String>> {
        let path = self.root.join(fragment_path(name));
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(decode_text(&bytes).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
