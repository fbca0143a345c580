//! Translation-studio export archive (`.tstudio`, `.zip`).
//!
//! Layout:
//!
//! ```text
//! manifest.json                  archive manifest, lists target_translations
//! <project>/manifest.json        project manifest
//! <project>/<chapter>/<chunk>.txt
//! ```
//!
//! The central directory is scanned once; entries are then read through the
//! random-access [`ByteSource`], so reads need only `&self`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use zip::{CompressionMethod, ZipArchive};

use super::{MANIFEST_FILE, ResourceContainer, fragment_name_from_path, fragment_path};
use crate::error::{Error, Result};
use crate::io::{ByteSource, FileSource, MemorySource, SourceCursor};
use crate::manifest::Manifest;
use crate::util::decode_text;

/// A resource container packed in a zip archive.
pub struct ArchiveContainer {
    source: Arc<dyn ByteSource>,
    /// Cached entry locations: path -> ZipEntryLoc.
    entries: HashMap<String, ZipEntryLoc>,
    /// Directory of the first packed project.
    project_dir: String,
}

#[derive(Clone, Copy)]
struct ZipEntryLoc {
    data_offset: u64,
    compressed_size: u64,
    compression: CompressionMethod,
}

impl ArchiveContainer {
    /// Open an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = Arc::new(FileSource::open(path)?);
        let container = Self::from_source(source)?;
        info!(
            "Opened archive container {} (project {})",
            path.display(),
            container.project_dir
        );
        Ok(container)
    }

    /// Open an archive held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(Arc::new(MemorySource::new(data)))
    }

    pub fn from_source(source: Arc<dyn ByteSource>) -> Result<Self> {
        let mut archive = ZipArchive::new(SourceCursor::new(source.clone()))?;

        let mut entries = HashMap::new();
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let Some(data_offset) = file.data_start() else {
                return Err(Error::InvalidContainer(format!(
                    "no data offset for entry {}",
                    file.name()
                )));
            };
            entries.insert(
                file.name().to_string(),
                ZipEntryLoc {
                    data_offset,
                    compressed_size: file.compressed_size(),
                    compression: file.compression(),
                },
            );
        }

        let top = read_entry(&source, &entries, MANIFEST_FILE)?
            .ok_or_else(|| Error::Manifest("archive is missing a manifest".into()))?;
        let top = Manifest::from_bytes(&top, MANIFEST_FILE)?;

        let project = top
            .target_translations
            .first()
            .ok_or_else(|| Error::InvalidContainer("no projects found in archive".into()))?;

        Ok(Self {
            source,
            entries,
            project_dir: project.path.trim_end_matches('/').to_string(),
        })
    }

    /// Directory of the packed project inside the archive.
    pub fn project_dir(&self) -> &str {
        &self.project_dir
    }

    fn project_path(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        if self.project_dir.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", self.project_dir, relative)
        }
    }
}

impl ResourceContainer for ArchiveContainer {
    fn manifest(&self) -> Result<Manifest> {
        let path = self.project_path(MANIFEST_FILE);
        let bytes = read_entry(&self.source, &self.entries, &path)?.ok_or_else(|| {
            Error::Manifest(format!("no manifest found in {}", self.project_dir))
        })?;
        Manifest::from_bytes(&bytes, &path)
    }

    fn discover_fragments(&self) -> Result<Vec<String>> {
        let prefix = self.project_path("");
        let mut names: Vec<String> = self
            .entries
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter_map(fragment_name_from_path)
            .collect();
        names.sort();
        debug!("Discovered {} fragments in archive", names.len());
        Ok(names)
    }

    fn read_fragment(&self, name: &str) -> Result<Option<String>> {
        let path = self.project_path(&fragment_path(name));
        let bytes = read_entry(&self.source, &self.entries, &path)?;
        Ok(bytes.map(|b| decode_text(&b).into_owned()))
    }
}

// ----------------------------------------------------------------------------
// ZIP IO Helpers
// ----------------------------------------------------------------------------

/// Read and decompress an entry. `None` when the archive has no such entry.
fn read_entry(
    source: &Arc<dyn ByteSource>,
    index: &HashMap<String, ZipEntryLoc>,
    path: &str,
) -> Result<Option<Vec<u8>>> {
    let Some(loc) = index.get(path) else {
        return Ok(None);
    };

    let compressed = source.read_at(loc.data_offset, loc.compressed_size as usize)?;

    match loc.compression {
        CompressionMethod::Stored => Ok(Some(compressed)),
        CompressionMethod::Deflated => {
            let mut decoder = flate2::read::DeflateDecoder::new(&compressed[..]);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            Ok(Some(out))
        }
        method => Err(Error::InvalidContainer(format!(
            "unsupported compression method {method:?} for {path}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, contents) in files {
            zip.start_file(*name, deflated).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    const TOP: &str = r#"{"target_translations": [{"path": "en_rut_text_reg/", "id": "en_rut_text_reg"}]}"#;
    const PROJECT: &str = r#"{"project": {"id": "rut", "name": "Ruth"}, "finished_chunks": ["01-01"]}"#;

    #[test]
    fn test_open_archive() {
        let data = archive(&[
            ("manifest.json", TOP),
            ("en_rut_text_reg/manifest.json", PROJECT),
            ("en_rut_text_reg/01/01.txt", "\\c 1 \\v 1 In the days"),
            ("en_rut_text_reg/01/title.txt", "Chapter One"),
        ]);
        let container = ArchiveContainer::from_bytes(data).unwrap();

        assert_eq!(container.project_dir(), "en_rut_text_reg");
        assert_eq!(container.manifest().unwrap().project.name, "Ruth");
        assert_eq!(container.fragment_names(false).unwrap(), vec!["01-01", "01-title"]);
        assert_eq!(container.fragment_names(true).unwrap(), vec!["01-01"]);
        assert_eq!(
            container.read_fragment("01-title").unwrap().as_deref(),
            Some("Chapter One")
        );
        assert_eq!(container.read_fragment("02-01").unwrap(), None);
    }

    #[test]
    fn test_stored_entries() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in [
            ("manifest.json", TOP),
            ("en_rut_text_reg/manifest.json", PROJECT),
            ("en_rut_text_reg/01/01.txt", "\\v 1 Stored"),
        ] {
            zip.start_file(name, stored).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        let data = zip.finish().unwrap().into_inner();

        let container = ArchiveContainer::from_bytes(data).unwrap();
        assert_eq!(container.read_fragment("01-01").unwrap().as_deref(), Some("\\v 1 Stored"));
    }

    #[test]
    fn test_discovery_limited_to_first_project() {
        let top = r#"{"target_translations": [{"path": "a"}, {"path": "b"}]}"#;
        let data = archive(&[
            ("manifest.json", top),
            ("a/manifest.json", PROJECT),
            ("a/01/01.txt", "\\v 1 Ruth"),
            ("b/manifest.json", PROJECT),
            ("b/50/01.txt", "\\v 1 Other"),
            ("a.txt", "stray"),
        ]);
        let container = ArchiveContainer::from_bytes(data).unwrap();

        assert_eq!(container.fragment_names(false).unwrap(), vec!["01-01"]);
        let book = crate::assemble_book(&container, &crate::AssembleOptions::new()).unwrap();
        let chapters: Vec<Option<u32>> = book.chapters().iter().map(|c| c.chapter_number()).collect();
        assert_eq!(chapters, vec![Some(1)]);
    }

    #[test]
    fn test_missing_top_manifest() {
        let data = archive(&[("en_rut_text_reg/01/01.txt", "\\v 1 Text")]);
        let err = ArchiveContainer::from_bytes(data).err().unwrap();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_no_projects() {
        let data = archive(&[("manifest.json", r#"{"target_translations": []}"#)]);
        let err = ArchiveContainer::from_bytes(data).err().unwrap();
        assert!(matches!(err, Error::InvalidContainer(_)));
    }

    #[test]
    fn test_missing_project_manifest() {
        let data = archive(&[("manifest.json", TOP), ("en_rut_text_reg/01/01.txt", "\\v 1")]);
        let container = ArchiveContainer::from_bytes(data).unwrap();
        assert!(matches!(container.manifest(), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let err = ArchiveContainer::from_bytes(b"plain text".to_vec()).err().unwrap();
        assert!(matches!(err, Error::Zip(_)));
    }
}
