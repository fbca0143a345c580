//! Container tests: the same project stored as a directory tree and as a
//! translation-studio export archive.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use rc2usfm::{
    ArchiveContainer, AssembleOptions, DirectoryContainer, Error, ResourceContainer, assemble_book,
    container, render_usfm,
};

const PROJECT_DIR: &str = "en_exo_text_reg";

const PROJECT_MANIFEST: &str = r#"{
    "package_version": 6,
    "format": "usfm",
    "target_language": { "id": "en", "name": "English", "direction": "ltr" },
    "project": { "id": "exo", "name": "Exodus" },
    "type": { "id": "text", "name": "Text" },
    "resource": { "id": "reg", "name": "Regular" },
    "translators": ["tester"],
    "finished_chunks": ["front-title", "01-title", "01-01", "01-03"]
}"#;

const ARCHIVE_MANIFEST: &str = r#"{
    "generator": { "name": "ts-desktop", "build": 132 },
    "package_version": 2,
    "timestamp": 1496244215,
    "target_translations": [
        { "path": "en_exo_text_reg", "id": "en_exo_text_reg", "commit_hash": "abc", "direction": "ltr" }
    ]
}"#;

const FRAGMENTS: &[(&str, &str)] = &[
    ("front/title.txt", "Exodus\n"),
    ("01/title.txt", "Chapter 1"),
    ("01/01.txt", "\\c 1\n\\p\n\\v 1 These are the names \\f + \\ft Or sons\\f* of Israel.\n\\v 2 Reuben, Simeon, Levi.\n\\s5\n"),
    ("01/03.txt", "\\v 3 Issachar, Zebulun.\n\\v 4 Dan and \\add Naphtali\\add*.\n"),
    ("01/05.txt", "\\v 5 All the descendants.\n"),
    ("02/title.txt", "Chapter 2"),
    ("02/01.txt", "\\c 2\n\\p\n\\v 1 A man of the house of Levi.\n"),
    ("10/01.txt", "\\v 1 Pharaoh's heart.\n"),
];

fn write_directory(root: &Path) {
    fs::write(root.join("manifest.json"), PROJECT_MANIFEST).unwrap();
    for (path, text) in FRAGMENTS {
        let file = root.join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, text).unwrap();
    }
    // Not fragments
    fs::write(root.join("LICENSE.md"), "license").unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git").join("HEAD"), "ref: refs/heads/master").unwrap();
}

fn build_archive(top_manifest: Option<&str>) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default();
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    if let Some(manifest) = top_manifest {
        zip.start_file("manifest.json", deflated).unwrap();
        zip.write_all(manifest.as_bytes()).unwrap();
    }

    zip.add_directory(format!("{PROJECT_DIR}/"), stored).unwrap();
    zip.start_file(format!("{PROJECT_DIR}/manifest.json"), deflated).unwrap();
    zip.write_all(PROJECT_MANIFEST.as_bytes()).unwrap();

    for (i, (path, text)) in FRAGMENTS.iter().enumerate() {
        let options = if i % 2 == 0 { deflated } else { stored };
        zip.start_file(format!("{PROJECT_DIR}/{path}"), options).unwrap();
        zip.write_all(text.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

// ============================================================================
// Directory Container
// ============================================================================

#[test]
fn test_directory_discovery() {
    let dir = TempDir::new().unwrap();
    write_directory(dir.path());

    let container = DirectoryContainer::open(dir.path()).unwrap();
    assert_eq!(
        sorted(container.fragment_names(false).unwrap()),
        vec!["01-01", "01-03", "01-05", "01-title", "02-01", "02-title", "10-01", "front-title"]
    );
    assert_eq!(
        container.fragment_names(true).unwrap(),
        vec!["front-title", "01-title", "01-01", "01-03"]
    );
}

#[test]
fn test_directory_missing_fragment() {
    let dir = TempDir::new().unwrap();
    write_directory(dir.path());

    let container = DirectoryContainer::open(dir.path()).unwrap();
    assert_eq!(container.read_fragment("01-02").unwrap(), None);
    assert_eq!(container.read_fragment("01-title").unwrap().as_deref(), Some("Chapter 1"));
}

#[test]
fn test_directory_missing_manifest() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("01")).unwrap();
    fs::write(dir.path().join("01").join("01.txt"), "\\v 1 One").unwrap();

    let container = DirectoryContainer::open(dir.path()).unwrap();
    let err = assemble_book(&container, &AssembleOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Manifest(_)));
}

#[test]
fn test_directory_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("project.txt");
    fs::write(&file, "").unwrap();

    assert!(matches!(
        DirectoryContainer::open(&file),
        Err(Error::InvalidContainer(_))
    ));
}

// ============================================================================
// Archive Container
// ============================================================================

#[test]
fn test_archive_discovery() {
    let container = ArchiveContainer::from_bytes(build_archive(Some(ARCHIVE_MANIFEST))).unwrap();

    assert_eq!(container.project_dir(), PROJECT_DIR);
    assert_eq!(container.manifest().unwrap().project.id, "exo");
    assert_eq!(
        sorted(container.fragment_names(false).unwrap()),
        vec!["01-01", "01-03", "01-05", "01-title", "02-01", "02-title", "10-01", "front-title"]
    );
    assert_eq!(container.read_fragment("02-title").unwrap().as_deref(), Some("Chapter 2"));
    assert_eq!(container.read_fragment("03-01").unwrap(), None);
}

#[test]
fn test_archive_without_manifest() {
    let result = ArchiveContainer::from_bytes(build_archive(None));
    assert!(matches!(result, Err(Error::Manifest(_))));
}

#[test]
fn test_archive_without_projects() {
    let result = ArchiveContainer::from_bytes(build_archive(Some(r#"{"target_translations": []}"#)));
    assert!(matches!(result, Err(Error::InvalidContainer(_))));
}

#[test]
fn test_archive_not_a_zip() {
    let result = ArchiveContainer::from_bytes(b"not a zip file".to_vec());
    assert!(matches!(result, Err(Error::Zip(_) | Error::Io(_))));
}

// ============================================================================
// Providers Agree
// ============================================================================

#[test]
fn test_directory_and_archive_assemble_identically() {
    let dir = TempDir::new().unwrap();
    write_directory(dir.path());
    let archive_path = dir.path().join("en_exo_text_reg.tstudio");
    fs::write(&archive_path, build_archive(Some(ARCHIVE_MANIFEST))).unwrap();

    let from_dir = container::open(dir.path()).unwrap();
    let from_archive = container::open(&archive_path).unwrap();

    for options in [AssembleOptions::new(), AssembleOptions::new().with_only_finished(true)] {
        let a = assemble_book(from_dir.as_ref(), &options).unwrap();
        let b = assemble_book(from_archive.as_ref(), &options).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_rendered_book() {
    let container = ArchiveContainer::from_bytes(build_archive(Some(ARCHIVE_MANIFEST))).unwrap();
    let book = assemble_book(&container, &AssembleOptions::new()).unwrap();
    let usfm = render_usfm(&book);

    let expected = "\
\\id exo
\\ide UTF-8
\\toc1 Exodus
\\toc2 Exodus
\\toc3 exo
\\h Exodus
\\mt Exodus
\\p
\\c 1
\\cl Chapter 1
\\p
\\v 1 These are the names \\f + \\ft Or sons\\f* of Israel.
\\v 2 Reuben, Simeon, Levi.
\\v 3 Issachar, Zebulun.
\\v 4 Dan and \\add Naphtali\\add*.
\\v 5 All the descendants.
\\p
\\c 2
\\cl Chapter 2
\\p
\\v 1 A man of the house of Levi.
\\p
\\c 10
\\v 1 Pharaoh's heart.
";
    assert_eq!(usfm, expected);
}

#[test]
fn test_only_finished_archive() {
    let container = ArchiveContainer::from_bytes(build_archive(Some(ARCHIVE_MANIFEST))).unwrap();
    let book = assemble_book(&container, &AssembleOptions::new().with_only_finished(true)).unwrap();

    let chapters: Vec<u32> = book.chapters().iter().filter_map(|c| c.chapter_number()).collect();
    assert_eq!(chapters, vec![1]);
    assert_eq!(book.find_all(rc2usfm::MarkerKind::is_verse).len(), 4);
}
