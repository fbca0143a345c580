//! # rc2usfm
//!
//! Reassemble translation-studio resource containers into a single USFM book.
//!
//! A resource container stores a book as many small fragments named
//! `<chapter>-<chunk>` plus a `manifest.json`. This crate selects, orders,
//! parses and merges those fragments into one [`Document`], and renders it
//! back to USFM text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rc2usfm::{AssembleOptions, assemble_book, container, render_usfm};
//!
//! let container = container::open("en_exo_text_reg.tstudio").unwrap();
//! let book = assemble_book(container.as_ref(), &AssembleOptions::new()).unwrap();
//! std::fs::write("exodus.usfm", render_usfm(&book)).unwrap();
//! ```
//!
//! ## Containers
//!
//! - [`DirectoryContainer`]: a project directory on disk
//! - [`ArchiveContainer`]: a `.tstudio` / `.zip` export
//! - [`MemoryContainer`]: fragments held in memory
//!
//! Any other storage can be plugged in by implementing [`ResourceContainer`].

pub mod assemble;
pub mod container;
pub mod error;
pub mod io;
pub mod manifest;
pub mod model;
pub mod usfm;
pub(crate) mod util;

pub use assemble::{AssembleOptions, assemble_book, assemble_book_with_parser};
pub use container::{ArchiveContainer, DirectoryContainer, MemoryContainer, ResourceContainer};
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use model::{Document, Marker, MarkerKind};
pub use usfm::{MarkupParser, ParseError, ParserOptions, UsfmParser, render_usfm};
