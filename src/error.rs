//! Error types for rc2usfm operations.

use thiserror::Error;

use crate::usfm::ParseError;

/// Errors that can occur while reading a resource container or assembling a book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The manifest is missing, unreadable, or malformed.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// A fragment's text could not be parsed as USFM.
    #[error("Failed to parse fragment '{fragment}': {source}")]
    FragmentParse {
        fragment: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid container: {0}")]
    InvalidContainer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
