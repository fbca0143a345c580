//! Random-access byte sources used by the archive container.

mod byte_source;
mod cursor;

pub use byte_source::{ByteSource, FileSource, MemorySource};
pub use cursor::SourceCursor;
