use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use super::ByteSource;

/// A `Read + Seek` view over a shared [`ByteSource`].
///
/// Lets libraries that want a stream (`zip::ZipArchive`) scan a source that
/// is otherwise read by offset.
pub struct SourceCursor {
    source: Arc<dyn ByteSource>,
    position: u64,
}

impl SourceCursor {
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self {
            source,
            position: 0,
        }
    }
}

impl Read for SourceCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let total = self.source.len();
        if self.position >= total {
            return Ok(0);
        }

        let count = (total - self.position).min(buf.len() as u64) as usize;
        self.source.read_exact_at(self.position, &mut buf[..count])?;
        self.position += count as u64;
        Ok(count)
    }
}

impl Seek for SourceCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.source.len().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of source",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;

    #[test]
    fn test_cursor_reads_sequentially() {
        let mut cursor = SourceCursor::new(Arc::new(MemorySource::new(b"1-1 1-2".to_vec())));
        let mut buf = [0u8; 3];
        assert_eq!(cursor.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"1-1");

        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " 1-2");
    }

    #[test]
    fn test_cursor_seek() {
        let mut cursor = SourceCursor::new(Arc::new(MemorySource::new(b"abcdef".to_vec())));
        assert_eq!(cursor.seek(SeekFrom::End(-2)).unwrap(), 4);
        let mut buf = [0u8; 2];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ef");

        assert!(cursor.seek(SeekFrom::Current(-10)).is_err());
    }
}
