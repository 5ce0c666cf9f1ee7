// Positioned, read-only access to a disk image

use crate::FatlensError;
use log::debug;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Read-only handle onto an image. Every read is positioned: seek, then
/// read exactly the requested number of bytes or fail.
pub struct ImageReader<R> {
    inner: R,
    source: PathBuf,
}

impl ImageReader<File> {
    /// Open an image file for reading. The file is never opened for writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FatlensError> {
        let path = path.as_ref();
        debug!("Opening image {}", path.display());
        let file = File::open(path)?;
        Ok(Self {
            inner: file,
            source: path.to_path_buf(),
        })
    }
}

impl<R: Read + Seek> ImageReader<R> {
    /// Wrap an already-open handle (an in-memory cursor in tests).
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            source: PathBuf::from("<memory>"),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Fill `buf` from `offset`. A short read is an error, never a partial result.
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), FatlensError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => FatlensError::ShortRead {
                offset,
                expected: buf.len(),
            },
            _ => FatlensError::Io(e),
        })
    }

    /// Read `len` bytes at `offset` into a fresh buffer.
    pub fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, FatlensError> {
        let mut buf = vec![0u8; len];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn reads_at_offset() {
        let mut reader = ImageReader::new(Cursor::new((0u8..=255).collect::<Vec<u8>>()));
        assert_eq!(reader.read_at(10, 3).unwrap(), vec![10, 11, 12]);
        assert_eq!(reader.read_at(0, 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn short_read_is_an_error() {
        let mut reader = ImageReader::new(Cursor::new(vec![0u8; 16]));
        match reader.read_at(8, 16) {
            Err(FatlensError::ShortRead { offset, expected }) => {
                assert_eq!(offset, 8);
                assert_eq!(expected, 16);
            }
            other => panic!("expected short read, got {:?}", other),
        }
    }

    #[test]
    fn opens_file_read_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"FAT16 image").unwrap();

        let mut reader = ImageReader::open(file.path()).unwrap();
        assert_eq!(reader.read_at(6, 5).unwrap(), b"image");
        assert_eq!(reader.source(), file.path());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ImageReader::open("/nonexistent/fatlens/image.img").err().unwrap();
        assert!(err.is_io());
    }
}
