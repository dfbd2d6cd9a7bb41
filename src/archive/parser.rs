//! `.rkyv` container parser.
//!
//! Reads the fixed header, checks the magic marker, then skips the payload
//! section using the meta pointer and parses the trailing JSON record.
//! Payload bytes are never read: entries come back with metadata only.

use byteorder::{ByteOrder, LittleEndian};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::{LocalFileReader, MemoryReader, ReadAt};

use super::structures::{Archive, HEADER_SIZE, Header, MAGIC};

/// Parser for a single container.
///
/// Generic over the reader so the same logic serves files on disk and
/// byte buffers. `path` is only used to label errors.
pub struct RkyvParser<R: ReadAt> {
    reader: R,
    path: PathBuf,
    size: u64,
}

impl RkyvParser<LocalFileReader> {
    /// Open a container on disk
    pub fn open(path: &Path) -> Result<Self> {
        let reader = LocalFileReader::new(path).map_err(|e| Error::io("open file", path, e))?;
        Ok(Self::new(reader, path))
    }
}

impl<R: ReadAt> RkyvParser<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        let size = reader.size();
        Self {
            reader,
            path: path.into(),
            size,
        }
    }

    /// Read and validate the magic marker and meta pointer.
    pub fn read_header(&self) -> Result<Header> {
        let mut magic = [0u8; 4];
        let n = self.read_section(0, &mut magic, "RKYV")?;
        if magic != *MAGIC {
            return Err(Error::BadMagic {
                path: self.path.clone(),
                expected: *MAGIC,
                found: magic,
            });
        }

        let mut ptr = [0u8; 8];
        self.read_section(n as u64, &mut ptr, "meta pointer")?;
        let header = Header {
            meta_pointer: LittleEndian::read_u64(&ptr),
        };

        tracing::debug!(
            path = %self.path.display(),
            meta_pointer = header.meta_pointer,
            "read rkyv header"
        );
        Ok(header)
    }

    /// Parse the metadata record into an [`Archive`].
    pub fn read_archive(&self) -> Result<Archive> {
        let header = self.read_header()?;

        let available = self.size - HEADER_SIZE as u64;
        if header.meta_pointer > available {
            return Err(Error::PointerOutOfRange {
                path: self.path.clone(),
                pointer: header.meta_pointer,
                available,
            });
        }

        let offset = header.metadata_offset();
        let mut meta = vec![0u8; (self.size - offset) as usize];
        self.read_section(offset, &mut meta, "meta")?;

        serde_json::from_slice(&meta).map_err(|source| Error::Metadata {
            path: self.path.clone(),
            source,
        })
    }

    /// Fill `buf` from `offset`, treating a short read as a truncated file.
    fn read_section(&self, offset: u64, buf: &mut [u8], section: &'static str) -> Result<usize> {
        let n = self
            .reader
            .read_full_at(offset, buf)
            .map_err(|e| Error::io("read file", &self.path, e))?;
        if n < buf.len() {
            return Err(Error::Truncated {
                section,
                path: self.path.clone(),
                expected: buf.len() as u64,
                found: n as u64,
            });
        }
        Ok(n)
    }
}

/// Open the container at `path` and parse its metadata.
pub fn open_file(path: &Path) -> Result<Archive> {
    RkyvParser::open(path)?.read_archive()
}

/// Parse a container already held in memory.
pub fn decode(bytes: &[u8]) -> Result<Archive> {
    RkyvParser::new(MemoryReader::new(bytes), "<memory>").read_archive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn container(pointer: u64, payload: &[u8], meta: &[u8]) -> Vec<u8> {
        let mut buf = Header {
            meta_pointer: pointer,
        }
        .to_bytes()
        .to_vec();
        buf.extend_from_slice(payload);
        buf.extend_from_slice(meta);
        buf
    }

    #[test]
    fn short_input_is_a_format_error() {
        for len in 0..HEADER_SIZE {
            let bytes = &b"RKYV\x00\x00\x00\x00\x00\x00\x00\x00"[..len];
            let err = decode(bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "len {len}");
            assert!(matches!(err, Error::Truncated { .. }), "len {len}: {err}");
        }
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut bytes = container(0, b"", br#"{"version":"1.0"}"#);
        bytes[..4].copy_from_slice(b"RKYW");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::BadMagic { found, .. } if &found == b"RKYW"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn skips_payload_section() {
        let bytes = container(
            5,
            b"hello",
            br#"{"version":"1.0","uuid":"u","tags":["a"],"search":[],"files":[]}"#,
        );
        let parser = RkyvParser::new(MemoryReader::new(&bytes), "mem");
        assert_eq!(parser.read_header().unwrap().metadata_offset(), 17);

        let archive = parser.read_archive().unwrap();
        assert_eq!(archive.uuid(), "u");
        assert_eq!(archive.tags(), ["a"]);
    }

    #[test]
    fn pointer_past_end() {
        let bytes = container(1000, b"abc", b"{}");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::PointerOutOfRange {
                pointer: 1000,
                available: 5,
                ..
            }
        ));
    }

    #[test]
    fn bad_metadata() {
        let bytes = container(0, b"", b"not json");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);

        // header only, no metadata record at all
        let err = decode(&container(0, b"", b"")).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
    }

    #[test]
    fn missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_file(&dir.path().join("missing.rkyv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
