//! `.rkyv` archive model and codec.
//!
//! An archive bundles whole files with metadata describing them: a uuid,
//! creation and update dates, tags, search terms and, per file, its name,
//! sniffed content type, size and SHA-256 hash.
//!
//! ## Architecture
//!
//! - [`structures`]: the in-memory [`Archive`] and its [`Entry`] list,
//!   plus the fixed [`Header`]
//! - [`content_type`]: byte-signature content sniffing used when adding files
//! - [`writer`]: encoding an archive into a container
//! - [`parser`]: decoding a container's metadata back into an archive
//!
//! ## Container Format
//!
//! A container consists of:
//! 1. The 4-byte magic `RKYV`
//! 2. An 8-byte little-endian pointer holding the payload section length
//! 3. Every entry's raw bytes, concatenated in entry order
//! 4. A JSON metadata record running to the end of the file
//!
//! Readers use the pointer to jump straight to the metadata without touching
//! the payloads.
//!
//! ## Limitations
//!
//! - Decoding yields metadata only; payload bytes are not read back
//! - No compression or deduplication

pub mod content_type;
mod parser;
mod structures;
mod writer;

pub use parser::{RkyvParser, decode, open_file};
pub use structures::*;
pub use writer::{encode, finalize, flush, write_to};
