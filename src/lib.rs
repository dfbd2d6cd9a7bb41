//! # rkyvfile
//!
//! Self-describing `.rkyv` archive containers.
//!
//! An `.rkyv` file bundles any number of files with metadata about them: a
//! uuid that also names the file, creation and update dates, free-form tags
//! and search terms, and for every file its name, sniffed content type, size
//! and SHA-256 hash.
//!
//! ## Features
//!
//! - Build archives in memory and write them atomically as `<uuid>.rkyv`
//! - Read an archive's metadata without touching the stored payloads
//! - Content type detection from file bytes, not extensions
//! - Magic marker and pointer validation on read
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use rkyvfile::{Archive, archive};
//!
//! fn main() -> rkyvfile::Result<()> {
//!     let mut archive = Archive::new();
//!     archive.add_file("hello.txt", b"hello".to_vec());
//!     archive.add_tag("greeting");
//!
//!     let path = archive::flush(&mut archive, Path::new("."))?;
//!     let reopened = rkyvfile::open_archive(&path)?;
//!     assert_eq!(reopened.uuid(), archive.uuid());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod input;
pub mod io;

pub use archive::{Archive, Entry, RkyvParser};
pub use cli::Cli;
pub use error::{Error, ErrorKind, Result};
pub use input::{InputFile, read_inputs};
pub use io::{LocalFileReader, MemoryReader, ReadAt};

use std::path::{Path, PathBuf};

/// Build an archive from `inputs` and write it into `dir`.
///
/// Returns the written archive, now carrying its uuid and dates, and the
/// path of the new container.
pub fn create_archive(
    inputs: Vec<InputFile>,
    dir: &Path,
    tags: &[String],
    search_terms: &[String],
) -> Result<(Archive, PathBuf)> {
    let mut archive = Archive::new();
    for input in inputs {
        archive.add_file(input.name, input.data);
    }
    for tag in tags {
        archive.add_tag(tag.as_str());
    }
    for term in search_terms {
        archive.add_search_term(term.as_str());
    }

    let path = archive::flush(&mut archive, dir)?;
    Ok((archive, path))
}

/// Read the metadata of the container at `path`.
pub fn open_archive(path: &Path) -> Result<Archive> {
    archive::open_file(path)
}
