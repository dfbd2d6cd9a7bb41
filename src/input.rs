//! Collecting input files for a new archive.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A file read from disk, ready to be added to an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Base name, without any directory components
    pub name: String,
    pub data: Vec<u8>,
}

/// Read every path into memory.
///
/// All paths are checked before any is read, so a directory or a missing
/// file anywhere in the list fails the whole call up front.
pub fn read_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InputFile>> {
    if paths.is_empty() {
        return Err(Error::NoInputs);
    }

    for path in paths {
        let path = path.as_ref();
        let stat = fs::metadata(path).map_err(|e| Error::io("get file stats", path, e))?;
        if stat.is_dir() {
            return Err(Error::Directory {
                path: path.to_path_buf(),
            });
        }
    }

    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let data = fs::read(path).map_err(|e| Error::io("read file", path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            Ok(InputFile { name, data })
        })
        .collect()
}
