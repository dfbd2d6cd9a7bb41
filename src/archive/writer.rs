//! `.rkyv` container writer.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! [0..4)       "RKYV"
//! [4..12)      meta pointer P: total payload length
//! [12..12+P)   entry payloads, back to back, in entry order
//! [12+P..)     JSON metadata record
//! ```
//!
//! Each section is checked against the number of bytes it should occupy.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::CountingWriter;

use super::structures::{Archive, Header};

/// Unix mode of written containers, before the umask
#[cfg(unix)]
const CONTAINER_MODE: u32 = 0o644;

/// Assign identity and timestamps in place.
pub fn finalize(archive: &mut Archive, now: DateTime<Utc>) {
    *archive = std::mem::take(archive).finalized(now);
}

/// Serialize an already finalized archive to `out`.
///
/// Returns the total number of bytes written.
pub fn write_to<W: Write>(archive: &Archive, out: W) -> Result<u64> {
    let name = archive.file_name();
    let mut out = CountingWriter::new(out);

    let header = Header {
        meta_pointer: archive.payload_size(),
    };
    let header_bytes = header.to_bytes();
    write_section(&mut out, &name, "RKYV", &header_bytes[..4], 4)?;
    write_section(&mut out, &name, "pointer", &header_bytes[4..], 8)?;

    for entry in archive.entries() {
        let section = format!("file `{}`", entry.name);
        write_section(&mut out, &name, &section, entry.data(), entry.size)?;
    }

    let meta = serde_json::to_vec(archive).map_err(|source| Error::Encode {
        name: name.clone(),
        source,
    })?;
    write_section(&mut out, &name, "meta", &meta, meta.len() as u64)?;

    out.flush().map_err(|source| Error::Write {
        section: "meta".to_string(),
        name,
        source,
    })?;
    Ok(out.bytes_written())
}

/// Finalize `archive` and encode it into a byte buffer.
pub fn encode(archive: &mut Archive) -> Result<Vec<u8>> {
    finalize(archive, Utc::now());
    let mut buf = Vec::new();
    write_to(archive, &mut buf)?;
    Ok(buf)
}

/// Finalize `archive` and write it to `dir/<uuid>.rkyv`.
///
/// The container is assembled in a temporary file inside `dir` and renamed
/// over the destination only once every byte is on disk, so a failed write
/// never clobbers an existing container.
pub fn flush(archive: &mut Archive, dir: &Path) -> Result<PathBuf> {
    finalize(archive, Utc::now());
    let path = dir.join(archive.file_name());

    let mut tmp = temp_builder()
        .tempfile_in(dir)
        .map_err(|e| Error::io("create temporary file in", dir, e))?;
    let written = write_to(archive, tmp.as_file_mut())?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io("sync", tmp.path(), e))?;
    tmp.persist(&path)
        .map_err(|e| Error::io("persist rkyv file", &path, e.error))?;

    tracing::info!(
        path = %path.display(),
        entries = archive.entries().len(),
        payload_bytes = archive.payload_size(),
        total_bytes = written,
        "wrote rkyv file"
    );
    Ok(path)
}

/// Temporary files default to owner-only; containers get regular file mode.
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".rkyv-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(CONTAINER_MODE));
    }
    builder
}

fn write_section<W: Write>(
    out: &mut CountingWriter<W>,
    name: &str,
    section: &str,
    bytes: &[u8],
    expected: u64,
) -> Result<()> {
    let before = out.bytes_written();
    out.write_all(bytes).map_err(|source| Error::Write {
        section: section.to_string(),
        name: name.to_string(),
        source,
    })?;
    let written = out.bytes_written() - before;
    if written != expected {
        return Err(Error::ShortWrite {
            section: section.to_string(),
            name: name.to_string(),
            expected,
            written,
        });
    }
    Ok(())
}
