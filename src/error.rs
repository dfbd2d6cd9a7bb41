//! Error types for reading and writing `.rkyv` containers.

use std::io;
use std::path::PathBuf;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Storage unavailable or a short read/write at the transport level.
    Io,
    /// The bytes are not a valid container.
    Format,
    /// The caller handed over unusable inputs.
    Input,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not {action} `{}`: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {section} to rkyv file `{name}`: {source}")]
    Write {
        section: String,
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("could not write {section} to rkyv file `{name}`: {written} of {expected} bytes written")]
    ShortWrite {
        section: String,
        name: String,
        expected: u64,
        written: u64,
    },

    #[error("could not read {section} from `{}`: {found} of {expected} bytes read", .path.display())]
    Truncated {
        section: &'static str,
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("`{}` is not an rkyv file: expected magic `{}`, found `{}`", .path.display(), .expected.escape_ascii(), .found.escape_ascii())]
    BadMagic {
        path: PathBuf,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("meta pointer in `{}` skips {pointer} payload bytes but only {available} follow the header", .path.display())]
    PointerOutOfRange {
        path: PathBuf,
        pointer: u64,
        available: u64,
    },

    #[error("could not unmarshal meta json `{}`: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not marshal meta to json for `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no input files specified")]
    NoInputs,

    #[error("directories are not supported: `{}`", .path.display())]
    Directory { path: PathBuf },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. }
            | Error::Write { .. }
            | Error::ShortWrite { .. }
            | Error::Encode { .. } => ErrorKind::Io,
            Error::Truncated { .. }
            | Error::BadMagic { .. }
            | Error::PointerOutOfRange { .. }
            | Error::Metadata { .. } => ErrorKind::Format,
            Error::NoInputs | Error::Directory { .. } => ErrorKind::Input,
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let e = Error::io("open", "a.rkyv", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(e.kind(), ErrorKind::Io);
        assert_eq!(Error::NoInputs.kind(), ErrorKind::Input);

        let e = Error::BadMagic {
            path: "a.rkyv".into(),
            expected: *b"RKYV",
            found: *b"PK\x03\x04",
        };
        assert_eq!(e.kind(), ErrorKind::Format);
    }

    #[test]
    fn encode_failures_are_write_errors() {
        let source = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let e = Error::Encode {
            name: "a.rkyv".to_string(),
            source,
        };
        assert_eq!(e.kind(), ErrorKind::Io);
    }

    #[test]
    fn messages_carry_context() {
        let e = Error::Truncated {
            section: "meta pointer",
            path: "x.rkyv".into(),
            expected: 8,
            found: 3,
        };
        assert_eq!(
            e.to_string(),
            "could not read meta pointer from `x.rkyv`: 3 of 8 bytes read"
        );
    }
}
