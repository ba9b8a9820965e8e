use std::io;
use std::path::{Path, PathBuf};

use goast_syntax::{FormatError, ParseError};
use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};

/// Failure of an archive operation, tagged with the operation and the file.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{op} {}: {source}", path.display())]
    Parse {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("{op} {}: {source}", path.display())]
    Format {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("{op} {}: {source}", path.display())]
    Encode {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
    #[error("{op} {}: {source}", path.display())]
    Decode {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Missing or unreadable archive directory.
    #[error("list {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("list {}: not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

impl ArchiveError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn parse(op: &'static str, path: &Path, source: ParseError) -> Self {
        Self::Parse {
            op,
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn format(op: &'static str, path: &Path, source: FormatError) -> Self {
        Self::Format {
            op,
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn decode(op: &'static str, path: &Path, source: DecodeError) -> Self {
        Self::Decode {
            op,
            path: path.to_owned(),
            source,
        }
    }

    /// The file (or directory) the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Parse { path, .. }
            | Self::Format { path, .. }
            | Self::Encode { path, .. }
            | Self::Decode { path, .. }
            | Self::Io { path, .. }
            | Self::Directory { path, .. }
            | Self::NotADirectory { path } => path,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::Parse { op, .. }
            | Self::Format { op, .. }
            | Self::Encode { op, .. }
            | Self::Decode { op, .. }
            | Self::Io { op, .. } => op,
            Self::Directory { .. } | Self::NotADirectory { .. } => "list",
        }
    }

    /// The underlying decode failure, if this is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
