use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key file {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: keyfile_pkcs::Error,
    },
}

/// Failure category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be read.
    Io,
    /// The file was read but does not hold a supported RSA key.
    Format,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Format { .. } => ErrorKind::Format,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Io { path, .. } | Error::Format { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
