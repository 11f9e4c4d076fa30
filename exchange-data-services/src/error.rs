use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Transport error reaching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authorization rejected by {url}: HTTP {status}")]
    Authorization { url: String, status: u16 },

    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Type cast error in row {row}: field '{field}' value {value} is not a valid {target}")]
    TypeCast {
        row: usize,
        field: &'static str,
        value: String,
        target: &'static str,
    },

    #[error("Filesystem error at {}: {}", .path.display(), .source)]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid partition key {0:?}")]
    InvalidPartitionKey(String),
}

/// Coarse failure category of an [`EtlError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Authorization,
    DataFormat,
    TypeCast,
    Filesystem,
    InvalidInput,
}

impl EtlError {
    /// Get the failure category for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Transport { .. } => ErrorKind::Transport,
            EtlError::Authorization { .. } => ErrorKind::Authorization,
            EtlError::DataFormat(_) => ErrorKind::DataFormat,
            EtlError::TypeCast { .. } => ErrorKind::TypeCast,
            EtlError::Filesystem { .. } => ErrorKind::Filesystem,
            EtlError::InvalidPartitionKey(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        EtlError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify a csv error: I/O failures are filesystem errors, anything
    /// else means the file content is malformed.
    pub(crate) fn from_csv(path: &Path, err: csv::Error) -> Self {
        if err.is_io_error() {
            EtlError::filesystem(path, std::io::Error::from(err))
        } else {
            EtlError::DataFormat(format!("{}: {}", path.display(), err))
        }
    }
}
