//! Error types for manifest fetches, downloads, cleanup and directory access.
//!
//! Every failure is returned to the immediate caller. The only errors that are
//! swallowed are per-file cleanup failures, which the synchronizer logs and
//! records in its report.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::url_model::{FileName, RemoteLocation};

/// The destination directory could not be created or read.
#[derive(Debug, Error)]
#[error("directory {}: {source}", .path.display())]
pub struct DirectoryAccessError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Fetching the manifest (the current set of remote locations) failed.
#[derive(Debug, Error)]
pub enum ManifestFetchError {
    /// Curl reported an error (timeout, connection, DNS, ...).
    #[error("manifest request failed: {0}")]
    Transfer(#[from] curl::Error),
    /// The manifest endpoint answered with a non-2xx status.
    #[error("manifest request returned HTTP {0}")]
    Http(u32),
    /// Reading a local manifest file failed.
    #[error("reading manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The body is neither a JSON array of strings nor valid UTF-8 text.
    #[error("malformed manifest: {0}")]
    Malformed(String),
    /// An entry is not an absolute URL.
    #[error("invalid manifest entry {entry:?}: {reason}")]
    InvalidEntry { entry: String, reason: url::ParseError },
}

/// A single download failed. Sibling downloads in the same batch are unaffected.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The location's path has no usable last segment.
    #[error("no file name can be derived from {0}")]
    NoFileName(RemoteLocation),
    /// Curl reported an error (timeout, connection, DNS, ...).
    #[error("transfer failed: {0}")]
    Transfer(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to the local file failed.
    #[error("writing {name}: {source}")]
    Write {
        name: FileName,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Directory(#[from] DirectoryAccessError),
}

impl DownloadError {
    /// True when the fetch hit its connect timeout or total deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Transfer(e) if e.is_operation_timedout())
    }
}

/// Deleting a stale file failed.
#[derive(Debug, Error)]
#[error("removing {name}: {source}")]
pub struct CleanupError {
    pub name: FileName,
    #[source]
    pub source: io::Error,
}

/// One failed download inside a refresh batch.
#[derive(Debug)]
pub struct DownloadFailure {
    pub location: RemoteLocation,
    pub error: DownloadError,
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// Aggregate failure of a refresh batch, returned only after every download
/// in the batch has finished.
#[derive(Debug, Error)]
#[error("{} of {} download(s) failed", .failures.len(), .failures.len() + .succeeded.len())]
pub struct RefreshError {
    pub failures: Vec<DownloadFailure>,
    /// Names written successfully by the same batch.
    pub succeeded: Vec<FileName>,
}

/// Failure of a whole reconciliation cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Manifest(#[from] ManifestFetchError),
    #[error(transparent)]
    Directory(#[from] DirectoryAccessError),
}
