//! msync engine: keeps a local directory mirroring a remote manifest.

pub mod config;
pub mod logging;

pub mod daemon;
pub mod downloader;
pub mod error;
pub mod local_dir;
pub mod manifest;
pub mod synchronizer;
pub mod url_model;

pub use downloader::{CurlOptions, Downloader};
pub use error::{
    CleanupError, DirectoryAccessError, DownloadError, DownloadFailure, ManifestFetchError,
    RefreshError, SyncError,
};
pub use local_dir::{Listing, LocalDirectory};
pub use manifest::ManifestSource;
pub use synchronizer::{CycleReport, DesiredState, Synchronizer};
pub use url_model::{FileName, RemoteLocation};
