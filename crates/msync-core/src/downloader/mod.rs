//! Single-resource downloader.
//!
//! Fetches one remote location with libcurl and streams the body into the
//! destination directory under the location's derived file name. Existing
//! files are overwritten. There is no internal retry; callers decide what to
//! do with a failure.

mod single;

use std::time::Duration;

use crate::error::DownloadError;
use crate::local_dir::LocalDirectory;
use crate::url_model::{FileName, RemoteLocation};

/// Transfer options shared by every curl handle the engine creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlOptions {
    /// Time allowed for the TCP/TLS connect phase.
    pub connect_timeout: Duration,
    /// Deadline for the whole transfer, body included.
    pub timeout: Duration,
    /// Optional `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            user_agent: None,
        }
    }
}

impl CurlOptions {
    /// Applies redirects, timeouts and user agent to a fresh handle.
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

/// Downloads remote locations into a `LocalDirectory`.
///
/// Cheap to clone; each call to `download` uses its own curl handle, so one
/// `Downloader` can serve many worker threads.
#[derive(Debug, Clone)]
pub struct Downloader {
    dir: LocalDirectory,
    curl: CurlOptions,
}

impl Downloader {
    pub fn new(dir: LocalDirectory, curl: CurlOptions) -> Self {
        Self { dir, curl }
    }

    pub fn directory(&self) -> &LocalDirectory {
        &self.dir
    }

    /// Downloads `location`, writing its body to the derived file name.
    ///
    /// Blocks the calling thread until the transfer finishes or fails.
    pub fn download(&self, location: &RemoteLocation) -> Result<FileName, DownloadError> {
        let name = location
            .file_name()
            .ok_or_else(|| DownloadError::NoFileName(location.clone()))?;
        tracing::info!(url = %location, file = %name, "downloading");
        let written = single::download_single(location, &name, &self.dir, &self.curl)?;
        tracing::debug!(file = %name, bytes = written, "download complete");
        Ok(name)
    }
}
