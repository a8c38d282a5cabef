//! Reconciliation of the destination directory against the manifest.
//!
//! One cycle is: fetch the manifest, download every listed file with bounded
//! concurrency, then delete local files the manifest no longer names. Refresh
//! always finishes before cleanup starts. The synchronizer holds no state
//! between cycles; the filesystem and the manifest source are the only truth.

mod pool;
mod report;

use std::collections::{BTreeSet, HashMap};

use crate::config::SyncConfig;
use crate::downloader::{CurlOptions, Downloader};
use crate::error::{
    DirectoryAccessError, DownloadFailure, ManifestFetchError, RefreshError, SyncError,
};
use crate::local_dir::LocalDirectory;
use crate::manifest::ManifestSource;
use crate::url_model::{FileName, RemoteLocation};

pub use report::{CleanupReport, CycleReport, DesiredFile, DesiredState, RefreshReport};

/// Concurrent downloads allowed when nothing else is configured.
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 3;

pub struct Synchronizer {
    source: Box<dyn ManifestSource>,
    downloader: Downloader,
    max_concurrent: usize,
}

impl Synchronizer {
    pub fn new(source: Box<dyn ManifestSource>, downloader: Downloader) -> Self {
        Self {
            source,
            downloader,
            max_concurrent: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
        }
    }

    /// Builds a synchronizer for `cfg.destination_dir` with the configured limits.
    pub fn from_config(cfg: &SyncConfig, source: Box<dyn ManifestSource>) -> Self {
        let dir = LocalDirectory::new(&cfg.destination_dir);
        let downloader = Downloader::new(dir, CurlOptions::from(cfg));
        Self::new(source, downloader).with_max_concurrent(cfg.max_concurrent_downloads)
    }

    /// Sets the number of downloads that may be in flight at once (at least 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn directory(&self) -> &LocalDirectory {
        self.downloader.directory()
    }

    pub fn source_label(&self) -> String {
        self.source.label()
    }

    /// Lists the files currently stored, creating the directory if it is missing.
    pub fn load_stored_files(&self) -> Result<BTreeSet<FileName>, DirectoryAccessError> {
        let listing = self.directory().list_files()?;
        if listing.created {
            tracing::info!(
                "destination directory {} did not exist and was created",
                self.directory().path().display()
            );
        }
        Ok(listing.files)
    }

    /// Queries the manifest source once and pairs each location with its file name.
    ///
    /// Locations without a usable file name are skipped with a warning.
    pub fn desired_state(&self) -> Result<DesiredState, ManifestFetchError> {
        let locations = self.source.fetch()?;
        tracing::debug!(source = %self.source.label(), entries = locations.len(), "fetched manifest");

        let mut seen: HashMap<FileName, RemoteLocation> = HashMap::new();
        let mut entries = Vec::with_capacity(locations.len());
        for location in locations {
            let Some(name) = location.file_name() else {
                tracing::warn!(url = %location, "manifest entry has no file name; skipping");
                continue;
            };
            if let Some(previous) = seen.insert(name.clone(), location.clone()) {
                if previous != location {
                    tracing::warn!(
                        file = %name,
                        first = %previous,
                        second = %location,
                        "two manifest entries map to the same file; last write wins"
                    );
                }
            }
            entries.push(DesiredFile { location, name });
        }
        Ok(DesiredState { entries })
    }

    /// Downloads every location, at most `max_concurrent` at a time.
    ///
    /// All downloads are attempted even if some fail. If any failed, the
    /// returned `RefreshError` lists each failure once the whole batch is done.
    pub fn refresh_files(
        &self,
        locations: &[RemoteLocation],
    ) -> Result<RefreshReport, RefreshError> {
        let results = pool::run_bounded(locations.to_vec(), self.max_concurrent, |location| {
            self.downloader.download(location)
        });

        let mut downloaded = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (location, res) in results {
            match res {
                Ok(name) => downloaded.push(name),
                Err(error) => {
                    if error.is_timeout() {
                        tracing::error!(url = %location, "download timed out: {}", error);
                    } else {
                        tracing::error!(url = %location, "download failed: {}", error);
                    }
                    failures.push(DownloadFailure { location, error });
                }
            }
        }

        if failures.is_empty() {
            Ok(RefreshReport { downloaded })
        } else {
            Err(RefreshError {
                failures,
                succeeded: downloaded,
            })
        }
    }

    /// Deletes every stored file whose name is not in `desired`.
    ///
    /// Files whose names are not valid UTF-8 are always removed and reported
    /// under a lossy name. A file that cannot be removed is logged and skipped;
    /// the rest are still processed.
    pub fn cleanup_old_files(
        &self,
        desired: &BTreeSet<FileName>,
    ) -> Result<CleanupReport, DirectoryAccessError> {
        let stale = self.directory().stale_files(desired)?;
        let mut report = CleanupReport::default();
        for raw in stale {
            let name = FileName::new(raw.to_string_lossy());
            match self.directory().delete_raw(&raw) {
                Ok(()) => {
                    tracing::info!(file = %name, "removed stale file");
                    report.removed.push(name);
                }
                Err(e) => {
                    tracing::warn!(file = %name, "could not remove stale file: {}", e.source);
                    report.failed.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Runs one reconciliation cycle: manifest, then refresh, then cleanup.
    ///
    /// A manifest failure aborts the cycle before anything on disk changes.
    /// Download failures do not skip cleanup, since cleanup only touches names
    /// the manifest no longer lists; they are returned in the report.
    pub fn run_cycle(&self) -> Result<CycleReport, SyncError> {
        let desired = self.desired_state()?;

        let (downloaded, download_failures) = match self.refresh_files(&desired.locations()) {
            Ok(report) => (report.downloaded, Vec::new()),
            Err(e) => {
                tracing::warn!("{}", e);
                (e.succeeded, e.failures)
            }
        };

        let cleanup = self.cleanup_old_files(&desired.name_set())?;

        Ok(CycleReport {
            desired: desired.len(),
            downloaded,
            download_failures,
            cleanup,
        })
    }
}
