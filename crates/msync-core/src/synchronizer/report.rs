//! Desired state and per-phase reports of a reconciliation cycle.

use std::collections::BTreeSet;

use crate::error::{CleanupError, DownloadFailure};
use crate::url_model::{FileName, RemoteLocation};

/// One manifest entry paired with its local file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredFile {
    pub location: RemoteLocation,
    pub name: FileName,
}

/// What the destination directory should contain, from the latest manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub entries: Vec<DesiredFile>,
}

impl DesiredState {
    /// Locations in manifest order.
    pub fn locations(&self) -> Vec<RemoteLocation> {
        self.entries.iter().map(|e| e.location.clone()).collect()
    }

    /// File names in manifest order; index `i` belongs to `locations()[i]`.
    pub fn names(&self) -> Vec<FileName> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn name_set(&self) -> BTreeSet<FileName> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A refresh batch in which every download succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub downloaded: Vec<FileName>,
}

/// Outcome of removing stale files.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<FileName>,
    /// Files that could not be removed; cleanup carried on past them.
    pub failed: Vec<CleanupError>,
}

/// Outcome of one full cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Entries in the manifest that had a usable file name.
    pub desired: usize,
    pub downloaded: Vec<FileName>,
    pub download_failures: Vec<DownloadFailure>,
    pub cleanup: CleanupReport,
}

impl CycleReport {
    /// True if nothing failed during the cycle.
    pub fn is_clean(&self) -> bool {
        self.download_failures.is_empty() && self.cleanup.failed.is_empty()
    }
}
