//! The destination directory and the set of files it holds.
//!
//! All filesystem mutation done by the engine goes through `LocalDirectory`.
//! Nothing is cached: every listing re-scans the directory.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CleanupError, DirectoryAccessError};
use crate::url_model::FileName;

/// Result of scanning the destination directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Regular files directly inside the directory.
    pub files: BTreeSet<FileName>,
    /// True if the directory did not exist and was created by this call.
    pub created: bool,
}

/// Handle to the flat destination directory.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    path: PathBuf,
}

impl LocalDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of `name` inside the directory.
    pub fn file_path(&self, name: &FileName) -> PathBuf {
        self.path.join(name)
    }

    /// Creates the directory (and parents) if it is missing. Returns true if it was created.
    pub fn ensure_exists(&self) -> Result<bool, DirectoryAccessError> {
        if self.path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.path).map_err(|source| self.access_error(source))?;
        Ok(true)
    }

    /// Lists regular files directly inside the directory, creating it first if missing.
    ///
    /// Symlinks are followed, so a link to a regular file is listed under the
    /// link's name. Subdirectories and names that are not valid UTF-8 are skipped.
    pub fn list_files(&self) -> Result<Listing, DirectoryAccessError> {
        let created = self.ensure_exists()?;
        if created {
            return Ok(Listing {
                files: BTreeSet::new(),
                created,
            });
        }

        let mut files = BTreeSet::new();
        for raw in self.scan()? {
            match raw.into_string() {
                Ok(name) => {
                    files.insert(FileName::new(name));
                }
                Err(raw) => {
                    tracing::warn!("skipping file with non-UTF-8 name {:?}", raw);
                }
            }
        }
        Ok(Listing { files, created })
    }

    /// Raw names of the files that `desired` does not mention, creating the
    /// directory first if missing.
    ///
    /// A name that is not valid UTF-8 can never be desired, so it is always stale.
    pub fn stale_files(
        &self,
        desired: &BTreeSet<FileName>,
    ) -> Result<Vec<OsString>, DirectoryAccessError> {
        if self.ensure_exists()? {
            return Ok(Vec::new());
        }
        let mut stale: Vec<OsString> = self
            .scan()?
            .into_iter()
            .filter(|raw| match raw.to_str() {
                Some(name) => !desired.contains(&FileName::new(name)),
                None => true,
            })
            .collect();
        stale.sort();
        Ok(stale)
    }

    /// Regular files (and dangling symlinks) directly inside the directory.
    fn scan(&self) -> Result<Vec<OsString>, DirectoryAccessError> {
        let entries = fs::read_dir(&self.path).map_err(|source| self.access_error(source))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.access_error(source))?;
            match is_file_entry(&entry) {
                Ok(true) => names.push(entry.file_name()),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), "skipping unreadable entry: {}", e);
                }
            }
        }
        Ok(names)
    }

    /// Opens `name` for writing, truncating any existing content.
    pub fn create_file(&self, name: &FileName) -> io::Result<File> {
        File::create(self.file_path(name))
    }

    /// Removes `name` from the directory.
    pub fn delete(&self, name: &FileName) -> Result<(), CleanupError> {
        self.delete_raw(OsStr::new(name.as_str()))
    }

    /// Removes an entry by its raw OS name. Errors carry the name converted lossily.
    pub fn delete_raw(&self, name: &OsStr) -> Result<(), CleanupError> {
        fs::remove_file(self.path.join(name)).map_err(|source| CleanupError {
            name: FileName::new(name.to_string_lossy()),
            source,
        })
    }

    fn access_error(&self, source: io::Error) -> DirectoryAccessError {
        DirectoryAccessError {
            path: self.path.clone(),
            source,
        }
    }
}

fn is_file_entry(entry: &DirEntry) -> io::Result<bool> {
    match fs::metadata(entry.path()) {
        Ok(meta) => Ok(meta.is_file()),
        // Dangling symlink: kept so cleanup can remove it.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(entry.file_type()?.is_symlink()),
        Err(e) => Err(e),
    }
}
