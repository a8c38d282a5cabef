//! Manifest read from a local file.

use std::path::PathBuf;

use super::{parse_manifest, ManifestSource};
use crate::error::ManifestFetchError;
use crate::url_model::RemoteLocation;

/// Reads the manifest from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileManifest {
    path: PathBuf,
}

impl FileManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestSource for FileManifest {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<RemoteLocation>, ManifestFetchError> {
        let body = std::fs::read(&self.path).map_err(|source| ManifestFetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_manifest(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_fresh_content_each_fetch() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "http://example.com/one.txt").unwrap();
        f.flush().unwrap();
        let source = FileManifest::new(f.path());
        assert_eq!(source.fetch().unwrap().len(), 1);

        writeln!(f, "http://example.com/two.txt").unwrap();
        f.flush().unwrap();
        assert_eq!(source.fetch().unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileManifest::new(dir.path().join("absent.txt"));
        assert!(matches!(source.fetch(), Err(ManifestFetchError::Io { .. })));
    }
}
