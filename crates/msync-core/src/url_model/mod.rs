//! Remote locations and the local file names derived from them.
//!
//! A file's local identity is the last segment of its URL path, decoded and
//! made safe for use as a single path component. Two locations that end in the
//! same segment map to the same local file.

mod path;
mod sanitize;

use std::fmt;
use std::str::FromStr;

use url::Url;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_path_component;

/// An absolute URL naming one downloadable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteLocation(Url);

impl RemoteLocation {
    /// Parses an absolute URL.
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s.trim()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    /// The local file name for this location, if its path has a usable last segment.
    pub fn file_name(&self) -> Option<FileName> {
        derive_filename(&self.0)
    }
}

impl FromStr for RemoteLocation {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Url> for RemoteLocation {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Name of a file directly inside the destination directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileName(String);

impl FileName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<std::path::Path> for FileName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the local file name from the last path segment of `url`.
///
/// Returns `None` when the path is empty or ends in `.` / `..`.
///
/// # Examples
///
/// - `https://example.com/a/b/file1.txt` → `file1.txt`
/// - `https://example.com/my%20file.txt?sig=x` → `my file.txt`
/// - `https://example.com/` → `None`
pub fn derive_filename(url: &Url) -> Option<FileName> {
    let raw = filename_from_url_path(url)?;
    let safe = sanitize_path_component(&raw);
    if safe.is_empty() || safe == "." || safe == ".." {
        return None;
    }
    Some(FileName(safe))
}
