//! Manifest sources: where the authoritative list of remote locations comes from.
//!
//! The synchronizer depends only on the `ManifestSource` trait. Every fetch
//! returns a full snapshot; there is no paging or delta contract.

mod file;
mod http;
mod parse;

use crate::error::ManifestFetchError;
use crate::url_model::RemoteLocation;

pub use file::FileManifest;
pub use http::HttpManifest;
pub use parse::parse_manifest;

/// Supplies the current set of remote locations on demand.
pub trait ManifestSource: Send + Sync {
    /// Human-readable label for logs (URL or path).
    fn label(&self) -> String;

    /// Fetches the full current manifest. Blocks until done.
    fn fetch(&self) -> Result<Vec<RemoteLocation>, ManifestFetchError>;
}

/// Picks a source from a CLI/config string: `http://` and `https://` are URLs,
/// anything else is a path to a local manifest file.
pub fn source_from_str(
    src: &str,
    curl: crate::downloader::CurlOptions,
) -> Box<dyn ManifestSource> {
    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Box::new(HttpManifest::new(src, curl))
    } else {
        Box::new(FileManifest::new(src))
    }
}
