//! Filename extraction from URL path.

use url::Url;

/// Extracts the percent-decoded last non-empty path segment of `url`.
///
/// Returns `None` if the path is empty/root or the segment is `.` or `..`.
pub fn filename_from_url_path(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}
