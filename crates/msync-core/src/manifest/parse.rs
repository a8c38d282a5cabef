//! Manifest body parsing.
//!
//! Accepts either a JSON array of URL strings or plain text with one URL per
//! line. In text form, blank lines and lines starting with `#` are ignored.

use crate::error::ManifestFetchError;
use crate::url_model::RemoteLocation;

pub fn parse_manifest(body: &[u8]) -> Result<Vec<RemoteLocation>, ManifestFetchError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ManifestFetchError::Malformed(format!("not UTF-8: {}", e)))?;
    let trimmed = text.trim_start_matches('\u{feff}').trim();

    let entries: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| ManifestFetchError::Malformed(format!("JSON: {}", e)))?
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    entries
        .into_iter()
        .map(|entry| {
            RemoteLocation::parse(&entry)
                .map_err(|reason| ManifestFetchError::InvalidEntry { entry, reason })
        })
        .collect()
}
