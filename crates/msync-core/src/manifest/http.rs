//! Manifest fetched over HTTP(S).

use super::{parse_manifest, ManifestSource};
use crate::downloader::CurlOptions;
use crate::error::ManifestFetchError;
use crate::url_model::RemoteLocation;

/// Fetches the manifest body with a GET on every call.
#[derive(Debug, Clone)]
pub struct HttpManifest {
    url: String,
    curl: CurlOptions,
}

impl HttpManifest {
    pub fn new(url: impl Into<String>, curl: CurlOptions) -> Self {
        Self {
            url: url.into(),
            curl,
        }
    }

    fn get_body(&self) -> Result<Vec<u8>, ManifestFetchError> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(&self.url)?;
        self.curl.apply(&mut easy)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(ManifestFetchError::Http(code));
        }
        Ok(body)
    }
}

impl ManifestSource for HttpManifest {
    fn label(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<RemoteLocation>, ManifestFetchError> {
        let body = self.get_body()?;
        tracing::debug!(url = %self.url, bytes = body.len(), "fetched manifest");
        parse_manifest(&body)
    }
}
