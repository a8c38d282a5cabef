use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::downloader::CurlOptions;
use crate::manifest::{FileManifest, HttpManifest, ManifestSource};
use crate::synchronizer::DEFAULT_MAX_CONCURRENT_DOWNLOADS;

/// Where the manifest comes from (optional `[manifest]` table in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ManifestConfig {
    /// Fetch the manifest with an HTTP(S) GET.
    Http { url: String },
    /// Read the manifest from a local file.
    File { path: PathBuf },
}

impl ManifestConfig {
    /// Builds the source, reusing the transfer options for HTTP manifests.
    pub fn to_source(&self, curl: CurlOptions) -> Box<dyn ManifestSource> {
        match self {
            ManifestConfig::Http { url } => Box::new(HttpManifest::new(url.clone(), curl)),
            ManifestConfig::File { path } => Box::new(FileManifest::new(path.clone())),
        }
    }
}

/// Global configuration loaded from `~/.config/msync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory mirrored from the manifest. Relative paths resolve against the working directory.
    pub destination_dir: PathBuf,
    /// Seconds between reconciliation cycles.
    pub interval_secs: u64,
    /// Maximum downloads in flight during a refresh.
    pub max_concurrent_downloads: usize,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Deadline for a whole transfer, in seconds.
    pub download_timeout_secs: u64,
    /// Optional `User-Agent` header for manifest and file requests.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Manifest source; may instead be given on the command line.
    #[serde(default)]
    pub manifest: Option<ManifestConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            destination_dir: PathBuf::from("files"),
            interval_secs: 300,
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            connect_timeout_secs: 30,
            download_timeout_secs: 600,
            user_agent: None,
            manifest: None,
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl From<&SyncConfig> for CurlOptions {
    fn from(cfg: &SyncConfig) -> Self {
        CurlOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.download_timeout_secs),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("msync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}
