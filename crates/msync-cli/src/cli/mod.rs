//! CLI for the msync mirroring daemon.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use msync_core::config::{self, SyncConfig};
use msync_core::downloader::CurlOptions;
use msync_core::manifest;
use msync_core::synchronizer::Synchronizer;
use std::path::PathBuf;

use commands::{run_daemon, run_once, run_status};

/// Top-level CLI for msync.
#[derive(Debug, Parser)]
#[command(name = "msync")]
#[command(about = "msync: keep a local directory mirroring a remote manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that run a sync cycle. Each overrides config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Manifest source: an http(s) URL or a path to a manifest file.
    #[arg(long, value_name = "SRC")]
    pub manifest: Option<String>,

    /// Destination directory to mirror into.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Maximum concurrent downloads.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the sync loop until interrupted (Ctrl-C).
    Run {
        #[command(flatten)]
        sync: SyncArgs,

        /// Seconds between sync cycles.
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Run a single sync cycle and exit (non-zero if anything failed).
    Once {
        #[command(flatten)]
        sync: SyncArgs,
    },

    /// List the files currently stored in the destination directory.
    Status {
        /// Destination directory to inspect.
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { sync, interval } => {
                if let Some(secs) = interval {
                    cfg.interval_secs = secs;
                }
                let synchronizer = build_synchronizer(&mut cfg, &sync)?;
                run_daemon(synchronizer, cfg.interval()).await?;
            }
            CliCommand::Once { sync } => {
                let synchronizer = build_synchronizer(&mut cfg, &sync)?;
                run_once(synchronizer).await?;
            }
            CliCommand::Status { dest } => {
                let dir = dest.unwrap_or_else(|| cfg.destination_dir.clone());
                run_status(&dir)?;
            }
        }

        Ok(())
    }
}

/// Applies command-line overrides to `cfg` and builds the synchronizer.
fn build_synchronizer(cfg: &mut SyncConfig, args: &SyncArgs) -> Result<Synchronizer> {
    apply_overrides(cfg, args);
    let curl = CurlOptions::from(&*cfg);
    let source = match (&args.manifest, &cfg.manifest) {
        (Some(src), _) => manifest::source_from_str(src, curl),
        (None, Some(manifest_cfg)) => manifest_cfg.to_source(curl),
        (None, None) => {
            let path = config::config_path().context("locating config file")?;
            anyhow::bail!(
                "no manifest source: pass --manifest or add a [manifest] table to {}",
                path.display()
            );
        }
    };
    Ok(Synchronizer::from_config(cfg, source))
}

fn apply_overrides(cfg: &mut SyncConfig, args: &SyncArgs) {
    if let Some(dest) = &args.dest {
        cfg.destination_dir = dest.clone();
    }
    if let Some(jobs) = args.jobs {
        cfg.max_concurrent_downloads = jobs;
    }
}

#[cfg(test)]
mod tests;
