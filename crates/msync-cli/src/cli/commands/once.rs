//! `msync once` – run a single sync cycle.

use anyhow::Result;
use msync_core::daemon;
use msync_core::synchronizer::Synchronizer;
use std::sync::Arc;

pub async fn run_once(sync: Synchronizer) -> Result<()> {
    let report = daemon::run_once(Arc::new(sync)).await?;
    daemon::log_cycle_report(&report);

    println!(
        "{} in manifest, {} downloaded, {} removed.",
        report.desired,
        report.downloaded.len(),
        report.cleanup.removed.len()
    );
    for failure in &report.download_failures {
        println!("  failed: {}", failure);
    }
    for failure in &report.cleanup.failed {
        println!("  not removed: {}", failure);
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} download(s) and {} removal(s) failed",
            report.download_failures.len(),
            report.cleanup.failed.len()
        );
    }
    Ok(())
}
