//! `msync run` – run sync cycles on an interval until Ctrl-C.

use anyhow::Result;
use msync_core::daemon;
use msync_core::logging;
use msync_core::synchronizer::Synchronizer;
use std::sync::Arc;
use std::time::Duration;

pub async fn run_daemon(sync: Synchronizer, interval: Duration) -> Result<()> {
    // Listen before the first cycle so Ctrl-C never interrupts a transfer.
    let shutdown = daemon::spawn_shutdown_listener(tokio::signal::ctrl_c());

    println!(
        "Mirroring {} into {} every {}s ({} concurrent downloads). Press Ctrl-C to stop.",
        sync.source_label(),
        sync.directory().path().display(),
        interval.as_secs(),
        sync.max_concurrent()
    );
    if let Ok(path) = logging::log_file_path() {
        println!("Logging to {}", path.display());
    }

    let cycles = daemon::run(Arc::new(sync), interval, shutdown).await?;
    println!("Stopped after {} cycle(s).", cycles);
    Ok(())
}
