//! Periodic driver: runs reconciliation cycles on a fixed interval.
//!
//! Cycles run on tokio's blocking pool because downloads use blocking curl
//! handles and worker threads. A failed cycle is logged and the next one runs
//! after the usual interval; nothing is retried early.

use anyhow::Result;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::synchronizer::{CycleReport, Synchronizer};
use crate::url_model::FileName;

/// Runs exactly one cycle on a blocking thread.
pub async fn run_once(sync: Arc<Synchronizer>) -> Result<CycleReport> {
    let report = tokio::task::spawn_blocking(move || sync.run_cycle())
        .await
        .map_err(|e| anyhow::anyhow!("sync cycle task join: {}", e))??;
    Ok(report)
}

/// Lists stored files on a blocking thread.
pub async fn stored_files(sync: Arc<Synchronizer>) -> Result<BTreeSet<FileName>> {
    let files = tokio::task::spawn_blocking(move || sync.load_stored_files())
        .await
        .map_err(|e| anyhow::anyhow!("listing task join: {}", e))??;
    Ok(files)
}

/// Runs cycles every `interval` until `shutdown` resolves. Returns the number of cycles run.
///
/// Shutdown is observed between cycles; a cycle in progress always completes.
/// Fails only if the destination directory cannot be prepared at startup.
pub async fn run<F>(sync: Arc<Synchronizer>, interval: Duration, shutdown: F) -> Result<u64>
where
    F: Future<Output = ()>,
{
    let previous = stored_files(Arc::clone(&sync)).await?;
    log_stored_files("loaded stored files from the previous start-up", &previous);
    tracing::info!(
        source = %sync.source_label(),
        dir = %sync.directory().path().display(),
        interval_secs = interval.as_secs(),
        max_concurrent = sync.max_concurrent(),
        "sync daemon started"
    );

    tokio::pin!(shutdown);
    let mut cycles = 0u64;
    loop {
        match run_once(Arc::clone(&sync)).await {
            Ok(report) => log_cycle_report(&report),
            Err(e) => tracing::error!("sync cycle failed, retrying next interval: {:#}", e),
        }
        cycles += 1;

        match stored_files(Arc::clone(&sync)).await {
            Ok(files) => log_stored_files("stored files", &files),
            Err(e) => tracing::warn!("could not list stored files: {:#}", e),
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(cycles, "shutdown requested; stopping sync daemon");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
    Ok(cycles)
}

/// Starts `listener` on its own task right away and returns a future that
/// resolves once it has fired.
///
/// Signal listeners such as `tokio::signal::ctrl_c` only register when first
/// polled, so they must run before the first cycle rather than inside `run`.
/// If the listener fails, the error is logged and the returned future never
/// resolves. Must be called from within a tokio runtime.
pub fn spawn_shutdown_listener<L>(listener: L) -> impl Future<Output = ()> + Send + 'static
where
    L: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        match listener.await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                tracing::warn!("could not listen for shutdown signal: {}", e);
                // Holding `tx` keeps the receiver pending.
                std::future::pending::<()>().await;
                drop(tx);
            }
        }
    });
    async move {
        let _ = rx.await;
    }
}

/// Logs the summary line and every failure of a cycle.
pub fn log_cycle_report(report: &CycleReport) {
    for failure in &report.download_failures {
        tracing::warn!(url = %failure.location, "not downloaded: {}", failure.error);
    }
    for failure in &report.cleanup.failed {
        tracing::warn!(file = %failure.name, "not removed: {}", failure.source);
    }
    tracing::info!(
        desired = report.desired,
        downloaded = report.downloaded.len(),
        failed = report.download_failures.len(),
        removed = report.cleanup.removed.len(),
        "sync cycle finished"
    );
}

fn log_stored_files(what: &str, files: &BTreeSet<FileName>) {
    let names: Vec<&str> = files.iter().map(FileName::as_str).collect();
    tracing::info!(count = files.len(), "{}: {}", what, names.join(", "));
}
