//! Fixed-size worker pool over a shared queue.
//!
//! Keeps at most `limit` jobs running at once: `min(limit, items)` threads pull
//! from a shared queue until it is empty, and results come back over a channel.
//! Returns only after every item has been processed.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Runs `job` on every item with at most `limit` running concurrently.
/// Results are returned in completion order, paired with their item.
pub(crate) fn run_bounded<T, R, F>(items: Vec<T>, limit: usize, job: F) -> Vec<(T, R)>
where
    T: Send,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let count = items.len();
    if count == 0 {
        return Vec::new();
    }
    let num_workers = limit.max(1).min(count);
    let work: Mutex<VecDeque<T>> = Mutex::new(items.into_iter().collect());
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            let job = &job;
            scope.spawn(move || loop {
                let next = work
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some(item) = next else {
                    break;
                };
                let res = job(&item);
                if tx.send((item, res)).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    rx.into_iter().collect()
}
