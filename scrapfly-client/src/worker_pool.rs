//! Worker pool for concurrent processing with backpressure.
//!
//! Spawns N persistent tokio tasks that pull work items from a bounded
//! async-channel. Results are sent to an unbounded channel for consumption
//! by the caller.
//!
//! Uses `async-channel` for work distribution: its `Receiver` is `Clone`,
//! so each worker gets its own handle with no `Mutex` needed.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks that process items concurrently.
///
/// Workers are spawned as persistent tokio tasks that pull from a bounded
/// work channel. This provides:
/// - Natural backpressure when all workers are busy
/// - Clean shutdown by dropping the work sender
/// - Single concurrency control point (worker count)
///
/// Every submitted item yields exactly one result. Bound the run time of
/// `process_fn` itself; the pool never abandons an item.
///
/// # Example
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, items, |item| async move {
///     process(item).await
/// });
///
/// while let Some(result) = pool.recv().await {
///     handle(result);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn N workers, submit all items, and return a pool for receiving results.
    ///
    /// Items are submitted via a bounded channel (capacity N) in their original
    /// order. Each worker pulls items one at a time and invokes `process_fn`.
    /// Results are available via [`recv()`](Self::recv) in completion order.
    ///
    /// `n` is raised to 1 if zero. Must be called from within a tokio runtime.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let n = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(n);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|worker| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        if result_tx.send(process_fn(item).await).is_err() {
                            log::debug!("Worker pool: receiver dropped, worker {worker} exiting");
                            break;
                        }
                    }
                })
            })
            .collect();

        // The result channel closes once the last worker drops its sender.
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
            // work_tx dropped here: workers drain the remaining items, then stop.
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Receive the next result. Returns `None` when all items have been
    /// processed and all workers have shut down.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }
}

#[cfg(test)]
#[path = "tests/worker_pool_tests.rs"]
mod tests;
