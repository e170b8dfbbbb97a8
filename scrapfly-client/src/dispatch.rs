//! Concurrent dispatch of a batch of operations.
//!
//! Configs are handed to a [`WorkerPool`] in submission order; outcomes come
//! back in completion order, each tagged with the index of its config. Every
//! config produces exactly one outcome, and the stream ends only after the
//! last one.
//!
//! ```ignore
//! let client = Arc::new(ScrapflyClient::new(ClientConfig::load()?)?);
//! let mut batch = dispatch(client, configs, 5);
//! while let Some(outcome) = batch.recv().await {
//!     match outcome.result {
//!         Ok(result) => println!("{} -> {}", outcome.index, result.upstream_status()),
//!         Err(e) if e.is(ErrorKind::TooManyRequests) => { /* back off */ }
//!         Err(e) => eprintln!("{}: {e}", outcome.config.url),
//!     }
//! }
//! ```

use std::sync::Arc;

use futures::Stream;
use scrapfly_core::{ApiOperation, ScrapflyError};

use crate::cancel::CancelToken;
use crate::client::ScrapflyClient;
use crate::transport::Transport;
use crate::worker_pool::WorkerPool;

/// Result of one dispatched config.
#[derive(Debug)]
pub struct DispatchOutcome<C, O> {
    /// Position of `config` in the submitted batch.
    pub index: usize,
    pub config: C,
    pub result: Result<O, ScrapflyError>,
}

impl<C, O> DispatchOutcome<C, O> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Receiving end of a dispatched batch.
pub struct Dispatch<C, O>
where
    C: Send + 'static,
    O: Send + 'static,
{
    pool: WorkerPool<DispatchOutcome<C, O>>,
    total: usize,
}

impl<C, O> Dispatch<C, O>
where
    C: Send + 'static,
    O: Send + 'static,
{
    /// Next outcome in completion order. `None` once every config has
    /// reported.
    pub async fn recv(&mut self) -> Option<DispatchOutcome<C, O>> {
        self.pool.recv().await
    }

    /// Number of configs in the batch.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Consume the batch as a [`Stream`] of outcomes.
    pub fn into_stream(self) -> impl Stream<Item = DispatchOutcome<C, O>> {
        futures::stream::unfold(self, |mut batch| async move {
            batch.recv().await.map(|outcome| (outcome, batch))
        })
    }

    /// Wait for every outcome and return them in submission order.
    pub async fn collect_ordered(mut self) -> Vec<DispatchOutcome<C, O>> {
        let mut outcomes = Vec::with_capacity(self.total);
        while let Some(outcome) = self.recv().await {
            outcomes.push(outcome);
        }
        outcomes.sort_by_key(|o| o.index);
        outcomes
    }
}

/// Worker count for a batch: 0 means one worker per config, and there are
/// never more workers than configs.
pub fn effective_concurrency(concurrency: usize, total: usize) -> usize {
    if concurrency == 0 {
        total
    } else {
        concurrency.min(total)
    }
}

/// Run `configs` through `client` with at most `concurrency` requests in
/// flight. Must be called from within a tokio runtime.
pub fn dispatch<T, C>(
    client: Arc<ScrapflyClient<T>>,
    configs: Vec<C>,
    concurrency: usize,
) -> Dispatch<C, C::Output>
where
    T: Transport,
    C: ApiOperation,
{
    dispatch_with_cancel(client, configs, concurrency, CancelToken::new())
}

/// [`dispatch`] with a cancellation token.
///
/// After `cancel` fires no new request is sent. Queued configs and requests
/// in flight report a cancellation error, so each config still yields
/// exactly one outcome.
pub fn dispatch_with_cancel<T, C>(
    client: Arc<ScrapflyClient<T>>,
    configs: Vec<C>,
    concurrency: usize,
    cancel: CancelToken,
) -> Dispatch<C, C::Output>
where
    T: Transport,
    C: ApiOperation,
{
    let total = configs.len();
    let workers = effective_concurrency(concurrency, total);
    log::debug!("Dispatching {total} {} request(s) with {workers} worker(s)", C::KIND);

    let items: Vec<(usize, C)> = configs.into_iter().enumerate().collect();
    let pool = WorkerPool::start(workers, items, move |(index, config): (usize, C)| {
        let client = client.clone();
        let cancel = cancel.clone();
        async move {
            let result = client.execute_with_cancel(&config, &cancel).await;
            DispatchOutcome {
                index,
                config,
                result,
            }
        }
    });

    Dispatch { pool, total }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
