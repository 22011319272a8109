//! Strictly sequential execution of deferred network operations.
//!
//! The federation site publishes no concurrency limits, so each batch of
//! page fetches runs one request at a time: a step only starts once the
//! previous one has resolved, and the first failure stops the batch.

use std::future::Future;
use tracing::debug;

/// Runs `tasks` one after another, in order.
///
/// On success the results come back in input order. On the first failure
/// no further task is started and that error is returned; results of the
/// steps that already completed are discarded.
pub async fn run_serial<T, E, F, Fut>(tasks: impl IntoIterator<Item = F>) -> Result<Vec<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tasks = tasks.into_iter();
    let mut results = Vec::with_capacity(tasks.size_hint().0);

    for (step, task) in tasks.enumerate() {
        debug!("Running serial step {}", step + 1);
        results.push(task().await?);
    }

    Ok(results)
}

/// Applies `op` to each item sequentially, see [`run_serial`].
pub async fn map_serial<I, T, E, F, Fut>(items: I, mut op: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);

    for (step, item) in items.enumerate() {
        debug!("Running serial step {}", step + 1);
        results.push(op(item).await?);
    }

    Ok(results)
}
