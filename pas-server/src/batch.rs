//! Sequential batches of concurrent async work.
//!
//! Geocoding a unit list fans out one request per unit. Running them in
//! fixed-size batches keeps at most `batch_size` requests outstanding, so
//! the provider is not flooded.

use std::future::Future;

use futures::future::join_all;
use tracing::trace;

/// Default number of items processed concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Apply `f` to every item, `batch_size` items at a time.
///
/// Items in a batch run concurrently; a batch starts only after the
/// previous one has fully completed. The output is aligned 1:1 with the
/// input regardless of completion order. `f` reports per-item failure in
/// its output value (typically `None`), so one failure never stops the
/// rest. A `batch_size` of 0 is treated as 1.
pub async fn process_in_batches<T, R, F, Fut>(items: Vec<T>, batch_size: usize, mut f: F) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = batch_size.max(1);
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    let mut items = items.into_iter();

    let mut batch_no = 0;
    loop {
        let batch: Vec<Fut> = items.by_ref().take(batch_size).map(&mut f).collect();
        if batch.is_empty() {
            break;
        }

        trace!(batch = batch_no, size = batch.len(), total, "running batch");
        results.extend(join_all(batch).await);
        batch_no += 1;
    }

    results
}
