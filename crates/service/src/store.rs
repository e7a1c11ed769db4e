//! Latency accounting for relational and blob store calls.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

/// Await `fut`, logging its latency under `service::store` and feeding the store histogram.
pub async fn timed<F, T>(op: &'static str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed().as_secs_f64();
    debug!(target: "service::store", store_op = op, elapsed_ms = elapsed * 1000.0, "store call finished");
    common::metrics::observe_store_op(op, elapsed);
    out
}
