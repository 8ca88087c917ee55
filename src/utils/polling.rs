//! Bounded polling helper for confirmation waits.

use std::future::Future;
use std::time::Duration;

use log::debug;

/// Polls `check` until it yields a value or `max_wait` elapses.
///
/// Returns `Ok(None)` on timeout. Unlike a retry loop, an `Err` from `check`
/// stops polling immediately: confirmation failures must surface to the
/// orchestrator, not be retried away.
pub async fn poll_until<T, E, F, Fut>(
    check: F,
    max_wait: Duration,
    poll_interval: Duration,
    operation_name: &str,
) -> Result<Option<T>, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let start = std::time::Instant::now();

    loop {
        if let Some(value) = check().await? {
            debug!("{} completed after {:?}", operation_name, start.elapsed());
            return Ok(Some(value));
        }

        if start.elapsed() >= max_wait {
            debug!("{} timed out after {:?}", operation_name, max_wait);
            return Ok(None);
        }

        tokio::time::sleep(poll_interval).await;
    }
}
