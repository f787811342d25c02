//! Fixed-delay retry for document fetches.
//!
//! Each stage picks which failures are worth another attempt via
//! [`RetryOn`]: the regulator stage only retries transport failures, the
//! other stages retry everything.

use std::future::Future;
use std::time::Duration;

use stationdb_core::RetryOn;

use crate::error::FetchError;

/// Returns `true` if `err` should be retried under `policy`.
///
/// Invalid URLs and client construction failures are never retried.
fn is_retriable(err: &FetchError, policy: RetryOn) -> bool {
    match err {
        FetchError::InvalidUrl { .. } | FetchError::ClientBuild(_) => false,
        _ => match policy {
            RetryOn::AnyFailure => true,
            RetryOn::TransportErrors => err.is_transport(),
        },
    }
}

/// Executes `operation` up to `1 + max_retries` times, sleeping `delay`
/// before every retry.
///
/// On success returns the value together with the number of attempts made.
/// Non-retriable errors are returned immediately; after the last attempt the
/// last error is returned.
pub(crate) async fn retry_with_fixed_delay<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    policy: RetryOn,
    mut operation: F,
) -> Result<(T, u32), FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;

    loop {
        let err = match operation(attempt).await {
            Ok(value) => return Ok((value, attempt)),
            Err(err) => err,
        };

        if attempt > max_retries || !is_retriable(&err, policy) {
            return Err(err);
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "fetch failed, retrying after fixed delay"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
