use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use backoff::{future::retry, ExponentialBackoff};
use log::warn;

/// Send a request, retrying transient transport failures up to `retry_times` extra times.
///
/// With `retry_times == 0` the request is attempted exactly once.
pub async fn retry_transient<I, F, Fut>(retry_times: usize, f: F) -> reqwest::Result<I>
where
    F: Fn() -> Fut,
    Fut: Future<Output = reqwest::Result<I>>,
{
    let attempts = AtomicUsize::new(0);
    retry(backoff_config(), || async {
        let attempt = attempts.fetch_add(1, Ordering::AcqRel) + 1;
        if attempt > 1 {
            warn!("retrying lookup, attempt {}", attempt);
        }
        f().await
            .map_err(|err| map_to_backoff_err(err, attempt, retry_times))
    })
        .await
}

fn map_to_backoff_err(err: reqwest::Error, attempt: usize, retry_times: usize) -> backoff::Error<reqwest::Error> {
    if attempt > retry_times || !is_transient(&err) {
        backoff::Error::permanent(err)
    } else {
        backoff::Error::transient(err)
    }
}

/// connect errors, timeouts and server-side statuses may succeed on a second try
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.status().is_some_and(|status| status.is_server_error())
}

#[inline]
fn backoff_config() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_millis(4000),
        max_elapsed_time: Some(Duration::from_secs(30)),
        ..Default::default()
    }
}
