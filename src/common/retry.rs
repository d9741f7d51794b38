use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::common::backoff::ExponentialBackoff;

/// Run `op` until it succeeds or `max_retries` extra attempts are spent
/// (total attempts = `max_retries + 1`), sleeping per a fresh backoff
/// schedule between attempts. Returns the last error on exhaustion.
///
/// Every failure is treated as retryable; callers that can classify
/// terminal errors should not route them through here.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut op: F,
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut backoff = ExponentialBackoff::new(initial_delay, max_delay);
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                warn!("Attempt {} failed: {}", attempt, e);

                if attempt > max_retries {
                    error!("All {} attempts failed", attempt);
                    return Err(e);
                }

                let delay = backoff.next_delay();
                info!("Retrying in {:.2}s...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }
    }
}
