use tokio::time::interval;
use tracing::info;

use crate::state::AppState;

/// Periodically drop terminal jobs older than the configured age.
/// Non-terminal jobs survive the sweep; their poller still owns them.
pub async fn start_eviction_worker(state: AppState) {
    info!(
        "Starting job eviction worker (every {}s, max age {}s)",
        state.config.eviction_interval.as_secs(),
        state.config.job_max_age.as_secs()
    );

    let mut ticker = interval(state.config.eviction_interval);
    // The first tick completes immediately; skip it so the initial sweep
    // happens one full interval after startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let removed = state.registry.evict_older_than(state.config.job_max_age);
        if removed > 0 {
            info!("Cleaned up {} old jobs", removed);
        }
    }
}
