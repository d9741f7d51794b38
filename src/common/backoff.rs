use rand::Rng;
use std::time::Duration;

/// Exponential backoff schedule with jitter, used by the retry helper and
/// the job polling loop. Each orchestration unit owns its own instance;
/// no locking involved.
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    stable_delay: Option<Duration>,
    multiplier: f64,
    jitter: bool,
    current_delay: Duration,
    reached_max: bool,
}

impl ExponentialBackoff {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self::with_options(initial_delay, max_delay, None, 1.5, true)
    }

    /// `stable_delay`, when set, replaces the capped value once the schedule
    /// has reached `max_delay`, giving the long-run cadence its own knob.
    pub fn with_options(
        initial_delay: Duration,
        max_delay: Duration,
        stable_delay: Option<Duration>,
        multiplier: f64,
        jitter: bool,
    ) -> Self {
        Self {
            initial_delay,
            max_delay,
            stable_delay,
            multiplier,
            jitter,
            current_delay: initial_delay,
            reached_max: false,
        }
    }

    /// Next delay to sleep for. Advances the internal schedule.
    pub fn next_delay(&mut self) -> Duration {
        let base = if self.reached_max {
            self.stable_delay.unwrap_or(self.current_delay)
        } else {
            self.current_delay
        };

        let mut delay = base.as_secs_f64();
        if self.jitter {
            // ±25% of the computed delay
            let jitter_range = delay * 0.25;
            delay += rand::rng().random_range(-jitter_range..=jitter_range);
        }

        if !self.reached_max {
            let next = self.current_delay.as_secs_f64() * self.multiplier;
            self.current_delay = Duration::from_secs_f64(next.min(self.max_delay.as_secs_f64()));
            if self.current_delay >= self.max_delay {
                self.reached_max = true;
            }
        }

        Duration::from_secs_f64(delay.max(0.0))
    }

    pub fn reset(&mut self) {
        self.current_delay = self.initial_delay;
        self.reached_max = false;
    }
}
