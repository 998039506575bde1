use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Enforces a minimum gap between consecutive remote requests.
///
/// Callers block in `wait` until the gap since the previous request has
/// elapsed. A zero interval disables throttling.
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until a request may be sent, then record it. Returns how long
    /// the caller was held back.
    pub fn wait(&self) -> Duration {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let delay = match *last {
            Some(previous) if !self.min_interval.is_zero() => {
                self.min_interval.saturating_sub(previous.elapsed())
            }
            _ => Duration::ZERO,
        };

        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Throttling geocode request");
            std::thread::sleep(delay);
        }

        *last = Some(Instant::now());
        delay
    }
}
