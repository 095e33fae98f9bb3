//! Minimum spacing between requests to one site.
//!
//! The scraping adapters share a single host each and must not hit it more
//! than about once a second. Callers `wait()` before every request; concurrent
//! callers queue behind the lock, so spacing holds across tasks too.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Default spacing for public court and legislature sites
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep until at least `interval` has passed since the previous request
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready = previous + self.interval;
            if ready > Instant::now() {
                sleep_until(ready).await;
            }
        }
        *last = Some(Instant::now());
    }
}
