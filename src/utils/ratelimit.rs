/// Sliding-window rate limiter for upstream API requests.
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Allows at most `max_requests` within any `window`. The pipeline uses one
/// request per window so chunk requests are spaced out evenly; the wait never
/// grows on failure, matching the upstream's flat per-second ceiling.
pub struct RateLimiter {
    inner: Mutex<Window>,
}

struct Window {
    /// Timestamps of requests inside the current window.
    request_times: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl Window {
    fn check_and_record(&mut self) -> Duration {
        let now = Instant::now();

        // Drop timestamps that have left the window
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) >= self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        // At the limit: wait until the oldest request leaves the window
        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        self.request_times.push_back(now);
        Duration::from_secs(0)
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            inner: Mutex::new(Window {
                request_times: VecDeque::new(),
                max_requests: max_requests.max(1),
                window,
            }),
        }
    }

    /// Wait until a request slot is free, then claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.inner.lock().await;
                window.check_and_record()
            };
            if wait.is_zero() {
                return;
            }
            tracing::debug!("Rate limit: waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}
