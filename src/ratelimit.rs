use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    reset_at_ms: i64,
}

/// Fixed-window request limiter keyed by client address.
///
/// Each key gets `max_requests` per window; a request arriving after the
/// window expired starts a fresh one in place. Entries are only ever
/// overwritten, never swept.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

/// Outcome of a limiter check, with the window end for response headers.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, for a `Retry-After` header.
    pub fn retry_after_secs(&self) -> i64 {
        let remaining_ms = self.reset_at_ms - Utc::now().timestamp_millis();
        ((remaining_ms as f64) / 1000.0).ceil().max(0.0) as i64
    }
}

impl RateLimiter {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, key: &str) -> RateLimitDecision {
        let now = Utc::now().timestamp_millis();
        let mut windows = self.windows.lock().await;

        match windows.get_mut(key) {
            Some(window) if now <= window.reset_at_ms => {
                if window.count >= self.max_requests {
                    return RateLimitDecision {
                        allowed: false,
                        reset_at_ms: window.reset_at_ms,
                    };
                }
                window.count += 1;
                RateLimitDecision {
                    allowed: true,
                    reset_at_ms: window.reset_at_ms,
                }
            }
            _ => {
                let reset_at_ms = now + self.window.as_millis() as i64;
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_at_ms,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    reset_at_ms,
                }
            }
        }
    }
}
