// Paces outbound classifier calls to respect the provider's QPS cap.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces calls at least `min_interval` apart. Callers reserve the next
/// free slot under the lock and sleep outside it, so a sleeping waiter
/// never blocks the reservation path for the ones behind it.
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Limiter for a requests-per-second budget.
    pub fn per_second(requests: u32) -> Self {
        let requests = requests.max(1);
        Self::new(Duration::from_secs(1) / requests)
    }

    /// Waits until this caller's slot comes up.
    pub async fn acquire(&self) {
        let wait = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot.saturating_duration_since(now)
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
