use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Bounds the number of in-flight requests against one service and lets any caller hold back
/// new requests for a while, typically after the service reported a rate limit.
///
/// Overlapping pauses do not shorten each other: the latest deadline wins.
#[derive(Debug)]
pub struct Throttler {
    slots: Arc<Semaphore>,
    paused_until: Mutex<Option<Instant>>,
}

impl Throttler {
    /// Create a throttler allowing at most `max_in_flight` concurrent holders.
    #[must_use]
    pub fn new(max_in_flight: usize) -> Arc<Self> {
        Arc::new(Self {
            slots: Arc::new(Semaphore::new(max_in_flight.max(1))),
            paused_until: Mutex::new(None),
        })
    }

    /// Wait out any active pause, then take a slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        while let Some(deadline) = self.pause_deadline() {
            tokio::time::sleep_until(deadline).await;
        }

        Arc::clone(&self.slots).acquire_owned().await.ok()
    }

    /// Hold back new acquisitions for `duration`. In-flight holders are not affected.
    ///
    /// Returns `false` when an existing pause already lasts at least as long.
    pub fn pause_for(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut paused_until = self.paused_until.lock().unwrap_or_else(PoisonError::into_inner);
        if paused_until.is_some_and(|current| current >= deadline) {
            return false;
        }

        *paused_until = Some(deadline);
        true
    }

    /// Returns whether new acquisitions are currently held back.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause_deadline().is_some()
    }

    fn pause_deadline(&self) -> Option<Instant> {
        let mut paused_until = self.paused_until.lock().unwrap_or_else(PoisonError::into_inner);
        match *paused_until {
            Some(deadline) if deadline > Instant::now() => Some(deadline),
            Some(_) => {
                *paused_until = None;
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_limits_in_flight_requests() {
        let throttler = Throttler::new(2);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let throttler = Arc::clone(&throttler);
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _slot = throttler.acquire().await;
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    let _ = peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    let _ = active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        let _ = futures_util::future::join_all(tasks).await;
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_pause_delays_acquisition() {
        let throttler = Throttler::new(4);
        assert!(throttler.pause_for(Duration::from_millis(200)));
        assert!(throttler.is_paused());

        let start = Instant::now();
        let slot = throttler.acquire().await;
        assert!(slot.is_some());
        assert!(start.elapsed() >= Duration::from_millis(150));
        assert!(!throttler.is_paused());
    }

    #[tokio::test]
    async fn test_shorter_pause_does_not_override_longer() {
        let throttler = Throttler::new(1);
        assert!(throttler.pause_for(Duration::from_secs(5)));
        assert!(!throttler.pause_for(Duration::from_millis(10)));
        assert!(throttler.pause_for(Duration::from_secs(10)));
    }
}
