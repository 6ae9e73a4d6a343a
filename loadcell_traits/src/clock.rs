use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source for the polling reader and the periodic trigger.
///
/// `sleep` may be simulated; `ms_since` saturates at 0.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        dur.as_millis().min(u128::from(u64::MAX)) as u64
    }

    /// Deadline `timeout` from now, saturating far in the future on overflow.
    fn deadline(&self, timeout: Duration) -> Instant {
        let now = self.now();
        now.checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(u32::MAX as u64))
    }
}

/// Real-time monotonic clock backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

#[cfg(any(test, feature = "test-clock"))]
pub mod test_clock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock: `now() = origin + offset`.
    ///
    /// `sleep(d)` advances the offset instead of blocking. With a non-zero
    /// `step`, every `now()` call also advances time by `step`, so busy-wait
    /// loops against a deadline terminate without real waiting.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        offset: Arc<Mutex<Duration>>,
        step: Duration,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self::with_step(Duration::ZERO)
        }

        pub fn with_step(step: Duration) -> Self {
            Self {
                origin: Instant::now(),
                offset: Arc::new(Mutex::new(Duration::ZERO)),
                step,
            }
        }

        pub fn advance(&self, d: Duration) {
            if let Ok(mut off) = self.offset.lock() {
                *off = off.saturating_add(d);
            }
        }

        /// Time elapsed since the clock was created.
        pub fn elapsed(&self) -> Duration {
            self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            let off = match self.offset.lock() {
                Ok(mut g) => {
                    let cur = *g;
                    *g = g.saturating_add(self.step);
                    cur
                }
                Err(_) => Duration::ZERO,
            };
            self.origin + off
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }

}
