//! Hosted stand-in for the timer interrupt.
//!
//! Moves a [`Scheduler`] onto one background thread that receives a
//! `crossbeam_channel::tick` at the counter-overflow period and feeds it to
//! [`Scheduler::on_overflow`]. Application code keeps its `Arc<LoadCell>`
//! handles and polls them while the thread acquires.
//!
//! Each `Sampler` owns exactly one thread; dropping it signals shutdown and
//! joins, so threads never leak.
use crossbeam_channel as xch;
use loadcell_traits::Ads1230Port;
use loadcell_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::ring::MAX_SAMPLES;
use crate::scheduler::Scheduler;

pub struct Sampler<P, const N: usize = MAX_SAMPLES> {
    last_tick: Arc<AtomicU64>,
    ticks: Arc<AtomicU64>,
    epoch: Instant,
    /// Dropping the sender wakes the thread's `select!` and stops it.
    shutdown: Option<xch::Sender<()>>,
    join_handle: Option<JoinHandle<Scheduler<P, N>>>,
}

impl<P, const N: usize> Sampler<P, N>
where
    P: Ads1230Port + Send + 'static,
{
    pub fn spawn<C: Clock + Send + 'static>(mut scheduler: Scheduler<P, N>, clock: C) -> Self {
        let (shutdown_tx, shutdown_rx) = xch::bounded::<()>(0);
        let last_tick = Arc::new(AtomicU64::new(0));
        let last_tick_clone = last_tick.clone();
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_clone = ticks.clone();
        let timer = scheduler.timer();
        let overflow = Duration::from_micros(u64::from(timer.overflow_us.max(1)));
        let epoch = clock.now();

        tracing::info!(
            cells = scheduler.len(),
            overflow_us = timer.overflow_us,
            rate_hz = timer.effective_rate_hz(),
            "sampler starting"
        );

        let join_handle = std::thread::spawn(move || {
            let ticker = xch::tick(overflow);
            loop {
                xch::select! {
                    recv(shutdown_rx) -> _ => {
                        tracing::debug!("Sampler thread received shutdown signal");
                        break;
                    }
                    recv(ticker) -> _ => {
                        if scheduler.on_overflow() {
                            ticks_clone.fetch_add(1, Ordering::Relaxed);
                            last_tick_clone.store(clock.ms_since(epoch), Ordering::Relaxed);
                        }
                    }
                }
            }
            tracing::trace!("Sampler thread exiting cleanly");
            scheduler
        });

        Self {
            last_tick,
            ticks,
            epoch,
            shutdown: Some(shutdown_tx),
            join_handle: Some(join_handle),
        }
    }
}

impl<P, const N: usize> Sampler<P, N> {
    /// Acquisition ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Milliseconds between the last completed tick and `now_ms` (both
    /// measured from the sampler's epoch).
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_tick.load(Ordering::Relaxed))
    }

    /// Convenience helper: stall time against the real monotonic clock.
    pub fn stalled_for_now(&self) -> u64 {
        let ms = Instant::now().saturating_duration_since(self.epoch).as_millis();
        self.stalled_for(ms.min(u128::from(u64::MAX)) as u64)
    }

    /// Stop acquisition and hand the scheduler back. `None` only if the
    /// thread panicked.
    pub fn stop(mut self) -> Option<Scheduler<P, N>> {
        self.shutdown.take();
        let handle = self.join_handle.take()?;
        match handle.join() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(?e, "Sampler thread panicked");
                None
            }
        }
    }
}

impl<P, const N: usize> Drop for Sampler<P, N> {
    fn drop(&mut self) {
        self.shutdown.take();
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(_) => {
                    tracing::trace!("Sampler thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "Sampler thread panicked during shutdown");
                }
            }
        }
    }
}
