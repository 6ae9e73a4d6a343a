//! Interrupt-free, blocking variant: wait (bounded) for data-ready, then read.
//!
//! This does not touch any moving-average state; it returns single raw
//! conversions. When the wait times out the frame is still clocked out and
//! returned as-is: the device gives no integrity check, so the caller gets
//! whatever the bus yields.
use std::time::Duration;

use loadcell_traits::{ADS1230_PROFILE, Ads1230Port, BoxError, BusProfile, Clock, MonotonicClock, Scale};
use tracing::debug;

use crate::error::CoreError;
use crate::hw_error::map_port_error;
use crate::reader::{decode_frame, read_frame};

/// Default bound on the data-ready wait.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(120);

/// Result of a blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolledSample {
    pub value: i32,
    /// False when the wait timed out and the frame was read regardless.
    pub ready_seen: bool,
}

pub struct PollingScale<P, C = MonotonicClock> {
    port: P,
    clock: C,
    profile: BusProfile,
    poll_interval: Duration,
}

impl<P: Ads1230Port> PollingScale<P> {
    pub fn new(port: P) -> Self {
        Self::with_clock(port, MonotonicClock::new())
    }
}

impl<P: Ads1230Port, C: Clock> PollingScale<P, C> {
    pub fn with_clock(port: P, clock: C) -> Self {
        Self {
            port,
            clock,
            profile: ADS1230_PROFILE,
            poll_interval: Duration::from_micros(200),
        }
    }

    pub fn with_profile(mut self, profile: BusProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_poll_interval(mut self, d: Duration) -> Self {
        self.poll_interval = d;
        self
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Wait up to `timeout` for data-ready, then clock out one conversion.
    pub fn read_blocking(&mut self, timeout: Duration) -> Result<PolledSample, CoreError> {
        self.port
            .select(&self.profile)
            .map_err(|e| map_port_error(e.as_ref()))?;
        let result = self.wait_and_read(timeout);
        let released = self.port.deselect().map_err(|e| map_port_error(e.as_ref()));
        let sample = result?;
        released?;
        Ok(sample)
    }

    fn wait_and_read(&mut self, timeout: Duration) -> Result<PolledSample, CoreError> {
        let deadline = self.clock.deadline(timeout);
        let ready_seen = loop {
            if self.port.data_ready().map_err(|e| map_port_error(e.as_ref()))? {
                break true;
            }
            if self.clock.now() >= deadline {
                debug!(?timeout, "ads1230 data-ready timeout, reading anyway");
                break false;
            }
            self.clock.sleep(self.poll_interval);
        };
        let value = decode_frame(read_frame(&mut self.port)?);
        Ok(PolledSample { value, ready_seen })
    }
}

impl<P: Ads1230Port, C: Clock> Scale for PollingScale<P, C> {
    fn read(&mut self, timeout: Duration) -> Result<i32, BoxError> {
        Ok(self.read_blocking(timeout)?.value)
    }
}
