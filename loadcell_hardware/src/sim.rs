//! Software ADS1230 for running the acquisition stack without a board.
use loadcell_traits::{Ads1230Port, BoxError, BusProfile, encode_frame};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use tracing::debug;

use crate::error::HwError;

#[derive(Debug, Default)]
struct Shared {
    raw: AtomicI32,
    calibrations: AtomicU32,
    conversions: AtomicU32,
    fault: AtomicBool,
}

/// Cloneable control handle for a [`SimulatedAds1230`] that lives on another
/// thread (e.g. inside a running sampler).
#[derive(Debug, Clone)]
pub struct SimHandle(Arc<Shared>);

impl SimHandle {
    /// Set the conversion result the device will report next.
    pub fn set_raw(&self, value: i32) {
        self.0.raw.store(value, Ordering::Relaxed);
    }

    /// Number of offset self-calibrations triggered so far.
    pub fn calibrations(&self) -> u32 {
        self.0.calibrations.load(Ordering::Relaxed)
    }

    /// Number of conversions clocked out (calibration cycles included).
    pub fn conversions(&self) -> u32 {
        self.0.conversions.load(Ordering::Relaxed)
    }

    /// Make every byte transfer fail until cleared.
    pub fn set_fault(&self, on: bool) {
        self.0.fault.store(on, Ordering::Relaxed);
    }
}

/// Simulated ADS1230: reports data-ready every `ready_every` polls and counts
/// clocks beyond the 24 data bits as an offset calibration request.
#[derive(Debug)]
pub struct SimulatedAds1230 {
    shared: Arc<Shared>,
    ready_every: u32,
    polls: u32,
    frame: [u8; 3],
    clocked: usize,
    selected: bool,
}

impl SimulatedAds1230 {
    pub fn new(raw: i32) -> Self {
        let shared = Arc::new(Shared::default());
        shared.raw.store(raw, Ordering::Relaxed);
        Self {
            shared,
            ready_every: 1,
            polls: 0,
            frame: [0; 3],
            clocked: 0,
            selected: false,
        }
    }

    /// Only report ready on every `n`th poll (models a device slower than the
    /// trigger). `0` means never ready.
    pub fn with_ready_every(mut self, n: u32) -> Self {
        self.ready_every = n;
        self
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle(self.shared.clone())
    }
}

impl Default for SimulatedAds1230 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Ads1230Port for SimulatedAds1230 {
    fn select(&mut self, _profile: &BusProfile) -> Result<(), BoxError> {
        self.selected = true;
        self.clocked = 0;
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, BoxError> {
        if !self.selected || self.ready_every == 0 {
            return Ok(false);
        }
        self.polls = self.polls.wrapping_add(1);
        let ready = self.polls % self.ready_every == 0;
        if ready {
            self.frame = encode_frame(self.shared.raw.load(Ordering::Relaxed));
        }
        Ok(ready)
    }

    fn transfer(&mut self) -> Result<u8, BoxError> {
        if self.shared.fault.load(Ordering::Relaxed) {
            return Err(HwError::SimulatedFault.into());
        }
        let byte = self.frame.get(self.clocked).copied().unwrap_or(0xFF);
        self.clocked += 1;
        Ok(byte)
    }

    fn deselect(&mut self) -> Result<(), BoxError> {
        if self.clocked >= 3 {
            self.shared.conversions.fetch_add(1, Ordering::Relaxed);
        }
        if self.clocked > 3 {
            self.shared.calibrations.fetch_add(1, Ordering::Relaxed);
            debug!(clocks = self.clocked * 8, "simulated offset calibration");
        }
        self.selected = false;
        self.clocked = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcell_traits::ADS1230_PROFILE;

    #[test]
    fn not_ready_until_selected() {
        let mut sim = SimulatedAds1230::new(5);
        assert!(!sim.data_ready().unwrap());
        sim.select(&ADS1230_PROFILE).unwrap();
        assert!(sim.data_ready().unwrap());
    }

    #[test]
    fn ready_every_paces_conversions() {
        let mut sim = SimulatedAds1230::new(5).with_ready_every(3);
        sim.select(&ADS1230_PROFILE).unwrap();
        let pattern: Vec<bool> = (0..6).map(|_| sim.data_ready().unwrap()).collect();
        assert_eq!(pattern, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn extra_byte_counts_as_calibration() {
        let mut sim = SimulatedAds1230::new(5);
        let h = sim.handle();
        sim.select(&ADS1230_PROFILE).unwrap();
        assert!(sim.data_ready().unwrap());
        for _ in 0..4 {
            sim.transfer().unwrap();
        }
        sim.deselect().unwrap();
        assert_eq!(h.calibrations(), 1);
        assert_eq!(h.conversions(), 1);
    }

    #[test]
    fn fault_fails_transfers() {
        let mut sim = SimulatedAds1230::new(5);
        sim.handle().set_fault(true);
        sim.select(&ADS1230_PROFILE).unwrap();
        assert!(sim.transfer().is_err());
    }
}
