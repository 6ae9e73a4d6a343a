//! Validating builder for `LoadCell`.
//!
//! `try_build()` checks that capacity and sensitivity were provided and are
//! usable. The window is never rejected: out-of-range requests are clamped.

use crate::cell::LoadCell;
use crate::error::{BuildError, Result};
use crate::ring::{MAX_SAMPLES, clamp_window};
use crate::weight::{CellParams, Gain};

#[derive(Debug, Clone)]
pub struct LoadCellBuilder {
    capacity: Option<f32>,
    sensitivity: Option<f32>,
    gain: Gain,
    window: usize,
}

impl Default for LoadCellBuilder {
    fn default() -> Self {
        Self {
            capacity: None,
            sensitivity: None,
            gain: Gain::High,
            window: MAX_SAMPLES,
        }
    }
}

impl LoadCellBuilder {
    /// Rated capacity of the cell.
    pub fn capacity(mut self, capacity: f32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Rated output in mV/V.
    pub fn sensitivity(mut self, mv_per_v: f32) -> Self {
        self.sensitivity = Some(mv_per_v);
        self
    }

    pub fn gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    pub fn high_gain(self, high: bool) -> Self {
        self.gain(Gain::from_high(high))
    }

    /// Moving-average window; clamped to the buffer capacity at build.
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn params(&self, max: usize) -> Result<CellParams> {
        let capacity = self.capacity.ok_or(BuildError::MissingCapacity)?;
        let sensitivity = self.sensitivity.ok_or(BuildError::MissingSensitivity)?;
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(BuildError::InvalidParam("capacity must be finite and > 0").into());
        }
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            return Err(BuildError::InvalidParam("sensitivity must be finite and > 0").into());
        }
        let window = clamp_window(self.window, max);
        if window != self.window {
            tracing::debug!(requested = self.window, window, "moving-average window clamped");
        }
        Ok(CellParams {
            capacity,
            sensitivity,
            gain: self.gain,
            window,
        })
    }

    /// Build a cell with the default `MAX_SAMPLES` buffer.
    pub fn try_build(self) -> Result<LoadCell> {
        self.try_build_sized()
    }

    /// Build a cell with an `N`-slot buffer.
    pub fn try_build_sized<const N: usize>(self) -> Result<LoadCell<N>> {
        let params = self.params(N)?;
        Ok(LoadCell::from_params(params))
    }
}
