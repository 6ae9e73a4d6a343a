//! Conversions bridging `loadcell_config` types to `loadcell_core` types.

use loadcell_traits::{BitOrder, BusProfile, SpiMode};

use crate::error::BuildError;
use crate::util::TimerCfg;
use crate::weight::{CellParams, Gain};

// ── CellCfg ──────────────────────────────────────────────────────────────────

impl From<&loadcell_config::CellCfg> for CellParams {
    fn from(c: &loadcell_config::CellCfg) -> Self {
        Self {
            capacity: c.capacity,
            sensitivity: c.sensitivity,
            gain: Gain::from_high(c.high_gain),
            window: c.window,
        }
    }
}

// ── SamplingCfg ──────────────────────────────────────────────────────────────

impl From<&loadcell_config::SamplingCfg> for TimerCfg {
    fn from(c: &loadcell_config::SamplingCfg) -> Self {
        Self::new(c.overflow_us, c.period_us)
    }
}

// ── BusCfg ───────────────────────────────────────────────────────────────────

/// Bus profile for the `[bus]` section.
pub fn bus_profile(c: &loadcell_config::BusCfg) -> Result<BusProfile, BuildError> {
    if c.clock_hz == 0 {
        return Err(BuildError::InvalidParam("bus.clock_hz"));
    }
    let mode = SpiMode::from_index(c.mode).ok_or(BuildError::InvalidParam("bus.mode"))?;
    Ok(BusProfile {
        clock_hz: c.clock_hz,
        bit_order: BitOrder::MsbFirst,
        mode,
    })
}
