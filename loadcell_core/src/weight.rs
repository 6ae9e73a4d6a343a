//! Physical parameters of a load cell and the counts → weight conversion.

use crate::ring::MAX_SAMPLES;

/// Front-end PGA gain selected by the board's GAIN jumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gain {
    /// GAIN jumper closed (×128).
    #[default]
    High,
    /// GAIN jumper open (×64).
    Low,
}

impl Gain {
    #[inline]
    pub fn from_high(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Self::High => 128.0,
            Self::Low => 64.0,
        }
    }
}

/// Immutable calibration parameters fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    /// Rated capacity, in whatever unit weights should be reported in.
    pub capacity: f32,
    /// Rated output in mV/V.
    pub sensitivity: f32,
    pub gain: Gain,
    /// Requested moving-average window; clamped by the cell.
    pub window: usize,
}

impl CellParams {
    pub fn new(capacity: f32, sensitivity: f32) -> Self {
        Self {
            capacity,
            sensitivity,
            gain: Gain::High,
            window: MAX_SAMPLES,
        }
    }
}

/// Full-scale span of the 20-bit converter in counts.
pub const FULL_SCALE_COUNTS: f32 = (1u32 << 20) as f32;

/// Convert zero-referenced counts into weight:
/// `capacity * counts / (2^20 * gain * sensitivity / 1000)`.
///
/// Degenerate parameters (zero sensitivity, non-finite inputs) yield `0.0`.
pub fn counts_to_weight(counts: i32, params: &CellParams) -> f32 {
    let span = FULL_SCALE_COUNTS * params.gain.factor() * (params.sensitivity / 1000.0);
    let w = params.capacity * counts as f32 / span;
    if w.is_finite() { w } else { 0.0 }
}
