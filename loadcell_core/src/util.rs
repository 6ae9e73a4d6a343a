//! Timer and period helpers for the acquisition trigger.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Compute the period in microseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Duration of `cycles` CPU clock cycles at `cpu_hz`, in microseconds.
#[inline]
pub fn cycles_to_us(cycles: u64, cpu_hz: u32) -> u64 {
    cycles.saturating_mul(MICROS_PER_SEC) / u64::from(cpu_hz.max(1))
}

/// Periodic trigger derived from a free-running hardware counter.
///
/// The counter overflows every `overflow_us`; the acquisition tick runs once
/// the accumulated overflow time reaches `period_us`, so the effective period
/// is a whole number of overflows and no fractional cycles are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerCfg {
    pub overflow_us: u32,
    pub period_us: u32,
}

impl Default for TimerCfg {
    /// 16 MHz core, 8-bit counter, prescaler 256: 4096 µs overflows, three
    /// per tick (12 288 µs ≈ 81.4 Hz, just above the ADS1230's 80 SPS).
    fn default() -> Self {
        Self {
            overflow_us: 4096,
            period_us: 12_288,
        }
    }
}

impl TimerCfg {
    pub const fn new(overflow_us: u32, period_us: u32) -> Self {
        Self {
            overflow_us,
            period_us,
        }
    }

    /// Overflow period of a `counter_bits`-wide counter clocked at
    /// `cpu_hz / prescaler`.
    pub fn from_counter(cpu_hz: u32, prescaler: u32, counter_bits: u8, period_us: u32) -> Self {
        let cycles = u64::from(prescaler.max(1)) << counter_bits.min(32);
        let overflow_us = cycles_to_us(cycles, cpu_hz).clamp(1, u64::from(u32::MAX)) as u32;
        Self::new(overflow_us, period_us)
    }

    /// Tick at (at least) `hz` on a counter overflowing every `overflow_us`.
    pub fn for_rate(hz: u32, overflow_us: u32) -> Self {
        let period = period_us(hz).min(u64::from(u32::MAX)) as u32;
        Self::new(overflow_us.max(1), period)
    }

    /// Overflows counted before each tick (at least one).
    pub fn overflows_per_tick(&self) -> u32 {
        let o = self.overflow_us.max(1);
        self.period_us.div_ceil(o).max(1)
    }

    pub fn effective_period_us(&self) -> u64 {
        u64::from(self.overflows_per_tick()) * u64::from(self.overflow_us.max(1))
    }

    pub fn effective_rate_hz(&self) -> f32 {
        MICROS_PER_SEC as f32 / self.effective_period_us() as f32
    }
}
