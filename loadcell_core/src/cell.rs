//! One load cell as seen by application code.
//!
//! The acquisition state lives behind a `critical_section::Mutex`: on bare
//! metal the section masks the timer interrupt, on hosted targets the `std`
//! implementation is a process-wide mutex. Every multi-field read below is a
//! single section, so it can never straddle a push from the scheduler.
use core::cell::RefCell;
use critical_section::Mutex;

use crate::builder::LoadCellBuilder;
use crate::ring::{MAX_SAMPLES, RingAccumulator};
use crate::status::CellState;
use crate::weight::{CellParams, counts_to_weight};

#[derive(Debug)]
struct Acquisition<const N: usize> {
    ring: RingAccumulator<N>,
    tare_offset: i32,
    data_available: bool,
    calibration_pending: bool,
    started: bool,
}

/// Consistent copy of a cell's acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub sum: i32,
    pub filled: usize,
    pub window: usize,
    pub latest: i32,
    pub tare_offset: i32,
    pub data_available: bool,
    pub calibration_pending: bool,
}

impl Snapshot {
    /// Filtered value without tare (same fallback as the accumulator).
    pub fn raw_average(&self) -> i32 {
        if self.filled == 0 {
            self.latest
        } else {
            self.sum / self.filled as i32
        }
    }

    pub fn value(&self) -> i32 {
        self.raw_average().wrapping_sub(self.tare_offset)
    }

    pub fn is_ready(&self) -> bool {
        self.data_available && self.filled >= self.window
    }
}

/// A single ADS1230 load cell: calibration parameters plus the shared
/// moving-average state written by the scheduler and read by the application.
pub struct LoadCell<const N: usize = MAX_SAMPLES> {
    params: CellParams,
    state: Mutex<RefCell<Acquisition<N>>>,
}

impl LoadCell {
    /// Cell with the default `MAX_SAMPLES` buffer.
    pub fn new(params: CellParams) -> Self {
        Self::from_params(params)
    }

    pub fn builder() -> LoadCellBuilder {
        LoadCellBuilder::default()
    }
}

impl<const N: usize> LoadCell<N> {
    /// Build a cell with an `N`-slot buffer; `params.window` is clamped to `[1, N]`.
    pub fn from_params(params: CellParams) -> Self {
        let ring = RingAccumulator::new(params.window);
        let params = CellParams {
            window: ring.window(),
            ..params
        };
        Self {
            params,
            state: Mutex::new(RefCell::new(Acquisition {
                ring,
                tare_offset: 0,
                data_available: false,
                calibration_pending: false,
                started: false,
            })),
        }
    }

    #[inline]
    fn with_state<R>(&self, f: impl FnOnce(&mut Acquisition<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs)))
    }

    pub fn params(&self) -> &CellParams {
        &self.params
    }

    /// Effective (clamped) window size.
    pub fn window(&self) -> usize {
        self.params.window
    }

    /// Start (or restart) acquisition: empty the window and optionally ask
    /// for an offset self-calibration on the first ready cycle.
    pub fn begin(&self, calibrate: bool) {
        self.with_state(|s| {
            s.ring.reset();
            s.data_available = false;
            s.calibration_pending = calibrate;
            s.started = true;
        });
        tracing::debug!(window = self.params.window, calibrate, "load cell started");
    }

    /// Empty the window without touching tare or pending calibration.
    pub fn reset(&self) {
        self.with_state(|s| {
            s.ring.reset();
            s.data_available = false;
        });
    }

    pub fn state(&self) -> CellState {
        self.with_state(|s| {
            if !s.started {
                CellState::Uninitialized
            } else if s.ring.is_full() {
                CellState::WindowFull
            } else {
                CellState::Collecting
            }
        })
    }

    /// A new sample arrived since the last read and the window is full.
    pub fn is_ready(&self) -> bool {
        self.with_state(|s| s.data_available && s.ring.filled() >= s.ring.window())
    }

    /// Filtered, tare-corrected value.
    pub fn value(&self) -> i32 {
        let (avg, offset) = self.with_state(|s| {
            s.data_available = false;
            (s.ring.average(), s.tare_offset)
        });
        avg.wrapping_sub(offset)
    }

    /// Filtered value without tare correction.
    pub fn raw_value(&self) -> i32 {
        self.with_state(|s| {
            s.data_available = false;
            s.ring.average()
        })
    }

    /// Newest unfiltered sample, tare-corrected.
    pub fn latest_value(&self) -> i32 {
        let (latest, offset) = self.with_state(|s| {
            s.data_available = false;
            (s.ring.latest(), s.tare_offset)
        });
        latest.wrapping_sub(offset)
    }

    /// Newest unfiltered sample.
    pub fn latest_raw_value(&self) -> i32 {
        self.with_state(|s| {
            s.data_available = false;
            s.ring.latest()
        })
    }

    /// Filtered, tare-corrected weight in the unit of `capacity`.
    pub fn weight(&self) -> f32 {
        counts_to_weight(self.value(), &self.params)
    }

    /// Copy the whole state in one critical section. Unlike the getters this
    /// leaves `data_available` alone.
    pub fn snapshot(&self) -> Snapshot {
        self.with_state(|s| Snapshot {
            sum: s.ring.sum(),
            filled: s.ring.filled(),
            window: s.ring.window(),
            latest: s.ring.latest(),
            tare_offset: s.tare_offset,
            data_available: s.data_available,
            calibration_pending: s.calibration_pending,
        })
    }

    /// Make the current filtered reading the zero point.
    ///
    /// The offset is the untared moving average, captured and stored in the
    /// same critical section. Like any read it consumes `data_available`.
    pub fn tare(&self) -> i32 {
        let offset = self.with_state(|s| {
            s.data_available = false;
            s.tare_offset = s.ring.average();
            s.tare_offset
        });
        tracing::info!(offset, "tare set");
        offset
    }

    pub fn clear_tare(&self) {
        self.with_state(|s| s.tare_offset = 0);
    }

    pub fn tare_offset(&self) -> i32 {
        self.with_state(|s| s.tare_offset)
    }

    /// Ask for an offset self-calibration on the next ready cycle.
    pub fn request_calibration(&self) {
        self.with_state(|s| s.calibration_pending = true);
    }

    pub fn calibration_pending(&self) -> bool {
        self.with_state(|s| s.calibration_pending)
    }

    pub(crate) fn is_started(&self) -> bool {
        self.with_state(|s| s.started)
    }

    /// Consume a pending calibration request.
    pub(crate) fn take_calibration_request(&self) -> bool {
        self.with_state(|s| core::mem::take(&mut s.calibration_pending))
    }

    /// Producer side: admit one decoded conversion.
    pub(crate) fn accept(&self, sample: i32) {
        self.with_state(|s| {
            s.ring.push(sample);
            s.data_available = true;
        });
    }
}

impl<const N: usize> core::fmt::Debug for LoadCell<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("LoadCell")
            .field("params", &self.params)
            .field("filled", &snap.filled)
            .field("tare_offset", &snap.tare_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::Gain;

    fn cell(window: usize) -> LoadCell {
        let cell = LoadCell::new(CellParams {
            window,
            ..CellParams::new(10.0, 2.0)
        });
        cell.begin(false);
        cell
    }

    #[test]
    fn not_ready_until_window_full() {
        let c = cell(3);
        c.accept(10);
        c.accept(20);
        assert!(!c.is_ready());
        assert_eq!(c.state(), CellState::Collecting);
        c.accept(30);
        assert!(c.is_ready());
        assert_eq!(c.state(), CellState::WindowFull);
    }

    #[test]
    fn getters_consume_data_available_but_repeat_values() {
        let c = cell(2);
        c.accept(100);
        c.accept(300);
        assert!(c.is_ready());
        assert_eq!(c.value(), 200);
        assert!(!c.is_ready());
        assert_eq!(c.value(), 200);
        assert_eq!(c.raw_value(), 200);
        assert_eq!(c.latest_raw_value(), 300);
        c.accept(500);
        assert!(c.is_ready());
        assert_eq!(c.latest_value(), 500);
        assert!(!c.is_ready());
    }

    #[test]
    fn tare_zeroes_the_current_reading() {
        let c = cell(4);
        for v in [1000, 1002, 998, 1004] {
            c.accept(v);
        }
        assert_eq!(c.tare(), 1001);
        assert_eq!(c.value(), 0);
        assert_eq!(c.raw_value(), 1001);
        assert_eq!(c.latest_value(), 3);
        assert_eq!(c.weight(), 0.0);
        c.clear_tare();
        assert_eq!(c.value(), 1001);
    }

    #[test]
    fn snapshot_does_not_consume_flag() {
        let c = cell(1);
        c.accept(7);
        let s = c.snapshot();
        assert!(s.is_ready());
        assert_eq!(s.value(), 7);
        assert!(c.is_ready());
    }

    #[test]
    fn begin_resets_window_and_arms_calibration() {
        let c = cell(2);
        c.accept(1);
        c.accept(2);
        c.begin(true);
        assert_eq!(c.snapshot().filled, 0);
        assert_eq!(c.latest_raw_value(), 0);
        assert!(c.calibration_pending());
        assert!(c.take_calibration_request());
        assert!(!c.calibration_pending());
    }

    #[test]
    fn window_is_clamped_into_params() {
        let c: LoadCell<4> = LoadCell::from_params(CellParams {
            window: 99,
            gain: Gain::Low,
            ..CellParams::new(1.0, 1.0)
        });
        assert_eq!(c.window(), 4);
        assert_eq!(c.state(), CellState::Uninitialized);
    }
}
