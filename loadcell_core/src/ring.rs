//! Fixed-capacity moving-average accumulator.
//!
//! Holds the last `window` samples in a circular buffer of `N` slots together
//! with their running sum. Every operation is O(1) and allocation-free; the
//! sum is only ever updated incrementally.

/// Upper bound on the moving-average window (and the default window).
pub const MAX_SAMPLES: usize = 10;

/// Circular buffer of the most recent samples plus their running sum.
///
/// Only the first `window` of the `N` slots are used. `tail` indexes the
/// newest sample and `head` the oldest one still contributing to `sum`.
#[derive(Debug, Clone)]
pub struct RingAccumulator<const N: usize = MAX_SAMPLES> {
    samples: [i32; N],
    head: usize,
    tail: usize,
    sum: i32,
    filled: usize,
    window: usize,
}

/// Clamp a requested window to `[1, max]`.
#[inline]
pub fn clamp_window(requested: usize, max: usize) -> usize {
    requested.clamp(1, max.max(1))
}

impl<const N: usize> RingAccumulator<N> {
    /// Create an empty accumulator. `window` is clamped to `[1, N]`.
    pub fn new(window: usize) -> Self {
        const { assert!(N > 0, "accumulator capacity must be non-zero") };
        let window = clamp_window(window, N);
        let mut ring = Self {
            samples: [0; N],
            head: 0,
            tail: 0,
            sum: 0,
            filled: 0,
            window,
        };
        ring.reset();
        ring
    }

    #[inline]
    fn advance(&self, i: usize) -> usize {
        if i + 1 >= self.window { 0 } else { i + 1 }
    }

    /// Admit `sample`, evicting the oldest one when the window is full.
    pub fn push(&mut self, sample: i32) {
        if self.filled == self.window {
            self.sum = self.sum.wrapping_sub(self.samples[self.head]);
            self.head = self.advance(self.head);
        } else {
            self.filled += 1;
        }
        self.tail = self.advance(self.tail);
        self.samples[self.tail] = sample;
        self.sum = self.sum.wrapping_add(sample);
    }

    /// Truncating mean of the valid samples.
    ///
    /// An empty window has nothing to divide by; it reports [`latest`](Self::latest)
    /// instead, which is `0` right after a reset.
    pub fn average(&self) -> i32 {
        if self.filled == 0 {
            return self.latest();
        }
        // filled <= N, and N is a small compile-time bound
        self.sum / self.filled as i32
    }

    /// Most recently admitted sample.
    #[inline]
    pub fn latest(&self) -> i32 {
        self.samples[self.tail]
    }

    /// Empty the window. The first push after a reset lands at index 0.
    pub fn reset(&mut self) {
        self.filled = 0;
        self.sum = 0;
        self.head = 0;
        self.tail = self.window - 1;
        self.samples[self.tail] = 0;
    }

    #[inline]
    pub fn sum(&self) -> i32 {
        self.sum
    }

    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.window
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Valid samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.filled).map(move |k| self.samples[(self.head + k) % self.window])
    }
}

impl<const N: usize> Default for RingAccumulator<N> {
    fn default() -> Self {
        Self::new(N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn window_of_four_slides() {
        let mut r: RingAccumulator = RingAccumulator::new(4);
        for v in [100, 200, 300, 400] {
            r.push(v);
        }
        assert_eq!(r.average(), 250);
        r.push(500);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![200, 300, 400, 500]);
        assert_eq!(r.average(), 350);
        assert_eq!(r.sum(), 1400);
        assert_eq!(r.latest(), 500);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(7, 7)]
    #[case(10, 10)]
    #[case(11, 10)]
    #[case(usize::MAX, 10)]
    fn window_is_clamped(#[case] requested: usize, #[case] expected: usize) {
        let r: RingAccumulator = RingAccumulator::new(requested);
        assert_eq!(r.window(), expected);
        assert_eq!(r.capacity(), MAX_SAMPLES);
    }

    #[test]
    fn empty_average_falls_back_to_zero() {
        let r: RingAccumulator<4> = RingAccumulator::new(4);
        assert!(r.is_empty());
        assert_eq!(r.average(), 0);
        assert_eq!(r.latest(), 0);
    }

    #[test]
    fn first_push_after_reset_lands_at_slot_zero() {
        let mut r: RingAccumulator<4> = RingAccumulator::new(3);
        for v in 1..=5 {
            r.push(v);
        }
        r.reset();
        assert_eq!(r.latest(), 0, "stale sample must not be visible");
        r.push(42);
        assert_eq!(r.samples[0], 42);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![42]);
        assert_eq!(r.average(), 42);
    }

    #[test]
    fn truncates_toward_zero() {
        let mut r: RingAccumulator<4> = RingAccumulator::new(4);
        r.push(-1);
        r.push(-2);
        // -3 / 2 truncates to -1
        assert_eq!(r.average(), -1);
        r.push(4);
        // 1 / 3 truncates to 0
        assert_eq!(r.average(), 0);
    }

    #[test]
    fn window_of_one_tracks_latest() {
        let mut r: RingAccumulator = RingAccumulator::new(1);
        for v in [5, -9, 13] {
            r.push(v);
            assert_eq!(r.average(), v);
            assert_eq!(r.filled(), 1);
        }
    }
}
