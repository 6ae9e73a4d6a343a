//! Acquisition state of one load cell.

/// Lifecycle of a cell. There is no error state: a failed bus cycle leaves
/// the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Constructed, `begin` not yet called; the scheduler skips the cell.
    Uninitialized,
    /// Acquiring, fewer than `window` samples held.
    Collecting,
    /// Moving-average window fully populated.
    WindowFull,
}

/// What one acquisition cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Ready line high (or cell not started): no bus traffic beyond the poll.
    NotReady,
    /// A conversion was accepted into the window.
    Sample(i32),
    /// The conversion was discarded and the calibration pulse sent.
    Calibrated,
}
