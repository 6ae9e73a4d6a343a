#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core acquisition logic for ADS1230 load cells (hardware-agnostic).
//!
//! All bus traffic goes through `loadcell_traits::Ads1230Port`; nothing in
//! here knows about a concrete SPI controller or GPIO driver.
//!
//! ## Architecture
//!
//! - **Accumulator**: fixed-capacity ring with a running sum (`ring` module)
//! - **Reader**: one select / read / deselect cycle per cell (`reader` module)
//! - **Cell**: shared state behind a critical section, read-side accessors,
//!   tare and calibration requests (`cell` module)
//! - **Scheduler**: services every registered cell once per period
//!   (`scheduler` module); `sampler` drives it from a thread on hosted targets
//! - **Polling**: blocking single reads without a periodic trigger
//!   (`polling` module)
//!
//! ## Concurrency
//!
//! Cell state lives in a `critical_section::Mutex`. The acquisition side
//! mutates it inside one critical section per sample; every accessor reads
//! inside one, so readers never observe a half-updated sum and counter.

pub mod builder;
pub mod cell;
pub mod conversions;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod polling;
pub mod reader;
pub mod ring;
pub mod sampler;
pub mod scheduler;
pub mod status;
pub mod util;
pub mod weight;

pub use builder::LoadCellBuilder;
pub use cell::{LoadCell, Snapshot};
pub use error::{BuildError, CoreError, RegisterError, Report, Result};
pub use polling::{DEFAULT_POLL_TIMEOUT, PolledSample, PollingScale};
pub use reader::{decode_frame, read_cycle, try_read_cycle};
pub use ring::{MAX_SAMPLES, RingAccumulator};
pub use sampler::Sampler;
pub use scheduler::{ChannelId, DEFAULT_MAX_CHANNELS, Scheduler, TickStats};
pub use status::{CellState, CycleOutcome};
pub use util::TimerCfg;
pub use weight::{CellParams, Gain, counts_to_weight};
