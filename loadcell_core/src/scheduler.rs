//! Periodic acquisition across every registered load cell.
//!
//! The scheduler owns each cell's bus port together with a shared handle to
//! the cell, and the one bus profile all transactions use. The platform's
//! periodic interrupt (or [`crate::sampler::Sampler`] on hosted targets)
//! calls [`Scheduler::on_overflow`] for every counter overflow, or
//! [`Scheduler::tick`] directly when it already runs at the acquisition rate.
//! Both take `&mut self`, so a cell is never serviced by two overlapping
//! cycles.
use std::sync::Arc;

use loadcell_traits::{ADS1230_PROFILE, Ads1230Port, BusProfile};
use tracing::{debug, info};

use crate::cell::LoadCell;
use crate::error::RegisterError;
use crate::reader::try_read_cycle;
use crate::ring::MAX_SAMPLES;
use crate::status::CycleOutcome;
use crate::util::TimerCfg;

/// Default bound on registered cells.
pub const DEFAULT_MAX_CHANNELS: usize = 15;

/// Position of a cell in registration (and dispatch) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub usize);

struct Channel<P, const N: usize> {
    cell: Arc<LoadCell<N>>,
    port: P,
}

/// Running counters, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub samples: u64,
    pub calibrations: u64,
    pub bus_errors: u64,
}

pub struct Scheduler<P, const N: usize = MAX_SAMPLES> {
    channels: Vec<Channel<P, N>>,
    max_channels: usize,
    profile: BusProfile,
    timer: TimerCfg,
    overflows: u32,
    stats: TickStats,
}

impl<P: Ads1230Port, const N: usize> Default for Scheduler<P, N> {
    fn default() -> Self {
        Self::new(ADS1230_PROFILE, TimerCfg::default())
    }
}

impl<P: Ads1230Port, const N: usize> Scheduler<P, N> {
    pub fn new(profile: BusProfile, timer: TimerCfg) -> Self {
        Self {
            channels: Vec::new(),
            max_channels: DEFAULT_MAX_CHANNELS,
            profile,
            timer,
            overflows: 0,
            stats: TickStats::default(),
        }
    }

    pub fn with_max_channels(mut self, max: usize) -> Self {
        self.max_channels = max;
        self
    }

    /// Add a cell and the port it is wired to. Cells are serviced in the
    /// order they were registered.
    pub fn register(&mut self, cell: Arc<LoadCell<N>>, port: P) -> Result<ChannelId, RegisterError> {
        if self.channels.len() >= self.max_channels {
            return Err(RegisterError::Full {
                max: self.max_channels,
            });
        }
        let id = ChannelId(self.channels.len());
        self.channels.push(Channel { cell, port });
        info!(channel = id.0, "load cell registered");
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn profile(&self) -> &BusProfile {
        &self.profile
    }

    pub fn timer(&self) -> TimerCfg {
        self.timer
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn cell(&self, id: ChannelId) -> Option<&Arc<LoadCell<N>>> {
        self.channels.get(id.0).map(|c| &c.cell)
    }

    pub fn port_mut(&mut self, id: ChannelId) -> Option<&mut P> {
        self.channels.get_mut(id.0).map(|c| &mut c.port)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Arc<LoadCell<N>>> + '_ {
        self.channels.iter().map(|c| &c.cell)
    }

    /// One acquisition period: a single cycle for every cell, in order.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        let profile = self.profile;
        for (i, ch) in self.channels.iter_mut().enumerate() {
            match try_read_cycle(&*ch.cell, &mut ch.port, &profile) {
                Ok(CycleOutcome::Sample(_)) => self.stats.samples += 1,
                Ok(CycleOutcome::Calibrated) => self.stats.calibrations += 1,
                Ok(CycleOutcome::NotReady) => {}
                Err(e) => {
                    self.stats.bus_errors += 1;
                    debug!(channel = i, error = %e, "acquisition cycle failed");
                }
            }
        }
    }

    /// Count one hardware counter overflow; runs [`tick`](Self::tick) every
    /// [`TimerCfg::overflows_per_tick`] overflows. Returns whether it ticked.
    pub fn on_overflow(&mut self) -> bool {
        self.overflows = self.overflows.saturating_add(1);
        if self.overflows >= self.timer.overflows_per_tick() {
            self.overflows = 0;
            self.tick();
            true
        } else {
            false
        }
    }

    /// Tear down, returning each cell with its port in registration order.
    pub fn into_channels(self) -> Vec<(Arc<LoadCell<N>>, P)> {
        self.channels.into_iter().map(|c| (c.cell, c.port)).collect()
    }
}
