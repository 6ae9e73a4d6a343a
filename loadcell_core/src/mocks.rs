//! Test and helper ports for loadcell_core

use loadcell_traits::{Ads1230Port, BoxError, BusProfile, encode_frame};
use std::collections::VecDeque;

/// A port whose ready line never goes low; useful for exercising the
/// scheduler and sampler without any conversions arriving.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPort;

impl Ads1230Port for NoopPort {
    fn select(&mut self, _profile: &BusProfile) -> Result<(), BoxError> {
        Ok(())
    }
    fn data_ready(&mut self) -> Result<bool, BoxError> {
        Ok(false)
    }
    fn transfer(&mut self) -> Result<u8, BoxError> {
        Ok(0xFF)
    }
    fn deselect(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Port driven by a script of ready polls: each `data_ready` consumes one
/// entry, `Some(frame)` meaning "ready, and this is what the device shifts
/// out". An exhausted script reads as not ready.
#[derive(Debug, Default)]
pub struct ScriptedPort {
    script: VecDeque<Option<[u8; 3]>>,
    frame: [u8; 3],
    clocked: usize,
    transfers: usize,
    selects: usize,
    deselects: usize,
    calibration_pulses: usize,
    fail_after: Option<usize>,
}

impl ScriptedPort {
    pub fn new(script: impl IntoIterator<Item = Option<[u8; 3]>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every poll is ready and yields the next value.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        Self::new(values.into_iter().map(|v| Some(encode_frame(v))))
    }

    /// Fail every byte transfer after the first `n`.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn push(&mut self, entry: Option<[u8; 3]>) {
        self.script.push_back(entry);
    }

    pub fn transfers(&self) -> usize {
        self.transfers
    }
    pub fn selects(&self) -> usize {
        self.selects
    }
    pub fn deselects(&self) -> usize {
        self.deselects
    }
    /// Cycles that clocked more than the 24 data bits.
    pub fn calibration_pulses(&self) -> usize {
        self.calibration_pulses
    }
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Ads1230Port for ScriptedPort {
    fn select(&mut self, _profile: &BusProfile) -> Result<(), BoxError> {
        self.selects += 1;
        self.clocked = 0;
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, BoxError> {
        match self.script.pop_front().flatten() {
            Some(frame) => {
                self.frame = frame;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn transfer(&mut self) -> Result<u8, BoxError> {
        if self.fail_after.is_some_and(|n| self.transfers >= n) {
            return Err(std::io::Error::other("scripted bus failure").into());
        }
        let byte = self.frame.get(self.clocked).copied().unwrap_or(0xFF);
        self.clocked += 1;
        self.transfers += 1;
        Ok(byte)
    }

    fn deselect(&mut self) -> Result<(), BoxError> {
        if self.clocked > 3 {
            self.calibration_pulses += 1;
        }
        self.deselects += 1;
        Ok(())
    }
}
