#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the load-cell acquisition stack.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Window sizes are deliberately not validated here: the core clamps them.
use eyre::WrapErr;
use serde::Deserialize;
use std::path::Path;

/// Hard upper bound on cells sharing one acquisition trigger.
pub const MAX_CELLS_LIMIT: usize = 15;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BusCfg {
    /// SPI clock in Hz
    pub clock_hz: u32,
    /// SPI mode 0..=3 (ADS1230 needs 1)
    pub mode: u8,
}

impl Default for BusCfg {
    fn default() -> Self {
        Self {
            clock_hz: 4_000_000,
            mode: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplingCfg {
    /// Overflow period of the hardware counter driving the trigger (µs)
    pub overflow_us: u32,
    /// Acquisition period; a tick runs once this much overflow time accrued (µs)
    pub period_us: u32,
    /// Maximum number of cells the scheduler accepts
    pub max_cells: usize,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            overflow_us: 4096,
            period_us: 12_288,
            max_cells: MAX_CELLS_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingCfg {
    /// Bound on the data-ready wait of the blocking reader (ms)
    pub timeout_ms: u64,
}

impl Default for PollingCfg {
    fn default() -> Self {
        Self { timeout_ms: 120 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

fn default_window() -> usize {
    10
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CellCfg {
    /// Label used in output; defaults to the cell's index
    #[serde(default)]
    pub name: Option<String>,
    /// Rated capacity, in the unit weights are reported in
    pub capacity: f32,
    /// Rated output (mV/V)
    pub sensitivity: f32,
    /// GAIN jumper closed (x128) when true, open (x64) when false
    #[serde(default = "default_true")]
    pub high_gain: bool,
    /// Moving-average window (clamped by the core to its buffer size)
    #[serde(default = "default_window")]
    pub window: usize,
    /// Chip-select GPIO (BCM numbering on the hardware backend)
    #[serde(default)]
    pub cs_pin: Option<u8>,
    /// GPIO wired to DOUT/DRDY
    #[serde(default)]
    pub drdy_pin: Option<u8>,
    /// Run the offset self-calibration on the first ready cycle
    #[serde(default = "default_true")]
    pub calibrate_on_start: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bus: BusCfg,
    #[serde(default)]
    pub sampling: SamplingCfg,
    #[serde(default)]
    pub polling: PollingCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub cells: Vec<CellCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file. The parse error stays
/// downcastable to `toml::de::Error` under the added context.
pub fn load_path(path: &Path) -> eyre::Result<Config> {
    let text =
        std::fs::read_to_string(path).wrap_err_with(|| format!("read config {path:?}"))?;
    let cfg = load_toml(&text).wrap_err_with(|| format!("parse config {path:?}"))?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

impl CellCfg {
    /// Display label: the configured name or `cell<index>`.
    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("cell{index}"))
    }
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Bus
        if self.bus.clock_hz == 0 {
            eyre::bail!("bus.clock_hz must be > 0");
        }
        if self.bus.mode > 3 {
            eyre::bail!("bus.mode must be in 0..=3");
        }

        // Sampling
        if self.sampling.overflow_us == 0 {
            eyre::bail!("sampling.overflow_us must be >= 1");
        }
        if self.sampling.period_us < self.sampling.overflow_us {
            eyre::bail!("sampling.period_us must be >= sampling.overflow_us");
        }
        if self.sampling.max_cells == 0 || self.sampling.max_cells > MAX_CELLS_LIMIT {
            eyre::bail!("sampling.max_cells must be in 1..={MAX_CELLS_LIMIT}");
        }

        // Polling
        if self.polling.timeout_ms == 0 {
            eyre::bail!("polling.timeout_ms must be >= 1");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Cells
        if self.cells.len() > self.sampling.max_cells {
            eyre::bail!(
                "{} cells configured but sampling.max_cells is {}",
                self.cells.len(),
                self.sampling.max_cells
            );
        }
        for (i, c) in self.cells.iter().enumerate() {
            if !(c.capacity.is_finite() && c.capacity > 0.0) {
                eyre::bail!("cells[{i}].capacity must be > 0");
            }
            if !(c.sensitivity.is_finite() && c.sensitivity > 0.0) {
                eyre::bail!("cells[{i}].sensitivity must be > 0");
            }
        }
        let mut pins: Vec<u8> = self.cells.iter().filter_map(|c| c.cs_pin).collect();
        pins.sort_unstable();
        if pins.windows(2).any(|w| w[0] == w[1]) {
            eyre::bail!("cells must not share a cs_pin");
        }

        Ok(())
    }
}
