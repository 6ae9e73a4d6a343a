//! Port assembly: one boxed `Ads1230Port` per configured cell.
//!
//! Without the `hardware` feature every cell gets a `SimulatedAds1230`
//! reporting `LOADCELL_SIM_RAW` (default 0).

use loadcell_config::{CellCfg, Config};
use loadcell_traits::{Ads1230Port, BusProfile};

pub type BoxedPort = Box<dyn Ads1230Port + Send>;

#[cfg(not(feature = "hardware"))]
pub const SIM_RAW_ENV: &str = "LOADCELL_SIM_RAW";

#[cfg(not(feature = "hardware"))]
fn sim_raw() -> eyre::Result<i32> {
    match std::env::var(SIM_RAW_ENV) {
        Ok(v) => v
            .trim()
            .parse::<i32>()
            .map_err(|e| eyre::eyre!("{SIM_RAW_ENV}={v:?} is not an integer: {e}")),
        Err(_) => Ok(0),
    }
}

#[cfg(not(feature = "hardware"))]
fn open_one(_profile: BusProfile, index: usize, _cell: &CellCfg) -> eyre::Result<BoxedPort> {
    let raw = sim_raw()?;
    tracing::debug!(index, raw, "simulated ads1230");
    Ok(Box::new(loadcell_hardware::SimulatedAds1230::new(raw)))
}

#[cfg(feature = "hardware")]
fn open_one(profile: BusProfile, index: usize, cell: &CellCfg) -> eyre::Result<BoxedPort> {
    #[cfg(target_os = "linux")]
    {
        use eyre::WrapErr;
        let cs = cell
            .cs_pin
            .ok_or_else(|| eyre::eyre!("cells[{index}].cs_pin missing"))?;
        let drdy = cell
            .drdy_pin
            .ok_or_else(|| eyre::eyre!("cells[{index}].drdy_pin missing"))?;
        let port = loadcell_hardware::rpi::open_port(profile, cs, drdy)
            .wrap_err_with(|| format!("open ads1230 port for cells[{index}]"))?;
        Ok(Box::new(port))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (profile, cell);
        eyre::bail!("cells[{index}]: hardware backend is only available on Linux")
    }
}

/// Open a port for every cell, in config order.
pub fn open_ports(cfg: &Config, profile: BusProfile) -> eyre::Result<Vec<BoxedPort>> {
    cfg.cells
        .iter()
        .enumerate()
        .map(|(i, c)| open_one(profile, i, c))
        .collect()
}
