//! Commands: periodic monitoring, single polled reads, and the port probe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use eyre::WrapErr;
use loadcell_core::hw_error::map_port_error;
use loadcell_core::{
    CellParams, CoreError, LoadCell, PollingScale, Sampler, Scheduler, TickStats, TimerCfg,
    counts_to_weight,
};
use loadcell_traits::{BusProfile, MonotonicClock};
use serde_json::json;

use crate::backend::BoxedPort;

/// How often the foreground polls the cells' ready flags.
const READY_POLL: Duration = Duration::from_millis(2);

pub struct MonitorOpts {
    pub readings: u32,
    pub tare: bool,
    pub no_calibrate: bool,
    pub timeout: Duration,
    pub stats: bool,
}

/// One printed reading.
#[derive(Debug, Clone)]
pub struct Reading {
    pub cell: String,
    pub raw: i32,
    pub value: i32,
    pub weight: f32,
}

pub fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn emit(json_mode: bool, round: u32, r: &Reading) {
    if json_mode {
        println!(
            "{}",
            json!({
                "timestamp": unix_ts(),
                "round": round,
                "cell": r.cell,
                "raw": r.raw,
                "value": r.value,
                "weight": r.weight,
            })
        );
    } else {
        println!(
            "[{round}] {}: value={} raw={} weight={:.4}",
            r.cell, r.value, r.raw, r.weight
        );
    }
}

/// Block until every cell reports a full window with fresh data.
fn wait_all_ready(
    cells: &[(String, Arc<LoadCell>)],
    timeout: Duration,
    shutdown: &AtomicBool,
) -> eyre::Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(false);
        }
        if cells.iter().all(|(_, c)| c.is_ready()) {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            let pending: Vec<&str> = cells
                .iter()
                .filter(|(_, c)| !c.is_ready())
                .map(|(n, _)| n.as_str())
                .collect();
            return Err(eyre::Report::new(CoreError::Timeout).wrap_err(format!(
                "no full window within {} ms on: {}",
                timeout.as_millis(),
                pending.join(", ")
            )));
        }
        std::thread::sleep(READY_POLL);
    }
}

fn print_stats(stats: &TickStats, timer: &TimerCfg) {
    eprintln!("\n--- Acquisition Stats ---");
    eprintln!("Period (us): {}", timer.effective_period_us());
    eprintln!("Rate (Hz): {:.1}", timer.effective_rate_hz());
    eprintln!("Ticks: {}", stats.ticks);
    eprintln!("Samples: {}", stats.samples);
    eprintln!("Calibrations: {}", stats.calibrations);
    eprintln!("Bus errors: {}", stats.bus_errors);
    eprintln!("-------------------------\n");
}

/// Spawn the sampler over every configured cell and print filtered readings.
///
/// Returns the readings of the last completed round (empty if interrupted
/// before the first).
pub fn run_monitor(
    cfg: &loadcell_config::Config,
    profile: BusProfile,
    ports: Vec<BoxedPort>,
    opts: &MonitorOpts,
    json_mode: bool,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<Vec<Reading>> {
    if cfg.cells.is_empty() {
        eyre::bail!("invalid configuration: no [[cells]] configured");
    }
    let timer = TimerCfg::from(&cfg.sampling);
    let mut scheduler: Scheduler<BoxedPort> =
        Scheduler::new(profile, timer).with_max_channels(cfg.sampling.max_cells);

    let mut cells = Vec::with_capacity(cfg.cells.len());
    for (i, (cell_cfg, port)) in cfg.cells.iter().zip(ports).enumerate() {
        let cell = Arc::new(LoadCell::new(CellParams::from(cell_cfg)));
        cell.begin(cell_cfg.calibrate_on_start && !opts.no_calibrate);
        scheduler.register(cell.clone(), port)?;
        cells.push((cell_cfg.label(i), cell));
    }

    let sampler = Sampler::spawn(scheduler, MonotonicClock::new());
    tracing::info!(cells = cells.len(), "monitor start");

    let result = monitor_loop(&cells, opts, json_mode, &shutdown);

    match sampler.stop() {
        Some(s) => {
            tracing::info!(ticks = s.stats().ticks, "monitor stop");
            if opts.stats {
                print_stats(&s.stats(), &s.timer());
            }
        }
        None => tracing::warn!("sampler thread did not shut down cleanly"),
    }
    result
}

fn monitor_loop(
    cells: &[(String, Arc<LoadCell>)],
    opts: &MonitorOpts,
    json_mode: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<Vec<Reading>> {
    if !wait_all_ready(cells, opts.timeout, shutdown)? {
        return Ok(Vec::new());
    }
    if opts.tare {
        for (name, c) in cells {
            let offset = c.tare();
            tracing::info!(cell = %name, offset, "tared");
        }
    }

    let mut last = Vec::new();
    let mut round = 0u32;
    while opts.readings == 0 || round < opts.readings {
        // After a tare the window is already consumed; wait for fresh data.
        if (round > 0 || opts.tare) && !wait_all_ready(cells, opts.timeout, shutdown)? {
            break;
        }
        round += 1;
        last = cells
            .iter()
            .map(|(name, c)| {
                let value = c.value();
                let raw = value.wrapping_add(c.tare_offset());
                Reading {
                    cell: name.clone(),
                    raw,
                    value,
                    weight: counts_to_weight(value, c.params()),
                }
            })
            .collect();
        for r in &last {
            emit(json_mode, round, r);
        }
    }
    Ok(last)
}

/// One blocking, best-effort read per cell.
pub fn run_read(
    cfg: &loadcell_config::Config,
    profile: BusProfile,
    ports: Vec<BoxedPort>,
    timeout: Duration,
    json_mode: bool,
) -> eyre::Result<()> {
    if cfg.cells.is_empty() {
        eyre::bail!("invalid configuration: no [[cells]] configured");
    }
    for (i, (cell_cfg, port)) in cfg.cells.iter().zip(ports).enumerate() {
        let name = cell_cfg.label(i);
        let mut scale = PollingScale::new(port).with_profile(profile);
        let sample = scale
            .read_blocking(timeout)
            .wrap_err_with(|| format!("read {name}"))?;
        if !sample.ready_seen {
            tracing::warn!(cell = %name, "data-ready not seen; value may be stale");
        }
        let weight = counts_to_weight(sample.value, &CellParams::from(cell_cfg));
        if json_mode {
            println!(
                "{}",
                json!({
                    "timestamp": unix_ts(),
                    "cell": name,
                    "raw": sample.value,
                    "weight": weight,
                    "ready_seen": sample.ready_seen,
                })
            );
        } else {
            println!(
                "{name}: raw={} weight={weight:.4}{}",
                sample.value,
                if sample.ready_seen { "" } else { " (not ready)" }
            );
        }
    }
    Ok(())
}

/// Select, sample the ready line, and release every port once.
pub fn self_check(profile: BusProfile, ports: &mut [BoxedPort]) -> eyre::Result<usize> {
    for (i, port) in ports.iter_mut().enumerate() {
        port.select(&profile)
            .map_err(|e| map_port_error(e.as_ref()))
            .wrap_err_with(|| format!("probe cells[{i}]"))?;
        let probe = port.data_ready().map_err(|e| map_port_error(e.as_ref()));
        let released = port.deselect().map_err(|e| map_port_error(e.as_ref()));
        let ready = probe.wrap_err_with(|| format!("probe cells[{i}]"))?;
        released.wrap_err_with(|| format!("release cells[{i}]"))?;
        tracing::debug!(cell = i, ready, "port probe ok");
    }
    Ok(ports.len())
}
