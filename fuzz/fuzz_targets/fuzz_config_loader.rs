#![no_main]
use libfuzzer_sys::fuzz_target;
use loadcell_core::{CellParams, LoadCell, TimerCfg};
use loadcell_core::conversions::bus_profile;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = toml::from_str::<loadcell_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // Anything that validates must map into core types.
    assert!(bus_profile(&cfg.bus).is_ok());
    let _ = TimerCfg::from(&cfg.sampling).effective_rate_hz();
    for c in &cfg.cells {
        let cell = LoadCell::new(CellParams::from(c));
        assert!((1..=loadcell_core::MAX_SAMPLES).contains(&cell.window()));
    }
});
