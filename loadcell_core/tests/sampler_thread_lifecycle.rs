//! Sampler thread lifecycle: shutdown on drop, scheduler handed back on stop,
//! no thread accumulation across repeated spawns.

use loadcell_core::mocks::NoopPort;
use loadcell_core::sampler::Sampler;
use loadcell_core::{CellParams, LoadCell, Scheduler, TimerCfg};
use loadcell_hardware::SimulatedAds1230;
use loadcell_traits::ADS1230_PROFILE;
use loadcell_traits::clock::MonotonicClock;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn fast_timer() -> TimerCfg {
    // 1 ms overflows, a tick every second overflow
    TimerCfg::new(1000, 2000)
}

#[test]
fn sampler_thread_exits_on_drop() {
    let scheduler: Scheduler<NoopPort> = Scheduler::new(ADS1230_PROFILE, fast_timer());
    let sampler = Sampler::spawn(scheduler, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(20));
    // Drop must signal and join; a hang here is the failure mode
    drop(sampler);
}

#[test]
fn multiple_samplers_dont_leak_threads() {
    let clock = MonotonicClock::new();
    for _ in 0..10 {
        let scheduler: Scheduler<NoopPort> = Scheduler::new(ADS1230_PROFILE, fast_timer());
        let sampler = Sampler::spawn(scheduler, clock.clone());
        std::thread::sleep(Duration::from_millis(5));
        drop(sampler);
    }
}

#[test]
fn stop_returns_scheduler_with_its_cells() {
    let cell = Arc::new(LoadCell::new(CellParams::new(5.0, 2.0)));
    cell.begin(false);
    let sim = SimulatedAds1230::new(1234);
    let handle = sim.handle();

    let mut scheduler = Scheduler::new(ADS1230_PROFILE, fast_timer());
    scheduler.register(cell.clone(), sim).expect("register");
    let sampler = Sampler::spawn(scheduler, MonotonicClock::new());

    let deadline = Instant::now() + Duration::from_secs(5);
    while !cell.is_ready() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(cell.is_ready(), "window never filled");
    assert!(sampler.ticks() > 0);
    assert_eq!(cell.raw_value(), 1234);

    let scheduler = sampler.stop().expect("thread did not panic");
    assert_eq!(scheduler.len(), 1);
    assert!(scheduler.stats().samples >= 10);
    let conversions = handle.conversions();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(handle.conversions(), conversions, "no traffic after stop");
}

#[test]
fn stall_detection_reports_time_since_last_tick() {
    let scheduler: Scheduler<NoopPort> = Scheduler::new(ADS1230_PROFILE, fast_timer());
    let sampler = Sampler::spawn(scheduler, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(30));
    // ticks every ~2 ms; a stall of a full second would mean the thread died
    assert!(sampler.stalled_for_now() < 1000);
    assert_eq!(sampler.stalled_for(0), 0);
    drop(sampler);
}
