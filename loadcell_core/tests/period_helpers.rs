use loadcell_core::TimerCfg;
use loadcell_core::util::{MICROS_PER_SEC, cycles_to_us, period_us};
use rstest::rstest;

#[rstest]
#[case(0, MICROS_PER_SEC)]
#[case(1, MICROS_PER_SEC)]
#[case(80, 12_500)]
#[case(1000, 1000)]
#[case(2_000_000, 1)]
fn period_us_clamps_and_floors(#[case] hz: u32, #[case] want: u64) {
    assert_eq!(period_us(hz), want);
}

#[test]
fn cycles_to_us_handles_zero_clock() {
    assert_eq!(cycles_to_us(16, 16_000_000), 1);
    assert_eq!(cycles_to_us(5, 0), 5 * MICROS_PER_SEC);
}

#[test]
fn default_timer_runs_just_above_80_hz() {
    let t = TimerCfg::default();
    assert_eq!(t.overflows_per_tick(), 3);
    assert_eq!(t.effective_period_us(), 12_288);
    let hz = t.effective_rate_hz();
    assert!((81.0..82.0).contains(&hz), "rate {hz}");
}

#[test]
fn eight_bit_counter_at_16mhz_prescaler_256() {
    let t = TimerCfg::from_counter(16_000_000, 256, 8, 12_288);
    assert_eq!(t, TimerCfg::default());
}

#[rstest]
#[case(TimerCfg::new(4096, 10_000), 3, 12_288)]
#[case(TimerCfg::new(1000, 1000), 1, 1000)]
#[case(TimerCfg::new(1000, 0), 1, 1000)]
#[case(TimerCfg::new(0, 5), 5, 5)]
fn tick_period_is_whole_overflows(
    #[case] t: TimerCfg,
    #[case] per_tick: u32,
    #[case] period: u64,
) {
    assert_eq!(t.overflows_per_tick(), per_tick);
    assert_eq!(t.effective_period_us(), period);
}

#[test]
fn for_rate_targets_at_least_the_requested_rate() {
    let t = TimerCfg::for_rate(80, 4096);
    assert_eq!(t.period_us, 12_500);
    assert!(t.effective_period_us() >= 12_500);
}
