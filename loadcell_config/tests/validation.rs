use loadcell_config::{MAX_CELLS_LIMIT, load_path, load_toml};
use rstest::rstest;
use std::io::Write;

const BASE: &str = r#"
[bus]
clock_hz = 4000000
mode = 1

[sampling]
overflow_us = 4096
period_us = 12288

[[cells]]
name = "left"
capacity = 5.0
sensitivity = 2.0
cs_pin = 8
drdy_pin = 9
"#;

#[test]
fn minimal_config_uses_defaults() {
    let cfg = load_toml("").expect("empty TOML parses");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.bus.clock_hz, 4_000_000);
    assert_eq!(cfg.bus.mode, 1);
    assert_eq!(cfg.sampling.overflow_us, 4096);
    assert_eq!(cfg.sampling.period_us, 12_288);
    assert_eq!(cfg.sampling.max_cells, MAX_CELLS_LIMIT);
    assert_eq!(cfg.polling.timeout_ms, 120);
    assert!(cfg.cells.is_empty());
}

#[test]
fn cell_defaults_are_applied() {
    let cfg = load_toml(BASE).expect("parse TOML");
    cfg.validate().expect("valid");
    let c = &cfg.cells[0];
    assert!(c.high_gain);
    assert!(c.calibrate_on_start);
    assert_eq!(c.window, 10);
    assert_eq!(c.label(0), "left");
}

#[test]
fn unnamed_cell_gets_index_label() {
    let cfg = load_toml(
        r#"
[[cells]]
capacity = 1.0
sensitivity = 1.0
"#,
    )
    .expect("parse TOML");
    assert_eq!(cfg.cells[0].label(3), "cell3");
}

#[rstest]
#[case("capacity = 0.0\nsensitivity = 2.0", "capacity must be > 0")]
#[case("capacity = -5.0\nsensitivity = 2.0", "capacity must be > 0")]
#[case("capacity = 5.0\nsensitivity = 0.0", "sensitivity must be > 0")]
#[case("capacity = 5.0\nsensitivity = nan", "sensitivity must be > 0")]
fn rejects_bad_cell_params(#[case] body: &str, #[case] needle: &str) {
    let toml = format!("[[cells]]\n{body}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[rstest]
#[case("[bus]\nclock_hz = 0", "clock_hz must be > 0")]
#[case("[bus]\nmode = 4", "mode must be in 0..=3")]
#[case("[sampling]\noverflow_us = 0", "overflow_us must be >= 1")]
#[case(
    "[sampling]\noverflow_us = 4096\nperiod_us = 1000",
    "period_us must be >= sampling.overflow_us"
)]
#[case("[sampling]\nmax_cells = 0", "max_cells must be in 1..=15")]
#[case("[sampling]\nmax_cells = 16", "max_cells must be in 1..=15")]
#[case("[polling]\ntimeout_ms = 0", "timeout_ms must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"", "rotation must be one of")]
fn rejects_bad_sections(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[test]
fn rejects_more_cells_than_max() {
    let toml = r#"
[sampling]
max_cells = 1

[[cells]]
capacity = 1.0
sensitivity = 1.0

[[cells]]
capacity = 1.0
sensitivity = 1.0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("two cells over a max of one");
    assert!(format!("{err}").contains("sampling.max_cells is 1"));
}

#[test]
fn rejects_shared_chip_select() {
    let toml = format!(
        "{BASE}\n[[cells]]\ncapacity = 1.0\nsensitivity = 1.0\ncs_pin = 8\n"
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("duplicate cs_pin");
    assert!(format!("{err}").contains("cs_pin"));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(10)]
#[case(10_000)]
fn any_window_is_accepted(#[case] window: usize) {
    let toml = format!("[[cells]]\ncapacity = 1.0\nsensitivity = 1.0\nwindow = {window}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("windows are clamped downstream, never rejected");
    assert_eq!(cfg.cells[0].window, window);
}

#[test]
fn missing_capacity_is_a_parse_error() {
    assert!(load_toml("[[cells]]\nsensitivity = 1.0\n").is_err());
}

#[test]
fn load_path_reads_and_validates() {
    let mut f = tempfile::NamedTempFile::new().expect("tempfile");
    f.write_all(BASE.as_bytes()).expect("write");
    let cfg = load_path(f.path()).expect("load");
    assert_eq!(cfg.cells.len(), 1);

    let mut bad = tempfile::NamedTempFile::new().expect("tempfile");
    bad.write_all(b"[bus]\nmode = 9\n").expect("write");
    let err = load_path(bad.path()).expect_err("invalid mode");
    assert!(format!("{err}").contains("invalid configuration"));
    assert!(format!("{err:#}").contains("bus.mode"));

    let mut garbled = tempfile::NamedTempFile::new().expect("tempfile");
    garbled.write_all(b"[bus\n").expect("write");
    let err = load_path(garbled.path()).expect_err("not TOML");
    assert!(err.downcast_ref::<toml::de::Error>().is_some());
}
