use loadcell_core::error::BuildError;
use loadcell_core::{Gain, LoadCell, MAX_SAMPLES};
use rstest::rstest;

#[rstest]
fn builder_missing_capacity_yields_typed_build_error() {
    let err = LoadCell::builder()
        .sensitivity(2.0)
        .try_build()
        .expect_err("should fail with MissingCapacity");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingCapacity) => {}
        other => panic!("expected MissingCapacity, got: {other:?}"),
    }
}

#[rstest]
fn builder_missing_sensitivity_yields_typed_build_error() {
    let err = LoadCell::builder()
        .capacity(5.0)
        .try_build()
        .expect_err("should fail with MissingSensitivity");

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingSensitivity)
    ));
}

#[rstest]
#[case(0.0, 2.0)]
#[case(-1.0, 2.0)]
#[case(5.0, 0.0)]
#[case(f32::NAN, 2.0)]
#[case(5.0, f32::INFINITY)]
fn builder_rejects_unusable_params(#[case] capacity: f32, #[case] sensitivity: f32) {
    let err = LoadCell::builder()
        .capacity(capacity)
        .sensitivity(sensitivity)
        .try_build()
        .expect_err("should reject");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidParam(_))
    ));
}

#[rstest]
#[case(0, 1)]
#[case(4, 4)]
#[case(MAX_SAMPLES, MAX_SAMPLES)]
#[case(1000, MAX_SAMPLES)]
fn window_is_clamped_not_rejected(#[case] requested: usize, #[case] effective: usize) {
    let cell = LoadCell::builder()
        .capacity(5.0)
        .sensitivity(2.0)
        .window(requested)
        .try_build()
        .expect("window never fails the build");
    assert_eq!(cell.window(), effective);
}

#[test]
fn sized_build_clamps_to_its_own_buffer() {
    let cell = LoadCell::builder()
        .capacity(5.0)
        .sensitivity(2.0)
        .high_gain(false)
        .window(40)
        .try_build_sized::<32>()
        .expect("build");
    assert_eq!(cell.window(), 32);
    assert_eq!(cell.params().gain, Gain::Low);
}
