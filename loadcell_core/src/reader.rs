//! One acquisition cycle against one ADS1230.

use loadcell_traits::{Ads1230Port, BusProfile};
use tracing::{debug, trace};

use crate::cell::LoadCell;
use crate::error::CoreError;
use crate::hw_error::map_port_error;
use crate::status::CycleOutcome;

/// Decode the 3-byte frame (MSB first) into a signed 20-bit conversion.
///
/// The 20-bit result sits in the top of the 24-bit transfer; shifting it to
/// the top of an `i32` and arithmetic-shifting back by 12 sign-extends it.
#[inline]
pub fn decode_frame(bytes: [u8; 3]) -> i32 {
    let raw24 = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
    ((raw24 << 8) as i32) >> 12
}

fn port_err(e: loadcell_traits::BoxError) -> CoreError {
    map_port_error(e.as_ref())
}

pub(crate) fn read_frame<P: Ads1230Port + ?Sized>(port: &mut P) -> Result<[u8; 3], CoreError> {
    let mut frame = [0u8; 3];
    for b in &mut frame {
        *b = port.transfer().map_err(port_err)?;
    }
    Ok(frame)
}

/// Run one cycle and report what happened.
///
/// Chip-select is asserted before the ready line is sampled and always
/// released afterwards, even when the cycle fails. A failed cycle leaves the
/// window untouched; a calibration request consumed by a failed pulse is
/// re-armed.
///
/// A calibration cycle still clocks the 3 data bytes and then one extra dummy
/// byte under the same chip-select. The ADS1230 starts offset calibration only
/// when it sees at least 25 SCLKs after the data is ready, so the extra byte
/// alone (8 clocks) would not trigger it. The conversion read on that cycle is
/// discarded.
pub fn try_read_cycle<P, const N: usize>(
    cell: &LoadCell<N>,
    port: &mut P,
    profile: &BusProfile,
) -> Result<CycleOutcome, CoreError>
where
    P: Ads1230Port + ?Sized,
{
    if !cell.is_started() {
        return Ok(CycleOutcome::NotReady);
    }
    port.select(profile).map_err(port_err)?;
    let outcome = cycle_selected(cell, port);
    let released = port.deselect().map_err(port_err);
    let outcome = outcome?;
    released?;
    Ok(outcome)
}

fn cycle_selected<P, const N: usize>(
    cell: &LoadCell<N>,
    port: &mut P,
) -> Result<CycleOutcome, CoreError>
where
    P: Ads1230Port + ?Sized,
{
    if !port.data_ready().map_err(port_err)? {
        return Ok(CycleOutcome::NotReady);
    }
    let sample = decode_frame(read_frame(port)?);

    if cell.take_calibration_request() {
        // Clocks past the 24 data bits start the offset self-calibration.
        if let Err(e) = port.transfer() {
            cell.request_calibration();
            return Err(port_err(e));
        }
        debug!(discarded = sample, "ads1230 offset calibration pulse sent");
        return Ok(CycleOutcome::Calibrated);
    }

    cell.accept(sample);
    trace!(sample, "ads1230 sample");
    Ok(CycleOutcome::Sample(sample))
}

/// Run one cycle; `Some(sample)` only when a conversion was accepted.
///
/// Bus failures are not surfaced to callers: they are logged and the cycle
/// simply yields nothing.
pub fn read_cycle<P, const N: usize>(
    cell: &LoadCell<N>,
    port: &mut P,
    profile: &BusProfile,
) -> Option<i32>
where
    P: Ads1230Port + ?Sized,
{
    match try_read_cycle(cell, port, profile) {
        Ok(CycleOutcome::Sample(v)) => Some(v),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "ads1230 cycle failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedPort;
    use crate::weight::CellParams;
    use loadcell_traits::ADS1230_PROFILE;
    use rstest::rstest;

    #[rstest]
    #[case([0x01, 0x23, 0x45], 0x1234)]
    #[case([0x00, 0x00, 0x10], 1)]
    #[case([0x7F, 0xFF, 0xFF], 0x7FFFF)]
    #[case([0xFF, 0xFF, 0xFF], -1)]
    #[case([0xFF, 0xFF, 0xF0], -1)]
    #[case([0x80, 0x00, 0x00], -0x80000)]
    #[case([0x00, 0x00, 0x0F], 0)]
    fn decodes_signed_twenty_bit(#[case] bytes: [u8; 3], #[case] expected: i32) {
        assert_eq!(decode_frame(bytes), expected);
    }

    #[test]
    fn decode_matches_shift_formula() {
        let raw24: u32 = 0x012345;
        assert_eq!(decode_frame([0x01, 0x23, 0x45]), ((raw24 << 8) as i32) >> 12);
        assert_eq!(decode_frame([0x01, 0x23, 0x45]), 4660);
    }

    fn started(window: usize) -> LoadCell {
        let c = LoadCell::new(CellParams {
            window,
            ..CellParams::new(1.0, 1.0)
        });
        c.begin(false);
        c
    }

    #[test]
    fn not_ready_is_a_noop() {
        let cell = started(2);
        let mut port = ScriptedPort::new([None]);
        assert_eq!(read_cycle(&cell, &mut port, &ADS1230_PROFILE), None);
        assert_eq!(port.transfers(), 0);
        assert_eq!(port.selects(), 1);
        assert_eq!(port.deselects(), 1);
        assert_eq!(cell.snapshot().filled, 0);
    }

    #[test]
    fn ready_cycle_pushes_decoded_sample() {
        let cell = started(2);
        let mut port = ScriptedPort::new([Some([0x01, 0x23, 0x45])]);
        assert_eq!(read_cycle(&cell, &mut port, &ADS1230_PROFILE), Some(4660));
        assert_eq!(port.transfers(), 3);
        let snap = cell.snapshot();
        assert_eq!((snap.filled, snap.sum, snap.latest), (1, 4660, 4660));
        assert!(snap.data_available);
    }

    #[test]
    fn calibration_cycle_discards_sample_and_sends_extra_byte() {
        let cell = started(2);
        let mut port = ScriptedPort::from_values([10, 20, 30]);
        read_cycle(&cell, &mut port, &ADS1230_PROFILE);
        let before = cell.snapshot();
        cell.request_calibration();

        let outcome = try_read_cycle(&cell, &mut port, &ADS1230_PROFILE).unwrap();
        assert_eq!(outcome, CycleOutcome::Calibrated);
        assert_eq!(port.calibration_pulses(), 1);
        assert_eq!(port.transfers(), 7);
        let after = cell.snapshot();
        assert!(!after.calibration_pending);
        assert_eq!((after.sum, after.filled, after.latest), (before.sum, before.filled, before.latest));

        assert_eq!(read_cycle(&cell, &mut port, &ADS1230_PROFILE), Some(30));
    }

    #[test]
    fn unstarted_cell_is_skipped_without_bus_traffic() {
        let cell = LoadCell::new(CellParams::new(1.0, 1.0));
        let mut port = ScriptedPort::from_values([5]);
        assert_eq!(read_cycle(&cell, &mut port, &ADS1230_PROFILE), None);
        assert_eq!(port.selects(), 0);
    }

    #[test]
    fn failed_pulse_rearms_calibration_and_releases_bus() {
        let cell = started(2);
        cell.request_calibration();
        let mut port = ScriptedPort::from_values([5]).fail_after(3);
        let err = try_read_cycle(&cell, &mut port, &ADS1230_PROFILE).unwrap_err();
        assert!(matches!(err, CoreError::Bus(_)));
        assert!(cell.calibration_pending());
        assert_eq!(port.deselects(), 1);
        assert_eq!(cell.snapshot().filled, 0);
    }
}
