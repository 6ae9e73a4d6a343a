//! Maps `Box<dyn Error>` from the port trait boundary to typed `CoreError`.
//!
//! `loadcell_traits::Ads1230Port` returns boxed errors so any bus backend can
//! plug in; this converts them back, downcasting `loadcell_hardware::HwError`
//! when the `hardware-errors` feature is on.

use crate::error::CoreError;

/// Map a port error to a typed `CoreError`.
pub fn map_port_error(e: &(dyn std::error::Error + 'static)) -> CoreError {
    #[cfg(feature = "hardware-errors")]
    {
        use loadcell_hardware::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Spi(_) | HwError::Pin(_) | HwError::SimulatedFault => {
                    CoreError::HardwareFault(hw.to_string())
                }
                other => CoreError::Bus(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        CoreError::Timeout
    } else {
        CoreError::Bus(s)
    }
}
