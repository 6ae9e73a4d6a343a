//! Bus-level ADS1230 access: an `embedded-hal` SPI port, a software device
//! for simulation, and (feature `hardware`) a Raspberry Pi binding.
pub mod error;
pub mod sim;
pub mod spi;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod rpi;

pub use error::HwError;
pub use sim::{SimHandle, SimulatedAds1230};
pub use spi::SpiPort;
