pub mod bus;
pub mod clock;
pub mod frame;

pub use bus::{ADS1230_PROFILE, BitOrder, BusProfile, SpiMode};
pub use clock::{Clock, MonotonicClock};
pub use frame::{FRAME_LEN, encode_frame};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Byte-level access to one ADS1230 on a shared serial bus.
///
/// A cycle is always bracketed by `select`/`deselect`; the ready line is only
/// meaningful while the device is selected.
pub trait Ads1230Port {
    /// Begin a bus transaction with `profile` and assert chip-select.
    fn select(&mut self, profile: &BusProfile) -> Result<(), BoxError>;

    /// True when the DOUT/DRDY line reads low (a conversion is waiting).
    fn data_ready(&mut self) -> Result<bool, BoxError>;

    /// Clock one byte out of the device while driving a dummy byte.
    fn transfer(&mut self) -> Result<u8, BoxError>;

    /// Deassert chip-select and end the transaction.
    fn deselect(&mut self) -> Result<(), BoxError>;
}

impl<P: Ads1230Port + ?Sized> Ads1230Port for Box<P> {
    fn select(&mut self, profile: &BusProfile) -> Result<(), BoxError> {
        (**self).select(profile)
    }
    fn data_ready(&mut self) -> Result<bool, BoxError> {
        (**self).data_ready()
    }
    fn transfer(&mut self) -> Result<u8, BoxError> {
        (**self).transfer()
    }
    fn deselect(&mut self) -> Result<(), BoxError> {
        (**self).deselect()
    }
}

/// Blocking, best-effort reader of a single raw conversion.
pub trait Scale {
    fn read(&mut self, timeout: std::time::Duration) -> Result<i32, BoxError>;
}
