use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use loadcell_traits::{Ads1230Port, BoxError, BusProfile};
use tracing::trace;

use crate::error::{HwError, Result};

/// ADS1230 attached to an `embedded-hal` SPI bus with a manually driven
/// chip-select and a GPIO wired to DOUT/DRDY.
///
/// The bus itself cannot be reconfigured per transaction through
/// `embedded-hal`, so the profile it was opened with is recorded and every
/// `select` checks that the scheduler's profile matches it.
pub struct SpiPort<SPI, CS, DRDY> {
    spi: SPI,
    cs: CS,
    drdy: DRDY,
    opened_with: BusProfile,
    selected: bool,
}

impl<SPI, CS, DRDY> SpiPort<SPI, CS, DRDY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DRDY: InputPin,
{
    pub fn new(spi: SPI, mut cs: CS, drdy: DRDY, opened_with: BusProfile) -> Result<Self> {
        cs.set_high().map_err(|e| HwError::Pin(format!("{e:?}")))?;
        Ok(Self {
            spi,
            cs,
            drdy,
            opened_with,
            selected: false,
        })
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, CS, DRDY) {
        (self.spi, self.cs, self.drdy)
    }

    fn select_inner(&mut self, profile: &BusProfile) -> Result<()> {
        if *profile != self.opened_with {
            return Err(HwError::ProfileMismatch {
                opened: format!("{:?}", self.opened_with),
                requested: format!("{profile:?}"),
            });
        }
        self.cs
            .set_low()
            .map_err(|e| HwError::Pin(format!("{e:?}")))?;
        self.selected = true;
        Ok(())
    }

    fn transfer_inner(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|e| HwError::Spi(format!("{e:?}")))?;
        self.spi
            .flush()
            .map_err(|e| HwError::Spi(format!("{e:?}")))?;
        trace!(byte = buf[0], "ads1230 byte");
        Ok(buf[0])
    }

    fn deselect_inner(&mut self) -> Result<()> {
        self.selected = false;
        self.cs
            .set_high()
            .map_err(|e| HwError::Pin(format!("{e:?}")))
    }
}

impl<SPI, CS, DRDY> Ads1230Port for SpiPort<SPI, CS, DRDY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DRDY: InputPin,
{
    fn select(&mut self, profile: &BusProfile) -> std::result::Result<(), BoxError> {
        Ok(self.select_inner(profile)?)
    }

    fn data_ready(&mut self) -> std::result::Result<bool, BoxError> {
        let low = self
            .drdy
            .is_low()
            .map_err(|e| HwError::Pin(format!("{e:?}")))?;
        Ok(low)
    }

    fn transfer(&mut self) -> std::result::Result<u8, BoxError> {
        Ok(self.transfer_inner()?)
    }

    fn deselect(&mut self) -> std::result::Result<(), BoxError> {
        Ok(self.deselect_inner()?)
    }
}
