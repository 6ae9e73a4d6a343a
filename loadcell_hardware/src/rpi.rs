//! Raspberry Pi binding via `rppal`: hardware SPI plus GPIO chip-select and
//! a GPIO tied to the ADS1230 DOUT/DRDY line.
use loadcell_traits::{BitOrder, BusProfile, SpiMode};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::spi::{self, Bus, SlaveSelect, Spi};
use tracing::info;

use crate::error::Result;
use crate::spi::SpiPort;

pub type RpiPort = SpiPort<Spi, OutputPin, InputPin>;

fn mode(m: SpiMode) -> spi::Mode {
    match m {
        SpiMode::Mode0 => spi::Mode::Mode0,
        SpiMode::Mode1 => spi::Mode::Mode1,
        SpiMode::Mode2 => spi::Mode::Mode2,
        SpiMode::Mode3 => spi::Mode::Mode3,
    }
}

/// Open SPI0 with `profile` and claim `cs_pin`/`drdy_pin` (BCM numbering).
///
/// The hardware slave-select line is left unused; chip-select is driven on
/// `cs_pin` so several cells can share the bus.
pub fn open_port(profile: BusProfile, cs_pin: u8, drdy_pin: u8) -> Result<RpiPort> {
    let bus = Spi::new(Bus::Spi0, SlaveSelect::Ss0, profile.clock_hz, mode(profile.mode))?;
    bus.set_bit_order(match profile.bit_order {
        BitOrder::MsbFirst => spi::BitOrder::MsbFirst,
        BitOrder::LsbFirst => spi::BitOrder::LsbFirst,
    })?;
    let gpio = Gpio::new()?;
    let cs = gpio.get(cs_pin)?.into_output_high();
    let drdy = gpio.get(drdy_pin)?.into_input();
    info!(cs_pin, drdy_pin, clock_hz = profile.clock_hz, "ads1230 port opened");
    SpiPort::new(bus, cs, drdy, profile)
}
