//! Serial bus timing profile shared by every ADS1230 on the bus.

/// Clock polarity/phase combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

impl SpiMode {
    /// Parse the numeric mode (0..=3) used in configuration files.
    pub fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(Self::Mode0),
            1 => Some(Self::Mode1),
            2 => Some(Self::Mode2),
            3 => Some(Self::Mode3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Immutable bus settings applied at the start of every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusProfile {
    pub clock_hz: u32,
    pub bit_order: BitOrder,
    pub mode: SpiMode,
}

/// ADS1230: 4 MHz, MSB first, data valid on the falling edge (mode 1).
pub const ADS1230_PROFILE: BusProfile = BusProfile {
    clock_hz: 4_000_000,
    bit_order: BitOrder::MsbFirst,
    mode: SpiMode::Mode1,
};

impl Default for BusProfile {
    fn default() -> Self {
        ADS1230_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_index_round_trip_and_rejects_unknown() {
        assert_eq!(SpiMode::from_index(1), Some(SpiMode::Mode1));
        assert_eq!(SpiMode::from_index(3), Some(SpiMode::Mode3));
        assert_eq!(SpiMode::from_index(4), None);
    }

    #[test]
    fn default_profile_is_ads1230() {
        let p = BusProfile::default();
        assert_eq!(p.clock_hz, 4_000_000);
        assert_eq!(p.bit_order, BitOrder::MsbFirst);
        assert_eq!(p.mode, SpiMode::Mode1);
    }
}
