//! Device configuration

use crate::error::ConfigError;

/// Bus address used by a freshly flashed device
pub const DEFAULT_ADDRESS: u8 = 0x08;

/// Lowest non-reserved 7-bit address
const ADDRESS_MIN: u8 = 0x08;

/// Highest non-reserved 7-bit address
const ADDRESS_MAX: u8 = 0x77;

/// Delay between consecutive acquisitions, letting the converter settle
pub const DEFAULT_SETTLE_US: u32 = 100;

/// Idle time at the end of every sensing cycle
pub const DEFAULT_CYCLE_DELAY_US: u32 = 100;

/// Per-device settings
///
/// Offsets come from calibrating each unit against its resolver and are
/// subtracted from the centred readings of the matching channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit peripheral address
    pub address: u8,
    /// Cosine channel calibration offset
    pub cosine_offset: i16,
    /// Sine channel calibration offset
    pub sine_offset: i16,
    /// Microseconds between acquisitions within one window
    pub settle_us: u32,
    /// Microseconds to idle after each cycle
    pub cycle_delay_us: u32,
}

impl Config {
    /// Default configuration: address `0x08`, no offsets, 100 µs timings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            cosine_offset: 0,
            sine_offset: 0,
            settle_us: DEFAULT_SETTLE_US,
            cycle_delay_us: DEFAULT_CYCLE_DELAY_US,
        }
    }

    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub const fn with_offsets(mut self, cosine_offset: i16, sine_offset: i16) -> Self {
        self.cosine_offset = cosine_offset;
        self.sine_offset = sine_offset;
        self
    }

    #[must_use]
    pub const fn with_settle_us(mut self, settle_us: u32) -> Self {
        self.settle_us = settle_us;
        self
    }

    #[must_use]
    pub const fn with_cycle_delay_us(mut self, cycle_delay_us: u32) -> Self {
        self.cycle_delay_us = cycle_delay_us;
        self
    }

    /// Check the address against the reserved ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedAddress`] if the address is not usable
    /// by a peripheral
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.address < ADDRESS_MIN || self.address > ADDRESS_MAX {
            return Err(ConfigError::ReservedAddress(self.address));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_factory_settings() {
        let config = Config::default();
        assert_eq!(config.address, 0x08);
        assert_eq!(config.cosine_offset, 0);
        assert_eq!(config.sine_offset, 0);
        assert_eq!(config.settle_us, 100);
        assert_eq!(config.cycle_delay_us, 100);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn fleet_addresses_are_accepted() {
        for address in 0x08..=0x0D {
            assert_eq!(Config::new().with_address(address).validate(), Ok(()));
        }
    }

    #[test]
    fn reserved_addresses_are_rejected() {
        for address in [0x00, 0x07, 0x78, 0x7F, 0xFF] {
            assert_eq!(
                Config::new().with_address(address).validate(),
                Err(ConfigError::ReservedAddress(address))
            );
        }
    }
}
