/// Error type for sensing and indicator operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The analog front end failed to produce a reading
    Analog(E),
    /// An indicator pin could not be driven
    Pin(E),
}

/// Rejected device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address falls in the bus's reserved ranges (`0x00..=0x07` or `0x78..`)
    ReservedAddress(u8),
}
