//! RGB status indicator
//!
//! The board carries two common-anode RGB LEDs wired in parallel, so every
//! colour is a pair of active-low pins. Off drives all six pins high.

use embedded_hal::digital::OutputPin;

use crate::error::Error;

/// Colour shown by the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Green,
    Blue,
    #[default]
    Off,
}

impl Color {
    /// Translate a colour command byte; anything unrecognised switches off
    #[must_use]
    pub const fn from_command(byte: u8) -> Self {
        match byte {
            b'D' => Self::Red,
            b'G' => Self::Green,
            b'B' => Self::Blue,
            _ => Self::Off,
        }
    }
}

/// The two pins lighting one colour
#[derive(Debug)]
pub struct LedPair<P> {
    pub primary: P,
    pub secondary: P,
}

impl<P, E> LedPair<P>
where
    P: OutputPin<Error = E>,
{
    pub fn new(primary: P, secondary: P) -> Self {
        Self { primary, secondary }
    }

    fn on(&mut self) -> Result<(), Error<E>> {
        self.primary.set_low().map_err(Error::Pin)?;
        self.secondary.set_low().map_err(Error::Pin)
    }

    fn off(&mut self) -> Result<(), Error<E>> {
        self.primary.set_high().map_err(Error::Pin)?;
        self.secondary.set_high().map_err(Error::Pin)
    }
}

/// Indicator driver
#[derive(Debug)]
pub struct Indicator<P> {
    red: LedPair<P>,
    green: LedPair<P>,
    blue: LedPair<P>,
    color: Color,
}

impl<P, E> Indicator<P>
where
    P: OutputPin<Error = E>,
{
    /// Take ownership of the pins without driving them
    pub fn new(red: LedPair<P>, green: LedPair<P>, blue: LedPair<P>) -> Self {
        Self {
            red,
            green,
            blue,
            color: Color::Off,
        }
    }

    /// Release the pins, consuming the driver
    pub fn release(self) -> [LedPair<P>; 3] {
        [self.red, self.green, self.blue]
    }

    /// Colour most recently applied
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Switch everything off, then light `color`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a pin cannot be driven; the recorded colour
    /// is then left unchanged
    pub fn set(&mut self, color: Color) -> Result<(), Error<E>> {
        self.red.off()?;
        self.green.off()?;
        self.blue.off()?;

        match color {
            Color::Red => self.red.on()?,
            Color::Green => self.green.on()?,
            Color::Blue => self.blue.on()?,
            Color::Off => {}
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Indicator set to {}", color);

        self.color = color;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_bytes_map_to_colours() {
        assert_eq!(Color::from_command(b'D'), Color::Red);
        assert_eq!(Color::from_command(b'G'), Color::Green);
        assert_eq!(Color::from_command(b'B'), Color::Blue);
        assert_eq!(Color::from_command(b'O'), Color::Off);
    }

    #[test]
    fn unknown_bytes_switch_off() {
        for byte in [b'X', b'r', b'd', 0x00, 0xFF] {
            assert_eq!(Color::from_command(byte), Color::Off);
        }
    }
}
