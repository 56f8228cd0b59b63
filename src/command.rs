//! Bus protocol
//!
//! The controller writes single-byte commands and reads back the distance as
//! a big-endian `i16`. Every written byte is a complete command; nothing is
//! buffered between bytes or transfers.

use crate::indicator::Color;

/// Byte that zeroes the absolute distance
pub const RESET_COMMAND: u8 = b'R';

/// Length of the distance reply
pub const DISTANCE_LEN: usize = 2;

/// Length of the diagnostic telemetry frame
pub const TELEMETRY_LEN: usize = 10;

/// Decoded command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Zero the absolute distance
    Reset,
    /// Show a colour on the indicator
    SetColor(Color),
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        if byte == RESET_COMMAND {
            Self::Reset
        } else {
            Self::SetColor(Color::from_command(byte))
        }
    }
}

/// Reply to a controller read: high byte first
#[must_use]
pub const fn encode_distance(distance: i16) -> [u8; DISTANCE_LEN] {
    distance.to_be_bytes()
}

/// Everything one sensing cycle produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub cosine: i16,
    pub sine: i16,
    pub angle: i16,
    pub absolute_distance: i16,
    pub lower_bound: i16,
}

impl Snapshot {
    /// Diagnostic frame: cosine, sine, angle, distance, lower bound, each
    /// big-endian
    #[must_use]
    pub fn to_telemetry(&self) -> [u8; TELEMETRY_LEN] {
        let mut frame = [0u8; TELEMETRY_LEN];
        let fields = [
            self.cosine,
            self.sine,
            self.angle,
            self.absolute_distance,
            self.lower_bound,
        ];
        for (chunk, field) in frame.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_byte_is_reset() {
        assert_eq!(Command::from(b'R'), Command::Reset);
    }

    #[test]
    fn other_bytes_select_colours() {
        assert_eq!(Command::from(b'D'), Command::SetColor(Color::Red));
        assert_eq!(Command::from(b'G'), Command::SetColor(Color::Green));
        assert_eq!(Command::from(b'B'), Command::SetColor(Color::Blue));
        assert_eq!(Command::from(b'O'), Command::SetColor(Color::Off));
        assert_eq!(Command::from(b'X'), Command::SetColor(Color::Off));
    }

    #[test]
    fn distance_is_big_endian_twos_complement() {
        assert_eq!(encode_distance(0), [0x00, 0x00]);
        assert_eq!(encode_distance(20), [0x00, 0x14]);
        assert_eq!(encode_distance(0x1234), [0x12, 0x34]);
        assert_eq!(encode_distance(-1), [0xFF, 0xFF]);
        assert_eq!(encode_distance(-300), [0xFE, 0xD4]);
        assert_eq!(encode_distance(i16::MIN), [0x80, 0x00]);
    }

    #[test]
    fn telemetry_fields_are_in_wire_order() {
        let snapshot = Snapshot {
            cosine: -2,
            sine: 0x0102,
            angle: 750,
            absolute_distance: -300,
            lower_bound: 0,
        };
        assert_eq!(
            snapshot.to_telemetry(),
            [0xFF, 0xFE, 0x01, 0x02, 0x02, 0xEE, 0xFE, 0xD4, 0x00, 0x00]
        );
    }
}
