//! Common packet header shared by every datagram.
//!
//! ```text
//! offset  size  field
//!      0     2  packet_format (u16, protocol year)
//!      2     1  game_major_version
//!      3     1  game_minor_version
//!      4     1  packet_version
//!      5     1  packet_id
//!      6     8  session_uid
//!     14     4  session_time (f32, seconds)
//!     18     4  frame_identifier
//!     22     1  player_car_index
//!     23     1  secondary_player_car_index (255 when unused)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;
use crate::cursor::Cursor;

use super::PacketType;

/// Size of the common header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Protocol year announced in the header.
///
/// Unknown years are kept rather than rejected; whether to decode them is a
/// [`FormatPolicy`](super::FormatPolicy) decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PacketFormat {
    Format2019,
    Format2020,
    Format2021,
    Unknown(u16),
}

impl PacketFormat {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            2019 => PacketFormat::Format2019,
            2020 => PacketFormat::Format2020,
            2021 => PacketFormat::Format2021,
            other => PacketFormat::Unknown(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            PacketFormat::Format2019 => 2019,
            PacketFormat::Format2020 => 2020,
            PacketFormat::Format2021 => 2021,
            PacketFormat::Unknown(raw) => raw,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, PacketFormat::Unknown(_))
    }

    /// Whether the payload layouts this crate decodes match the format.
    /// Only 2020 does; 2019 has a shorter header and 2021 wider entries.
    pub fn is_supported(self) -> bool {
        self == PacketFormat::Format2020
    }
}

impl fmt::Display for PacketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketFormat::Unknown(raw) => write!(f, "unknown ({raw})"),
            known => write!(f, "{}", known.raw()),
        }
    }
}

/// Decoded common header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PacketHeader {
    pub packet_format: PacketFormat,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    /// Declared packet type tag, resolved by [`PacketHeader::packet_type`].
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Decode the header from the start of a datagram.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes, "packet header");
        Self::read(&mut cursor)
    }

    /// Decode the header at the cursor's current position.
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            packet_format: PacketFormat::from_raw(cursor.read_u16()?),
            game_major_version: cursor.read_u8()?,
            game_minor_version: cursor.read_u8()?,
            packet_version: cursor.read_u8()?,
            packet_id: cursor.read_u8()?,
            session_uid: cursor.read_u64()?,
            session_time: cursor.read_f32()?,
            frame_identifier: cursor.read_u32()?,
            player_car_index: cursor.read_u8()?,
            secondary_player_car_index: cursor.read_u8()?,
        })
    }

    /// Read only the packet format code.
    pub fn peek_format(bytes: &[u8]) -> Result<PacketFormat> {
        let mut cursor = Cursor::new(bytes, "packet format");
        Ok(PacketFormat::from_raw(cursor.read_u16()?))
    }

    /// Resolve the declared packet type. Unknown ids are an error.
    pub fn packet_type(&self) -> Result<PacketType> {
        PacketType::try_from(self.packet_id)
    }

    /// `"major.minor"` game version string.
    pub fn game_version(&self) -> String {
        format!("{}.{}", self.game_major_version, self.game_minor_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;
    use crate::test_utils::PacketBuilder;

    #[test]
    fn decodes_format_and_version_bytes() -> Result<()> {
        let bytes = [0xE4, 0x07, 1, 24];
        let mut cursor = Cursor::new(&bytes, "format");
        let format = PacketFormat::from_raw(cursor.read_u16()?);
        assert_eq!(format, PacketFormat::Format2020);
        assert_eq!(format.to_string(), "2020");
        assert_eq!(cursor.read_u8()?, 1);
        assert_eq!(cursor.read_u8()?, 24);
        Ok(())
    }

    #[test]
    fn parses_all_header_fields() -> Result<()> {
        let bytes = PacketBuilder::new()
            .u16(2020)
            .u8(1)
            .u8(24)
            .u8(1)
            .u8(6)
            .u64(0xDEAD_BEEF_0000_0001)
            .f32(734.5)
            .u32(18_000)
            .u8(19)
            .u8(255)
            .build();

        let header = PacketHeader::parse(&bytes)?;
        assert_eq!(header.packet_format, PacketFormat::Format2020);
        assert!(header.packet_format.is_supported());
        assert!(!PacketFormat::Format2021.is_supported());
        assert_eq!(header.game_version(), "1.24");
        assert_eq!(header.packet_version, 1);
        assert_eq!(header.packet_type()?, PacketType::CarTelemetry);
        assert_eq!(header.session_uid, 0xDEAD_BEEF_0000_0001);
        assert_eq!(header.session_time, 734.5);
        assert_eq!(header.frame_identifier, 18_000);
        assert_eq!(header.player_car_index, 19);
        assert_eq!(header.secondary_player_car_index, 255);
        Ok(())
    }

    #[test]
    fn unknown_format_is_not_an_error() -> Result<()> {
        let bytes = PacketBuilder::header(2017, PacketType::Session).build();
        let header = PacketHeader::parse(&bytes)?;
        assert_eq!(header.packet_format, PacketFormat::Unknown(2017));
        assert!(!header.packet_format.is_known());
        assert!(!header.packet_format.is_supported());
        assert_eq!(header.packet_format.to_string(), "unknown (2017)");
        assert_eq!(PacketHeader::peek_format(&bytes)?, PacketFormat::Unknown(2017));
        Ok(())
    }

    #[test]
    fn unknown_packet_id_is_rejected_on_resolution() -> Result<()> {
        let mut bytes = PacketBuilder::header(2020, PacketType::Motion).build();
        bytes[5] = 14;
        let header = PacketHeader::parse(&bytes)?;
        assert!(matches!(header.packet_type(), Err(TelemetryError::UnknownPacketType { id: 14 })));
        Ok(())
    }

    #[test]
    fn truncated_header_fails() {
        let bytes = PacketBuilder::header(2020, PacketType::Motion).build();
        let err = PacketHeader::parse(&bytes[..HEADER_SIZE - 1]).expect_err("header is short");
        assert!(matches!(err, TelemetryError::IndexOutOfRange { label: "packet header", .. }));
    }
}
