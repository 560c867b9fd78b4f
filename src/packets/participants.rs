//! Participants packet (id 4): who is driving each car.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

/// Width of the NUL-padded name field.
pub const NAME_SIZE: usize = 48;

/// Read a NUL-padded name field, dropping the padding.
pub(crate) fn read_name(cursor: &mut Cursor<'_>) -> Result<String> {
    let mut name = cursor.read_string(NAME_SIZE)?;
    if let Some(end) = name.find('\0') {
        name.truncate(end);
    }
    Ok(name)
}

/// One driver entry. Team, driver and nationality ids are raw game ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Participant {
    pub ai_controlled: bool,
    pub driver_id: u8,
    pub team_id: u8,
    pub race_number: u8,
    pub nationality: u8,
    pub name: String,
    /// Whether the player allows their telemetry to be broadcast.
    pub telemetry_public: bool,
}

impl Participant {
    pub const SIZE: usize = 54;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            ai_controlled: cursor.read_bool()?,
            driver_id: cursor.read_u8()?,
            team_id: cursor.read_u8()?,
            race_number: cursor.read_u8()?,
            nationality: cursor.read_u8()?,
            name: read_name(cursor)?,
            telemetry_public: cursor.read_bool()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ParticipantsPacket {
    pub header: PacketHeader,
    pub num_active_cars: u8,
    /// All wire slots; entries past `num_active_cars` are unused.
    pub participants: Vec<Participant>,
}

impl ParticipantsPacket {
    pub const SIZE: usize = HEADER_SIZE + 1 + CAR_COUNT * Participant::SIZE;

    /// Entries for cars that are actually in the session.
    pub fn active(&self) -> &[Participant] {
        let count = usize::from(self.num_active_cars).min(self.participants.len());
        &self.participants[..count]
    }
}

impl PacketPayload for ParticipantsPacket {
    const PACKET_TYPE: PacketType = PacketType::Participants;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let num_active_cars = cursor.read_u8()?;
        let participants = read_entries(cursor, CAR_COUNT, Participant::read)?;
        Ok(Self { header, num_active_cars, participants })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
