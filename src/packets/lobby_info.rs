//! Lobby info packet (id 9), sent while players wait in a multiplayer lobby.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::enums::ReadyStatus;
use super::header::{HEADER_SIZE, PacketHeader};
use super::participants::read_name;
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LobbyPlayer {
    pub ai_controlled: bool,
    /// 255 when no team is selected.
    pub team_id: u8,
    pub nationality: u8,
    pub name: String,
    pub ready_status: ReadyStatus,
}

impl LobbyPlayer {
    pub const SIZE: usize = 52;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            ai_controlled: cursor.read_bool()?,
            team_id: cursor.read_u8()?,
            nationality: cursor.read_u8()?,
            name: read_name(cursor)?,
            ready_status: cursor.read_enum()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LobbyInfoPacket {
    pub header: PacketHeader,
    pub num_players: u8,
    pub players: Vec<LobbyPlayer>,
}

impl LobbyInfoPacket {
    pub const SIZE: usize = HEADER_SIZE + 1 + CAR_COUNT * LobbyPlayer::SIZE;

    pub fn all_ready(&self) -> bool {
        let count = usize::from(self.num_players).min(self.players.len());
        self.players[..count].iter().all(|p| p.ready_status != ReadyStatus::NotReady)
    }
}

impl PacketPayload for LobbyInfoPacket {
    const PACKET_TYPE: PacketType = PacketType::LobbyInfo;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let num_players = cursor.read_u8()?;
        let players = read_entries(cursor, CAR_COUNT, LobbyPlayer::read)?;
        Ok(Self { header, num_players, players })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
