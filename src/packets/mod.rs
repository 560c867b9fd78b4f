//! Packet model and type dispatch.
//!
//! Every datagram starts with a [`PacketHeader`]. Its `packet_id` selects one of
//! ten payload layouts; event packets branch again on a four-character code.
//!
//! ## Packet types
//!
//! | Id | Type                 | Size (bytes) |
//! |----|----------------------|--------------|
//! | 0  | Motion               | 1464         |
//! | 1  | Session              | 251          |
//! | 2  | Lap Data             | 1190         |
//! | 3  | Event                | 35           |
//! | 4  | Participants         | 1213         |
//! | 5  | Car Setups           | 1102         |
//! | 6  | Car Telemetry        | 1307         |
//! | 7  | Car Status           | 1344         |
//! | 8  | Final Classification | 839          |
//! | 9  | Lobby Info           | 1169         |
//!
//! ## Usage Example
//!
//! ```rust
//! use trackside::packets::{Packet, decode_packet};
//!
//! fn on_datagram(bytes: &[u8]) {
//!     match decode_packet(bytes) {
//!         Ok(Packet::Event(event)) => println!("event {}", event.code()),
//!         Ok(other) => println!("{:?} packet", other.packet_type()),
//!         Err(e) => eprintln!("dropping datagram: {e}"),
//!     }
//! }
//! # on_datagram(&[]);
//! ```

pub mod car_setups;
pub mod car_status;
pub mod car_telemetry;
pub mod enums;
pub mod event;
pub mod final_classification;
pub mod header;
pub mod lap_data;
pub mod lobby_info;
pub mod motion;
pub mod participants;
pub mod session;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cursor::Cursor;
use crate::{Result, TelemetryError};

pub use car_setups::{CarSetup, CarSetupsPacket};
pub use car_status::{CarStatus, CarStatusPacket};
pub use car_telemetry::{CarTelemetry, CarTelemetryPacket};
pub use enums::*;
pub use event::{
    Event, EventCode, EventPacket, FastestLap, Penalty, RaceWinner, Retirement, SpeedTrap,
    TeamMateInPits,
};
pub use final_classification::{FinalClassification, FinalClassificationPacket};
pub use header::{HEADER_SIZE, PacketFormat, PacketHeader};
pub use lap_data::{LapData, LapDataPacket};
pub use lobby_info::{LobbyInfoPacket, LobbyPlayer};
pub use motion::{CarMotion, MotionPacket, PlayerMotion};
pub use participants::{Participant, ParticipantsPacket};
pub use session::{MarshalZone, SessionPacket, WeatherForecastSample};

/// Number of car entries in every per-car array.
pub const CAR_COUNT: usize = 22;

/// Longest datagram any packet type produces (motion).
pub const MAX_PACKET_SIZE: usize = MotionPacket::SIZE;

/// Declared packet type tag. The set is closed: any other id is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PacketType {
    Motion,
    Session,
    LapData,
    Event,
    Participants,
    CarSetups,
    CarTelemetry,
    CarStatus,
    FinalClassification,
    LobbyInfo,
}

impl PacketType {
    pub const ALL: [PacketType; 10] = [
        PacketType::Motion,
        PacketType::Session,
        PacketType::LapData,
        PacketType::Event,
        PacketType::Participants,
        PacketType::CarSetups,
        PacketType::CarTelemetry,
        PacketType::CarStatus,
        PacketType::FinalClassification,
        PacketType::LobbyInfo,
    ];

    pub const fn id(self) -> u8 {
        match self {
            PacketType::Motion => 0,
            PacketType::Session => 1,
            PacketType::LapData => 2,
            PacketType::Event => 3,
            PacketType::Participants => 4,
            PacketType::CarSetups => 5,
            PacketType::CarTelemetry => 6,
            PacketType::CarStatus => 7,
            PacketType::FinalClassification => 8,
            PacketType::LobbyInfo => 9,
        }
    }

    /// Full datagram size of this packet type.
    pub const fn packet_size(self) -> usize {
        match self {
            PacketType::Motion => MotionPacket::SIZE,
            PacketType::Session => SessionPacket::SIZE,
            PacketType::LapData => LapDataPacket::SIZE,
            PacketType::Event => EventPacket::SIZE,
            PacketType::Participants => ParticipantsPacket::SIZE,
            PacketType::CarSetups => CarSetupsPacket::SIZE,
            PacketType::CarTelemetry => CarTelemetryPacket::SIZE,
            PacketType::CarStatus => CarStatusPacket::SIZE,
            PacketType::FinalClassification => FinalClassificationPacket::SIZE,
            PacketType::LobbyInfo => LobbyInfoPacket::SIZE,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = TelemetryError;

    fn try_from(id: u8) -> Result<Self> {
        PacketType::ALL
            .into_iter()
            .find(|packet_type| packet_type.id() == id)
            .ok_or_else(|| TelemetryError::unknown_packet_type(id))
    }
}

/// A payload layout that can be decoded once its header is known.
pub trait PacketPayload: Sized {
    /// Type tag this payload is dispatched on.
    const PACKET_TYPE: PacketType;

    /// Decode the payload. The cursor is positioned just past the header.
    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self>;

    /// Header the payload was decoded with.
    fn header(&self) -> &PacketHeader;
}

/// A fully decoded datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Packet {
    Motion(MotionPacket),
    Session(SessionPacket),
    LapData(LapDataPacket),
    Event(EventPacket),
    Participants(ParticipantsPacket),
    CarSetups(CarSetupsPacket),
    CarTelemetry(CarTelemetryPacket),
    CarStatus(CarStatusPacket),
    FinalClassification(FinalClassificationPacket),
    LobbyInfo(LobbyInfoPacket),
}

impl Packet {
    pub fn header(&self) -> &PacketHeader {
        match self {
            Packet::Motion(p) => p.header(),
            Packet::Session(p) => p.header(),
            Packet::LapData(p) => p.header(),
            Packet::Event(p) => p.header(),
            Packet::Participants(p) => p.header(),
            Packet::CarSetups(p) => p.header(),
            Packet::CarTelemetry(p) => p.header(),
            Packet::CarStatus(p) => p.header(),
            Packet::FinalClassification(p) => p.header(),
            Packet::LobbyInfo(p) => p.header(),
        }
    }

    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Motion(_) => PacketType::Motion,
            Packet::Session(_) => PacketType::Session,
            Packet::LapData(_) => PacketType::LapData,
            Packet::Event(_) => PacketType::Event,
            Packet::Participants(_) => PacketType::Participants,
            Packet::CarSetups(_) => PacketType::CarSetups,
            Packet::CarTelemetry(_) => PacketType::CarTelemetry,
            Packet::CarStatus(_) => PacketType::CarStatus,
            Packet::FinalClassification(_) => PacketType::FinalClassification,
            Packet::LobbyInfo(_) => PacketType::LobbyInfo,
        }
    }
}

/// What to do with datagrams whose packet format year is not 2020.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum FormatPolicy {
    /// Decode with the 2020 layouts regardless of the announced year.
    #[default]
    Accept,
    /// Fail any non-2020 datagram with [`TelemetryError::UnsupportedFormat`].
    RejectUnsupported,
}

/// Header parsing and type dispatch under a [`FormatPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    policy: FormatPolicy,
}

impl Dispatcher {
    pub fn new(policy: FormatPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FormatPolicy {
        self.policy
    }

    /// Decode one datagram into its packet variant.
    pub fn decode(&self, bytes: &[u8]) -> Result<Packet> {
        let mut cursor = Cursor::new(bytes, "packet header");
        let header = PacketHeader::read(&mut cursor)?;

        let format = header.packet_format;
        if self.policy == FormatPolicy::RejectUnsupported && !format.is_supported() {
            return Err(TelemetryError::UnsupportedFormat { format: header.packet_format.raw() });
        }

        let packet_type = header.packet_type()?;
        trace!(
            packet_type = ?packet_type,
            format = %header.packet_format,
            frame = header.frame_identifier,
            len = bytes.len(),
            "Dispatching packet"
        );

        Ok(match packet_type {
            PacketType::Motion => Packet::Motion(decode_payload(header, bytes)?),
            PacketType::Session => Packet::Session(decode_payload(header, bytes)?),
            PacketType::LapData => Packet::LapData(decode_payload(header, bytes)?),
            PacketType::Event => Packet::Event(decode_payload(header, bytes)?),
            PacketType::Participants => Packet::Participants(decode_payload(header, bytes)?),
            PacketType::CarSetups => Packet::CarSetups(decode_payload(header, bytes)?),
            PacketType::CarTelemetry => Packet::CarTelemetry(decode_payload(header, bytes)?),
            PacketType::CarStatus => Packet::CarStatus(decode_payload(header, bytes)?),
            PacketType::FinalClassification => {
                Packet::FinalClassification(decode_payload(header, bytes)?)
            }
            PacketType::LobbyInfo => Packet::LobbyInfo(decode_payload(header, bytes)?),
        })
    }
}

/// Decode one datagram, accepting any packet format year.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet> {
    Dispatcher::default().decode(bytes)
}

fn decode_payload<P: PacketPayload>(header: PacketHeader, bytes: &[u8]) -> Result<P> {
    let mut cursor = Cursor::at(bytes, HEADER_SIZE, payload_label(P::PACKET_TYPE))?;
    P::decode(header, &mut cursor)
}

fn payload_label(packet_type: PacketType) -> &'static str {
    match packet_type {
        PacketType::Motion => "motion packet",
        PacketType::Session => "session packet",
        PacketType::LapData => "lap data packet",
        PacketType::Event => "event packet",
        PacketType::Participants => "participants packet",
        PacketType::CarSetups => "car setups packet",
        PacketType::CarTelemetry => "car telemetry packet",
        PacketType::CarStatus => "car status packet",
        PacketType::FinalClassification => "final classification packet",
        PacketType::LobbyInfo => "lobby info packet",
    }
}

/// Decode `count` consecutive fixed-size entries.
pub(crate) fn read_entries<T>(
    cursor: &mut Cursor<'_>,
    count: usize,
    mut read: impl FnMut(&mut Cursor<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(read(cursor)?);
    }
    Ok(entries)
}
