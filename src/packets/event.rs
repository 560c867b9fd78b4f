//! Event packets and their second-level dispatch.
//!
//! An event packet carries a four-character ASCII code right after the common
//! header. Five codes have no payload; the other six carry a small record that
//! always starts at [`EVENT_DETAILS_OFFSET`].
//!
//! | Code   | Event               | Payload                                   |
//! |--------|---------------------|-------------------------------------------|
//! | `SSTA` | Session started     | -                                         |
//! | `SEND` | Session ended       | -                                         |
//! | `FTLP` | Fastest lap         | `u8` vehicle index, `f32` lap time (s)    |
//! | `RTMT` | Retirement          | `u8` vehicle index                        |
//! | `DRSE` | DRS enabled         | -                                         |
//! | `DRSD` | DRS disabled        | -                                         |
//! | `TMPT` | Team mate in pits   | `u8` vehicle index                        |
//! | `CHQF` | Chequered flag      | -                                         |
//! | `RCWN` | Race winner         | `u8` vehicle index                        |
//! | `PENA` | Penalty issued      | seven `u8` fields, see [`Penalty`]        |
//! | `SPTP` | Speed trap          | `u8` vehicle index, `f32` speed (km/h)    |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cursor::Cursor;
use crate::{Result, TelemetryError};

use super::enums::PenaltyType;
use super::header::{HEADER_SIZE, PacketHeader};
use super::{PacketPayload, PacketType};

/// Width of the event code field.
pub const EVENT_CODE_SIZE: usize = 4;

/// Offset of the event payload: common header plus event code.
pub const EVENT_DETAILS_OFFSET: usize = HEADER_SIZE + EVENT_CODE_SIZE;

/// Four-character event code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum EventCode {
    SessionStarted,
    SessionEnded,
    FastestLap,
    Retirement,
    DrsEnabled,
    DrsDisabled,
    TeamMateInPits,
    ChequeredFlag,
    RaceWinner,
    PenaltyIssued,
    SpeedTrapTriggered,
}

impl EventCode {
    pub const ALL: [EventCode; 11] = [
        EventCode::SessionStarted,
        EventCode::SessionEnded,
        EventCode::FastestLap,
        EventCode::Retirement,
        EventCode::DrsEnabled,
        EventCode::DrsDisabled,
        EventCode::TeamMateInPits,
        EventCode::ChequeredFlag,
        EventCode::RaceWinner,
        EventCode::PenaltyIssued,
        EventCode::SpeedTrapTriggered,
    ];

    pub const fn as_bytes(self) -> &'static [u8; EVENT_CODE_SIZE] {
        match self {
            EventCode::SessionStarted => b"SSTA",
            EventCode::SessionEnded => b"SEND",
            EventCode::FastestLap => b"FTLP",
            EventCode::Retirement => b"RTMT",
            EventCode::DrsEnabled => b"DRSE",
            EventCode::DrsDisabled => b"DRSD",
            EventCode::TeamMateInPits => b"TMPT",
            EventCode::ChequeredFlag => b"CHQF",
            EventCode::RaceWinner => b"RCWN",
            EventCode::PenaltyIssued => b"PENA",
            EventCode::SpeedTrapTriggered => b"SPTP",
        }
    }

    pub fn from_bytes(code: &[u8]) -> Result<Self> {
        EventCode::ALL
            .into_iter()
            .find(|known| known.as_bytes().as_slice() == code)
            .ok_or_else(|| TelemetryError::unknown_event_code(code))
    }

    /// Whether this event carries a payload after the code.
    pub const fn has_details(self) -> bool {
        matches!(
            self,
            EventCode::FastestLap
                | EventCode::Retirement
                | EventCode::TeamMateInPits
                | EventCode::RaceWinner
                | EventCode::PenaltyIssued
                | EventCode::SpeedTrapTriggered
        )
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(std::str::from_utf8(self.as_bytes()).unwrap_or("????"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FastestLap {
    pub vehicle_idx: u8,
    /// Lap time in seconds.
    pub lap_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Retirement {
    pub vehicle_idx: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TeamMateInPits {
    pub vehicle_idx: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RaceWinner {
    pub vehicle_idx: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Penalty {
    pub penalty_type: PenaltyType,
    /// Raw infringement id; the game documents several dozen of them.
    pub infringement_type: u8,
    pub vehicle_idx: u8,
    /// Other car involved, 255 when none.
    pub other_vehicle_idx: u8,
    /// Time gained or spent doing the action, in seconds.
    pub time: u8,
    pub lap_num: u8,
    pub places_gained: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SpeedTrap {
    pub vehicle_idx: u8,
    /// Trap speed in km/h.
    pub speed: f32,
}

/// Decoded event kind with its payload, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Event {
    SessionStarted,
    SessionEnded,
    FastestLap(FastestLap),
    Retirement(Retirement),
    DrsEnabled,
    DrsDisabled,
    TeamMateInPits(TeamMateInPits),
    ChequeredFlag,
    RaceWinner(RaceWinner),
    Penalty(Penalty),
    SpeedTrap(SpeedTrap),
}

impl Event {
    pub fn code(&self) -> EventCode {
        match self {
            Event::SessionStarted => EventCode::SessionStarted,
            Event::SessionEnded => EventCode::SessionEnded,
            Event::FastestLap(_) => EventCode::FastestLap,
            Event::Retirement(_) => EventCode::Retirement,
            Event::DrsEnabled => EventCode::DrsEnabled,
            Event::DrsDisabled => EventCode::DrsDisabled,
            Event::TeamMateInPits(_) => EventCode::TeamMateInPits,
            Event::ChequeredFlag => EventCode::ChequeredFlag,
            Event::RaceWinner(_) => EventCode::RaceWinner,
            Event::Penalty(_) => EventCode::PenaltyIssued,
            Event::SpeedTrap(_) => EventCode::SpeedTrapTriggered,
        }
    }

    /// Car the event refers to, for events that name one.
    pub fn vehicle_idx(&self) -> Option<u8> {
        match self {
            Event::FastestLap(e) => Some(e.vehicle_idx),
            Event::Retirement(e) => Some(e.vehicle_idx),
            Event::TeamMateInPits(e) => Some(e.vehicle_idx),
            Event::RaceWinner(e) => Some(e.vehicle_idx),
            Event::Penalty(e) => Some(e.vehicle_idx),
            Event::SpeedTrap(e) => Some(e.vehicle_idx),
            _ => None,
        }
    }

    /// Decode the event for `code`, re-seeking to the payload offset first.
    fn read(code: EventCode, cursor: &mut Cursor<'_>) -> Result<Self> {
        if code.has_details() {
            cursor.seek(EVENT_DETAILS_OFFSET)?;
        }

        Ok(match code {
            EventCode::SessionStarted => Event::SessionStarted,
            EventCode::SessionEnded => Event::SessionEnded,
            EventCode::DrsEnabled => Event::DrsEnabled,
            EventCode::DrsDisabled => Event::DrsDisabled,
            EventCode::ChequeredFlag => Event::ChequeredFlag,
            EventCode::FastestLap => Event::FastestLap(FastestLap {
                vehicle_idx: cursor.read_u8()?,
                lap_time: cursor.read_f32()?,
            }),
            EventCode::Retirement => Event::Retirement(Retirement { vehicle_idx: cursor.read_u8()? }),
            EventCode::TeamMateInPits => {
                Event::TeamMateInPits(TeamMateInPits { vehicle_idx: cursor.read_u8()? })
            }
            EventCode::RaceWinner => Event::RaceWinner(RaceWinner { vehicle_idx: cursor.read_u8()? }),
            EventCode::PenaltyIssued => Event::Penalty(Penalty {
                penalty_type: cursor.read_enum()?,
                infringement_type: cursor.read_u8()?,
                vehicle_idx: cursor.read_u8()?,
                other_vehicle_idx: cursor.read_u8()?,
                time: cursor.read_u8()?,
                lap_num: cursor.read_u8()?,
                places_gained: cursor.read_u8()?,
            }),
            EventCode::SpeedTrapTriggered => Event::SpeedTrap(SpeedTrap {
                vehicle_idx: cursor.read_u8()?,
                speed: cursor.read_f32()?,
            }),
        })
    }
}

/// Event packet (id 3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct EventPacket {
    pub header: PacketHeader,
    pub event: Event,
}

impl EventPacket {
    /// Size of the largest event datagram (penalty details).
    pub const SIZE: usize = EVENT_DETAILS_OFFSET + 7;

    pub fn code(&self) -> EventCode {
        self.event.code()
    }
}

impl PacketPayload for EventPacket {
    const PACKET_TYPE: PacketType = PacketType::Event;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let code = EventCode::from_bytes(cursor.read_bytes(EVENT_CODE_SIZE)?)?;
        let event = Event::read(code, cursor)?;
        Ok(Self { header, event })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::{Packet, decode_packet};
    use crate::test_utils::event_packet;

    fn decode_event(code: &[u8; 4], details: &[u8]) -> Result<EventPacket> {
        match decode_packet(&event_packet(2020, code, details))? {
            Packet::Event(event) => Ok(event),
            other => panic!("expected an event packet, got {:?}", other.packet_type()),
        }
    }

    #[test]
    fn fastest_lap_reads_vehicle_and_time_at_fixed_offset() -> Result<()> {
        let mut details = vec![7u8];
        details.extend_from_slice(&83.456f32.to_le_bytes());

        let packet = decode_event(b"FTLP", &details)?;
        assert_eq!(packet.code(), EventCode::FastestLap);
        assert_eq!(packet.event, Event::FastestLap(FastestLap { vehicle_idx: 7, lap_time: 83.456 }));
        assert_eq!(packet.event.vehicle_idx(), Some(7));
        Ok(())
    }

    #[test]
    fn payload_free_events_decode_to_their_code() -> Result<()> {
        for (code, expected) in [
            (b"SSTA", Event::SessionStarted),
            (b"SEND", Event::SessionEnded),
            (b"DRSE", Event::DrsEnabled),
            (b"DRSD", Event::DrsDisabled),
            (b"CHQF", Event::ChequeredFlag),
        ] {
            let packet = decode_event(code, &[])?;
            assert_eq!(packet.event, expected);
            assert_eq!(packet.code().as_bytes(), code);
            assert_eq!(packet.event.vehicle_idx(), None);
        }
        Ok(())
    }

    #[test]
    fn vehicle_only_events_decode() -> Result<()> {
        assert_eq!(
            decode_event(b"RTMT", &[3])?.event,
            Event::Retirement(Retirement { vehicle_idx: 3 })
        );
        assert_eq!(
            decode_event(b"TMPT", &[11])?.event,
            Event::TeamMateInPits(TeamMateInPits { vehicle_idx: 11 })
        );
        assert_eq!(
            decode_event(b"RCWN", &[0])?.event,
            Event::RaceWinner(RaceWinner { vehicle_idx: 0 })
        );
        Ok(())
    }

    #[test]
    fn penalty_and_speed_trap_decode() -> Result<()> {
        let penalty = decode_event(b"PENA", &[4, 7, 12, 255, 5, 18, 0])?;
        assert_eq!(
            penalty.event,
            Event::Penalty(Penalty {
                penalty_type: PenaltyType::TimePenalty,
                infringement_type: 7,
                vehicle_idx: 12,
                other_vehicle_idx: 255,
                time: 5,
                lap_num: 18,
                places_gained: 0,
            })
        );

        let mut details = vec![2u8];
        details.extend_from_slice(&331.7f32.to_le_bytes());
        let trap = decode_event(b"SPTP", &details)?;
        assert_eq!(trap.event, Event::SpeedTrap(SpeedTrap { vehicle_idx: 2, speed: 331.7 }));
        Ok(())
    }

    #[test]
    fn unknown_event_code_is_a_dispatch_error() {
        let err = decode_event(b"BUTN", &[]).expect_err("BUTN is not in the closed set");
        assert!(matches!(err, TelemetryError::UnknownEventCode { ref code } if code == "BUTN"));
    }

    #[test]
    fn missing_details_fail_with_bounds_error() {
        let bytes = event_packet(2020, b"FTLP", &[1]);
        let truncated = &bytes[..EVENT_DETAILS_OFFSET + 3];
        let err = decode_packet(truncated).expect_err("lap time is cut off");
        assert!(matches!(err, TelemetryError::IndexOutOfRange { label: "event packet", .. }));
    }

    #[test]
    fn code_display_matches_wire_text() {
        for code in EventCode::ALL {
            assert_eq!(code.to_string().as_bytes(), code.as_bytes());
            assert_eq!(EventCode::from_bytes(code.as_bytes()).ok(), Some(code));
        }
    }
}
