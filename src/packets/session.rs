//! Session packet (id 1): weather, track and session state.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::enums::{FiaFlag, Formula, SafetyCarStatus, SessionType, Weather};
use super::header::{HEADER_SIZE, PacketHeader};
use super::{PacketPayload, PacketType, read_entries};

/// Slots reserved for marshal zones on the wire.
pub const MARSHAL_ZONE_SLOTS: usize = 21;
/// Slots reserved for weather forecast samples on the wire.
pub const FORECAST_SLOTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct MarshalZone {
    /// Fraction (0..1) of the lap where the zone starts.
    pub zone_start: f32,
    pub zone_flag: FiaFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct WeatherForecastSample {
    pub session_type: SessionType,
    /// Minutes from now.
    pub time_offset: u8,
    pub weather: Weather,
    pub track_temperature: i8,
    pub air_temperature: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionPacket {
    pub header: PacketHeader,
    pub weather: Weather,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    /// Metres.
    pub track_length: u16,
    pub session_type: SessionType,
    /// Raw track id, -1 when unknown.
    pub track_id: i8,
    pub formula: Formula,
    /// Seconds.
    pub session_time_left: u16,
    /// Seconds.
    pub session_duration: u16,
    /// km/h.
    pub pit_speed_limit: u8,
    pub game_paused: bool,
    pub is_spectating: bool,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: bool,
    /// Active marshal zones only; unused wire slots are dropped.
    pub marshal_zones: Vec<MarshalZone>,
    pub safety_car_status: SafetyCarStatus,
    pub network_game: bool,
    /// Active forecast samples only; unused wire slots are dropped.
    pub weather_forecast_samples: Vec<WeatherForecastSample>,
}

impl SessionPacket {
    pub const SIZE: usize = HEADER_SIZE + 19 + MARSHAL_ZONE_SLOTS * 5 + 3 + FORECAST_SLOTS * 5;
}

impl PacketPayload for SessionPacket {
    const PACKET_TYPE: PacketType = PacketType::Session;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let weather = cursor.read_enum()?;
        let track_temperature = cursor.read_i8()?;
        let air_temperature = cursor.read_i8()?;
        let total_laps = cursor.read_u8()?;
        let track_length = cursor.read_u16()?;
        let session_type = cursor.read_enum()?;
        let track_id = cursor.read_i8()?;
        let formula = cursor.read_enum()?;
        let session_time_left = cursor.read_u16()?;
        let session_duration = cursor.read_u16()?;
        let pit_speed_limit = cursor.read_u8()?;
        let game_paused = cursor.read_bool()?;
        let is_spectating = cursor.read_bool()?;
        let spectator_car_index = cursor.read_u8()?;
        let sli_pro_native_support = cursor.read_bool()?;

        let num_marshal_zones = usize::from(cursor.read_u8()?).min(MARSHAL_ZONE_SLOTS);
        let mut marshal_zones = read_entries(cursor, MARSHAL_ZONE_SLOTS, |c| {
            Ok(MarshalZone { zone_start: c.read_f32()?, zone_flag: c.read_signed_enum()? })
        })?;
        marshal_zones.truncate(num_marshal_zones);

        let safety_car_status = cursor.read_enum()?;
        let network_game = cursor.read_bool()?;

        let num_samples = usize::from(cursor.read_u8()?).min(FORECAST_SLOTS);
        let mut weather_forecast_samples = read_entries(cursor, FORECAST_SLOTS, |c| {
            Ok(WeatherForecastSample {
                session_type: c.read_enum()?,
                time_offset: c.read_u8()?,
                weather: c.read_enum()?,
                track_temperature: c.read_i8()?,
                air_temperature: c.read_i8()?,
            })
        })?;
        weather_forecast_samples.truncate(num_samples);

        Ok(Self {
            header,
            weather,
            track_temperature,
            air_temperature,
            total_laps,
            track_length,
            session_type,
            track_id,
            formula,
            session_time_left,
            session_duration,
            pit_speed_limit,
            game_paused,
            is_spectating,
            spectator_car_index,
            sli_pro_native_support,
            marshal_zones,
            safety_car_status,
            network_game,
            weather_forecast_samples,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::{Packet, decode_packet};
    use crate::test_utils::PacketBuilder;

    fn session_bytes() -> Vec<u8> {
        let mut builder = PacketBuilder::header(2020, PacketType::Session)
            .u8(3) // light rain
            .i8(31)
            .i8(24)
            .u8(58)
            .u16(5_412)
            .u8(10) // race
            .i8(-1)
            .u8(0)
            .u16(3_600)
            .u16(7_200)
            .u8(80)
            .u8(2) // game_paused: not literally 1
            .u8(1)
            .u8(4)
            .u8(0)
            .u8(2); // two marshal zones
        builder = builder.f32(0.1).i8(3).f32(0.55).i8(-1);
        for _ in 2..MARSHAL_ZONE_SLOTS {
            builder = builder.f32(0.0).i8(0);
        }
        builder = builder.u8(2).u8(1).u8(1);
        builder = builder.u8(10).u8(15).u8(4).i8(29).i8(22);
        builder.pad_to(SessionPacket::SIZE).build()
    }

    #[test]
    fn decodes_session_fields() -> Result<()> {
        let bytes = session_bytes();
        assert_eq!(bytes.len(), 251);

        let Packet::Session(session) = decode_packet(&bytes)? else {
            panic!("expected session packet");
        };
        assert_eq!(session.weather, Weather::LightRain);
        assert_eq!(session.track_temperature, 31);
        assert_eq!(session.total_laps, 58);
        assert_eq!(session.track_length, 5_412);
        assert_eq!(session.session_type, SessionType::Race);
        assert_eq!(session.track_id, -1);
        assert_eq!(session.formula, Formula::F1Modern);
        assert_eq!(session.session_duration, 7_200);
        assert!(!session.game_paused, "only byte value 1 is true");
        assert!(session.is_spectating);
        assert_eq!(session.safety_car_status, SafetyCarStatus::Virtual);
        assert!(session.network_game);
        Ok(())
    }

    #[test]
    fn keeps_only_announced_zones_and_samples() -> Result<()> {
        let Packet::Session(session) = decode_packet(&session_bytes())? else {
            panic!("expected session packet");
        };
        assert_eq!(
            session.marshal_zones,
            vec![
                MarshalZone { zone_start: 0.1, zone_flag: FiaFlag::Yellow },
                MarshalZone { zone_start: 0.55, zone_flag: FiaFlag::Invalid },
            ]
        );
        assert_eq!(
            session.weather_forecast_samples,
            vec![WeatherForecastSample {
                session_type: SessionType::Race,
                time_offset: 15,
                weather: Weather::HeavyRain,
                track_temperature: 29,
                air_temperature: 22,
            }]
        );
        Ok(())
    }
}
