//! Lap data packet (id 2): timing and race position for every car.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::enums::{DriverStatus, PitStatus, ResultStatus, Sector};
use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapData {
    /// Seconds.
    pub last_lap_time: f32,
    /// Seconds.
    pub current_lap_time: f32,
    pub sector1_time_ms: u16,
    pub sector2_time_ms: u16,
    /// Seconds.
    pub best_lap_time: f32,
    pub best_lap_num: u8,
    pub best_lap_sector1_time_ms: u16,
    pub best_lap_sector2_time_ms: u16,
    pub best_lap_sector3_time_ms: u16,
    pub best_overall_sector1_time_ms: u16,
    pub best_overall_sector1_lap_num: u8,
    pub best_overall_sector2_time_ms: u16,
    pub best_overall_sector2_lap_num: u8,
    pub best_overall_sector3_time_ms: u16,
    pub best_overall_sector3_lap_num: u8,
    /// Metres around the current lap; negative before crossing the line.
    pub lap_distance: f32,
    /// Metres since the session started.
    pub total_distance: f32,
    /// Seconds, only meaningful under safety car.
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    pub pit_status: PitStatus,
    pub sector: Sector,
    pub current_lap_invalid: bool,
    /// Accumulated time penalties in seconds.
    pub penalties: u8,
    pub grid_position: u8,
    pub driver_status: DriverStatus,
    pub result_status: ResultStatus,
}

impl LapData {
    pub const SIZE: usize = 53;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            last_lap_time: cursor.read_f32()?,
            current_lap_time: cursor.read_f32()?,
            sector1_time_ms: cursor.read_u16()?,
            sector2_time_ms: cursor.read_u16()?,
            best_lap_time: cursor.read_f32()?,
            best_lap_num: cursor.read_u8()?,
            best_lap_sector1_time_ms: cursor.read_u16()?,
            best_lap_sector2_time_ms: cursor.read_u16()?,
            best_lap_sector3_time_ms: cursor.read_u16()?,
            best_overall_sector1_time_ms: cursor.read_u16()?,
            best_overall_sector1_lap_num: cursor.read_u8()?,
            best_overall_sector2_time_ms: cursor.read_u16()?,
            best_overall_sector2_lap_num: cursor.read_u8()?,
            best_overall_sector3_time_ms: cursor.read_u16()?,
            best_overall_sector3_lap_num: cursor.read_u8()?,
            lap_distance: cursor.read_f32()?,
            total_distance: cursor.read_f32()?,
            safety_car_delta: cursor.read_f32()?,
            car_position: cursor.read_u8()?,
            current_lap_num: cursor.read_u8()?,
            pit_status: cursor.read_enum()?,
            sector: cursor.read_enum()?,
            current_lap_invalid: cursor.read_bool()?,
            penalties: cursor.read_u8()?,
            grid_position: cursor.read_u8()?,
            driver_status: cursor.read_enum()?,
            result_status: cursor.read_enum()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapDataPacket {
    pub header: PacketHeader,
    pub cars: Vec<LapData>,
}

impl LapDataPacket {
    pub const SIZE: usize = HEADER_SIZE + CAR_COUNT * LapData::SIZE;
}

impl PacketPayload for LapDataPacket {
    const PACKET_TYPE: PacketType = PacketType::LapData;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self { header, cars: read_entries(cursor, CAR_COUNT, LapData::read)? })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
