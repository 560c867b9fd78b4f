//! Final classification packet (id 8), sent once at the end of a race.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::enums::{ActualTyreCompound, ResultStatus, VisualTyreCompound};
use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

/// Tyre stint slots per car.
pub const MAX_TYRE_STINTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FinalClassification {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: ResultStatus,
    /// Seconds.
    pub best_lap_time: f32,
    /// Seconds, without penalties.
    pub total_race_time: f64,
    /// Seconds.
    pub penalties_time: u8,
    pub num_penalties: u8,
    /// Number of valid entries in the stint arrays.
    pub num_tyre_stints: u8,
    pub tyre_stints_actual: [ActualTyreCompound; MAX_TYRE_STINTS],
    pub tyre_stints_visual: [VisualTyreCompound; MAX_TYRE_STINTS],
}

impl FinalClassification {
    pub const SIZE: usize = 37;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            position: cursor.read_u8()?,
            num_laps: cursor.read_u8()?,
            grid_position: cursor.read_u8()?,
            points: cursor.read_u8()?,
            num_pit_stops: cursor.read_u8()?,
            result_status: cursor.read_enum()?,
            best_lap_time: cursor.read_f32()?,
            total_race_time: cursor.read_f64()?,
            penalties_time: cursor.read_u8()?,
            num_penalties: cursor.read_u8()?,
            num_tyre_stints: cursor.read_u8()?,
            tyre_stints_actual: cursor.read_enum_array()?,
            tyre_stints_visual: cursor.read_enum_array()?,
        })
    }

    /// Compounds actually run, limited to `num_tyre_stints`.
    pub fn stints(&self) -> &[ActualTyreCompound] {
        let count = usize::from(self.num_tyre_stints).min(MAX_TYRE_STINTS);
        &self.tyre_stints_actual[..count]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FinalClassificationPacket {
    pub header: PacketHeader,
    pub num_cars: u8,
    pub cars: Vec<FinalClassification>,
}

impl FinalClassificationPacket {
    pub const SIZE: usize = HEADER_SIZE + 1 + CAR_COUNT * FinalClassification::SIZE;

    /// Classified cars ordered by finishing position.
    pub fn standings(&self) -> Vec<&FinalClassification> {
        let count = usize::from(self.num_cars).min(self.cars.len());
        let mut standings: Vec<_> = self.cars[..count].iter().collect();
        standings.sort_by_key(|car| car.position);
        standings
    }
}

impl PacketPayload for FinalClassificationPacket {
    const PACKET_TYPE: PacketType = PacketType::FinalClassification;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let num_cars = cursor.read_u8()?;
        let cars = read_entries(cursor, CAR_COUNT, FinalClassification::read)?;
        Ok(Self { header, num_cars, cars })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
