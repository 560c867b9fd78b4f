//! Car setups packet (id 5). Other cars' setups are zeroed in online sessions.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarSetup {
    pub front_wing: u8,
    pub rear_wing: u8,
    /// Differential adjustment on throttle, percent.
    pub on_throttle: u8,
    /// Differential adjustment off throttle, percent.
    pub off_throttle: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    /// Percent.
    pub brake_pressure: u8,
    /// Percent.
    pub brake_bias: u8,
    /// PSI.
    pub rear_left_tyre_pressure: f32,
    pub rear_right_tyre_pressure: f32,
    pub front_left_tyre_pressure: f32,
    pub front_right_tyre_pressure: f32,
    pub ballast: u8,
    pub fuel_load: f32,
}

impl CarSetup {
    pub const SIZE: usize = 49;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            front_wing: cursor.read_u8()?,
            rear_wing: cursor.read_u8()?,
            on_throttle: cursor.read_u8()?,
            off_throttle: cursor.read_u8()?,
            front_camber: cursor.read_f32()?,
            rear_camber: cursor.read_f32()?,
            front_toe: cursor.read_f32()?,
            rear_toe: cursor.read_f32()?,
            front_suspension: cursor.read_u8()?,
            rear_suspension: cursor.read_u8()?,
            front_anti_roll_bar: cursor.read_u8()?,
            rear_anti_roll_bar: cursor.read_u8()?,
            front_suspension_height: cursor.read_u8()?,
            rear_suspension_height: cursor.read_u8()?,
            brake_pressure: cursor.read_u8()?,
            brake_bias: cursor.read_u8()?,
            rear_left_tyre_pressure: cursor.read_f32()?,
            rear_right_tyre_pressure: cursor.read_f32()?,
            front_left_tyre_pressure: cursor.read_f32()?,
            front_right_tyre_pressure: cursor.read_f32()?,
            ballast: cursor.read_u8()?,
            fuel_load: cursor.read_f32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarSetupsPacket {
    pub header: PacketHeader,
    pub cars: Vec<CarSetup>,
}

impl CarSetupsPacket {
    pub const SIZE: usize = HEADER_SIZE + CAR_COUNT * CarSetup::SIZE;
}

impl PacketPayload for CarSetupsPacket {
    const PACKET_TYPE: PacketType = PacketType::CarSetups;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self { header, cars: read_entries(cursor, CAR_COUNT, CarSetup::read)? })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
