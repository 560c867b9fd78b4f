//! Car telemetry packet (id 6): driver inputs and temperatures.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

/// Wheel arrays are ordered RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarTelemetry {
    /// km/h.
    pub speed: u16,
    /// 0.0 to 1.0.
    pub throttle: f32,
    /// -1.0 (full left) to 1.0 (full right).
    pub steer: f32,
    pub brake: f32,
    /// 0 to 100.
    pub clutch: u8,
    /// -1 reverse, 0 neutral.
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: bool,
    pub rev_lights_percent: u8,
    /// Celsius.
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    /// PSI.
    pub tyres_pressure: [f32; 4],
    /// Raw surface ids under each wheel.
    pub surface_type: [u8; 4],
}

impl CarTelemetry {
    pub const SIZE: usize = 58;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            speed: cursor.read_u16()?,
            throttle: cursor.read_f32()?,
            steer: cursor.read_f32()?,
            brake: cursor.read_f32()?,
            clutch: cursor.read_u8()?,
            gear: cursor.read_i8()?,
            engine_rpm: cursor.read_u16()?,
            drs: cursor.read_bool()?,
            rev_lights_percent: cursor.read_u8()?,
            brakes_temperature: cursor.read_u16_array()?,
            tyres_surface_temperature: cursor.read_u8_array()?,
            tyres_inner_temperature: cursor.read_u8_array()?,
            engine_temperature: cursor.read_u16()?,
            tyres_pressure: cursor.read_f32_array()?,
            surface_type: cursor.read_u8_array()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarTelemetryPacket {
    pub header: PacketHeader,
    pub cars: Vec<CarTelemetry>,
    /// Bit flags of the buttons currently pressed.
    pub button_status: u32,
    /// 255 when the MFD is closed.
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    /// 0 when no gear is suggested.
    pub suggested_gear: i8,
}

impl CarTelemetryPacket {
    pub const SIZE: usize = HEADER_SIZE + CAR_COUNT * CarTelemetry::SIZE + 7;
}

impl PacketPayload for CarTelemetryPacket {
    const PACKET_TYPE: PacketType = PacketType::CarTelemetry;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let cars = read_entries(cursor, CAR_COUNT, CarTelemetry::read)?;
        Ok(Self {
            header,
            cars,
            button_status: cursor.read_u32()?,
            mfd_panel_index: cursor.read_u8()?,
            mfd_panel_index_secondary_player: cursor.read_u8()?,
            suggested_gear: cursor.read_i8()?,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
