//! Motion packet (id 0): per-car physics plus extra data for the player car.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

/// World-space motion of one car. Directions are normalised to `i16` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarMotion {
    pub world_position: [f32; 3],
    pub world_velocity: [f32; 3],
    pub world_forward_dir: [i16; 3],
    pub world_right_dir: [i16; 3],
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl CarMotion {
    pub const SIZE: usize = 60;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            world_position: cursor.read_f32_array()?,
            world_velocity: cursor.read_f32_array()?,
            world_forward_dir: read_i16_triplet(cursor)?,
            world_right_dir: read_i16_triplet(cursor)?,
            g_force_lateral: cursor.read_f32()?,
            g_force_longitudinal: cursor.read_f32()?,
            g_force_vertical: cursor.read_f32()?,
            yaw: cursor.read_f32()?,
            pitch: cursor.read_f32()?,
            roll: cursor.read_f32()?,
        })
    }
}

/// Extra motion data sent only for the player car. Wheel arrays are ordered
/// RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PlayerMotion {
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip: [f32; 4],
    pub local_velocity: [f32; 3],
    pub angular_velocity: [f32; 3],
    pub angular_acceleration: [f32; 3],
    /// Front wheel angle in radians.
    pub front_wheels_angle: f32,
}

impl PlayerMotion {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            suspension_position: cursor.read_f32_array()?,
            suspension_velocity: cursor.read_f32_array()?,
            suspension_acceleration: cursor.read_f32_array()?,
            wheel_speed: cursor.read_f32_array()?,
            wheel_slip: cursor.read_f32_array()?,
            local_velocity: cursor.read_f32_array()?,
            angular_velocity: cursor.read_f32_array()?,
            angular_acceleration: cursor.read_f32_array()?,
            front_wheels_angle: cursor.read_f32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct MotionPacket {
    pub header: PacketHeader,
    pub cars: Vec<CarMotion>,
    pub player: PlayerMotion,
}

impl MotionPacket {
    pub const SIZE: usize = HEADER_SIZE + CAR_COUNT * CarMotion::SIZE + 120;
}

impl PacketPayload for MotionPacket {
    const PACKET_TYPE: PacketType = PacketType::Motion;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        let cars = read_entries(cursor, CAR_COUNT, CarMotion::read)?;
        let player = PlayerMotion::read(cursor)?;
        Ok(Self { header, cars, player })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}

fn read_i16_triplet(cursor: &mut Cursor<'_>) -> Result<[i16; 3]> {
    Ok([cursor.read_i16()?, cursor.read_i16()?, cursor.read_i16()?])
}
