//! Car status packet (id 7): fuel, tyres, damage and ERS.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cursor::Cursor;

use super::enums::{
    ActualTyreCompound, ErsDeployMode, FiaFlag, FuelMix, TractionControl, VisualTyreCompound,
};
use super::header::{HEADER_SIZE, PacketHeader};
use super::{CAR_COUNT, PacketPayload, PacketType, read_entries};

/// Status of one car. Wheel arrays are ordered RL, RR, FL, FR and damage
/// values are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarStatus {
    pub traction_control: TractionControl,
    pub anti_lock_brakes: bool,
    pub fuel_mix: FuelMix,
    pub front_brake_bias: u8,
    pub pit_limiter_status: bool,
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    /// Value shown on the MFD.
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: bool,
    /// Metres until DRS becomes available, 0 when not available.
    pub drs_activation_distance: u16,
    pub tyres_wear: [u8; 4],
    pub actual_tyre_compound: ActualTyreCompound,
    pub visual_tyre_compound: VisualTyreCompound,
    pub tyres_age_laps: u8,
    pub tyres_damage: [u8; 4],
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub drs_fault: bool,
    pub engine_damage: u8,
    pub gear_box_damage: u8,
    pub vehicle_fia_flags: FiaFlag,
    /// Joules.
    pub ers_store_energy: f32,
    pub ers_deploy_mode: ErsDeployMode,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
}

impl CarStatus {
    pub const SIZE: usize = 60;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            traction_control: cursor.read_enum()?,
            anti_lock_brakes: cursor.read_bool()?,
            fuel_mix: cursor.read_enum()?,
            front_brake_bias: cursor.read_u8()?,
            pit_limiter_status: cursor.read_bool()?,
            fuel_in_tank: cursor.read_f32()?,
            fuel_capacity: cursor.read_f32()?,
            fuel_remaining_laps: cursor.read_f32()?,
            max_rpm: cursor.read_u16()?,
            idle_rpm: cursor.read_u16()?,
            max_gears: cursor.read_u8()?,
            drs_allowed: cursor.read_bool()?,
            drs_activation_distance: cursor.read_u16()?,
            tyres_wear: cursor.read_u8_array()?,
            actual_tyre_compound: cursor.read_enum()?,
            visual_tyre_compound: cursor.read_enum()?,
            tyres_age_laps: cursor.read_u8()?,
            tyres_damage: cursor.read_u8_array()?,
            front_left_wing_damage: cursor.read_u8()?,
            front_right_wing_damage: cursor.read_u8()?,
            rear_wing_damage: cursor.read_u8()?,
            drs_fault: cursor.read_bool()?,
            engine_damage: cursor.read_u8()?,
            gear_box_damage: cursor.read_u8()?,
            vehicle_fia_flags: cursor.read_signed_enum()?,
            ers_store_energy: cursor.read_f32()?,
            ers_deploy_mode: cursor.read_enum()?,
            ers_harvested_this_lap_mguk: cursor.read_f32()?,
            ers_harvested_this_lap_mguh: cursor.read_f32()?,
            ers_deployed_this_lap: cursor.read_f32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarStatusPacket {
    pub header: PacketHeader,
    pub cars: Vec<CarStatus>,
}

impl CarStatusPacket {
    pub const SIZE: usize = HEADER_SIZE + CAR_COUNT * CarStatus::SIZE;
}

impl PacketPayload for CarStatusPacket {
    const PACKET_TYPE: PacketType = PacketType::CarStatus;

    fn decode(header: PacketHeader, cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self { header, cars: read_entries(cursor, CAR_COUNT, CarStatus::read)? })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }
}
