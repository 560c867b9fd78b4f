//! Wire enumerations shared by the packet decoders.
//!
//! Each enum is decoded from a single byte through [`WireEnum`]. Values the
//! game sends that are not listed here decode to `Unknown(raw)` instead of
//! failing the packet.

use serde::{Deserialize, Serialize};

use crate::cursor::WireEnum;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "tauri", derive(specta::Type))]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
            /// A value outside the documented set.
            Unknown(i16),
        }

        impl WireEnum for $name {
            fn from_wire(raw: i16) -> Self {
                match raw {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            fn to_wire(self) -> i16 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(raw) => raw,
                }
            }
        }
    };
}

wire_enum! {
    /// Track weather.
    pub enum Weather {
        Clear = 0,
        LightCloud = 1,
        Overcast = 2,
        LightRain = 3,
        HeavyRain = 4,
        Storm = 5,
    }
}

wire_enum! {
    /// Session kind. `Unspecified` is the game's "unknown" value 0.
    pub enum SessionType {
        Unspecified = 0,
        Practice1 = 1,
        Practice2 = 2,
        Practice3 = 3,
        ShortPractice = 4,
        Qualifying1 = 5,
        Qualifying2 = 6,
        Qualifying3 = 7,
        ShortQualifying = 8,
        OneShotQualifying = 9,
        Race = 10,
        Race2 = 11,
        TimeTrial = 12,
    }
}

wire_enum! {
    /// Car formula for the session.
    pub enum Formula {
        F1Modern = 0,
        F1Classic = 1,
        F2 = 2,
        F1Generic = 3,
    }
}

wire_enum! {
    pub enum SafetyCarStatus {
        NoSafetyCar = 0,
        Full = 1,
        Virtual = 2,
    }
}

wire_enum! {
    /// Flag shown in a marshal zone or to a car. Sent as a signed byte.
    pub enum FiaFlag {
        Invalid = -1,
        NoFlag = 0,
        Green = 1,
        Blue = 2,
        Yellow = 3,
        Red = 4,
    }
}

wire_enum! {
    pub enum PitStatus {
        NoPit = 0,
        Pitting = 1,
        InPitArea = 2,
    }
}

wire_enum! {
    pub enum Sector {
        Sector1 = 0,
        Sector2 = 1,
        Sector3 = 2,
    }
}

wire_enum! {
    pub enum DriverStatus {
        InGarage = 0,
        FlyingLap = 1,
        InLap = 2,
        OutLap = 3,
        OnTrack = 4,
    }
}

wire_enum! {
    /// Classification state of a car.
    pub enum ResultStatus {
        Invalid = 0,
        Inactive = 1,
        Active = 2,
        Finished = 3,
        Disqualified = 4,
        NotClassified = 5,
        Retired = 6,
    }
}

wire_enum! {
    pub enum TractionControl {
        Off = 0,
        Medium = 1,
        Full = 2,
    }
}

wire_enum! {
    pub enum FuelMix {
        Lean = 0,
        Standard = 1,
        Rich = 2,
        Max = 3,
    }
}

wire_enum! {
    /// Compound actually fitted, including F1 classic and F2 sets.
    pub enum ActualTyreCompound {
        Inter = 7,
        Wet = 8,
        ClassicDry = 9,
        ClassicWet = 10,
        F2SuperSoft = 11,
        F2Soft = 12,
        F2Medium = 13,
        F2Hard = 14,
        F2Wet = 15,
        C5 = 16,
        C4 = 17,
        C3 = 18,
        C2 = 19,
        C1 = 20,
    }
}

wire_enum! {
    /// Compound as shown to the player.
    pub enum VisualTyreCompound {
        Inter = 7,
        Wet = 8,
        ClassicDry = 9,
        ClassicWet = 10,
        F2Wet = 15,
        Soft = 16,
        Medium = 17,
        Hard = 18,
        F2SuperSoft = 19,
        F2Soft = 20,
        F2Medium = 21,
        F2Hard = 22,
    }
}

wire_enum! {
    pub enum ErsDeployMode {
        NoDeploy = 0,
        Medium = 1,
        Overtake = 2,
        Hotlap = 3,
    }
}

wire_enum! {
    /// Lobby readiness of a player.
    pub enum ReadyStatus {
        NotReady = 0,
        Ready = 1,
        Spectating = 2,
    }
}

wire_enum! {
    /// Penalty handed out by a `PENA` event.
    pub enum PenaltyType {
        DriveThrough = 0,
        StopGo = 1,
        GridPenalty = 2,
        PenaltyReminder = 3,
        TimePenalty = 4,
        Warning = 5,
        Disqualified = 6,
        RemovedFromFormationLap = 7,
        ParkedTooLongTimer = 8,
        TyreRegulations = 9,
        ThisLapInvalidated = 10,
        ThisAndNextLapInvalidated = 11,
        ThisLapInvalidatedWithoutReason = 12,
        ThisAndNextLapInvalidatedWithoutReason = 13,
        ThisAndPreviousLapInvalidated = 14,
        ThisAndPreviousLapInvalidatedWithoutReason = 15,
        Retired = 16,
        BlackFlagTimer = 17,
    }
}
