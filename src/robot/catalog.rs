//! Static sensor catalog: display copy, power draw and weight per sensor.

use super::SensorKind;

/// Power drawn by the bare chassis before any sensor is fitted.
pub const BASE_POWER: u32 = 20;
/// Weight of the bare chassis in grams.
pub const BASE_WEIGHT: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSpec {
    pub kind: SensorKind,
    pub name: &'static str,
    pub description: &'static str,
    pub power: u32,
    /// Grams.
    pub weight: u32,
}

pub const SENSORS: [SensorSpec; 5] = [
    SensorSpec {
        kind: SensorKind::Ultrasonic,
        name: "Ultrasonic sensor",
        description: "Measures distance to avoid obstacles.",
        power: 5,
        weight: 10,
    },
    SensorSpec {
        kind: SensorKind::Infrared,
        name: "Line tracker",
        description: "Follows black and white lines on the floor.",
        power: 3,
        weight: 5,
    },
    SensorSpec {
        kind: SensorKind::Color,
        name: "Color sensor",
        description: "Recognises the colour of objects and surfaces.",
        power: 4,
        weight: 8,
    },
    SensorSpec {
        kind: SensorKind::Gyro,
        name: "Gyroscope",
        description: "Tracks heading and turn angles precisely.",
        power: 2,
        weight: 5,
    },
    SensorSpec {
        kind: SensorKind::Camera,
        name: "AI camera",
        description: "Recognises shapes and faces (advanced).",
        power: 15,
        weight: 25,
    },
];

pub fn spec(kind: SensorKind) -> &'static SensorSpec {
    // SENSORS is ordered like SensorKind's variants.
    &SENSORS[kind as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_kind() {
        for kind in SensorKind::ALL {
            assert_eq!(spec(kind).kind, kind);
        }
    }
}
