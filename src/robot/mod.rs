//! Robot configuration — chassis, fitted sensors and their settings.
//!
//! This is the record the builder view edits and saves. Nothing here affects
//! playback; the simulator only shows the robot's name and summary.

pub mod catalog;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result, SimError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chassis {
    #[default]
    Rover,
    Arm,
    Drone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Ultrasonic,
    Infrared,
    Color,
    Gyro,
    Camera,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Ultrasonic,
        SensorKind::Infrared,
        SensorKind::Color,
        SensorKind::Gyro,
        SensorKind::Camera,
    ];

    pub fn default_settings(self) -> SensorSettings {
        match self {
            SensorKind::Ultrasonic => SensorSettings::Ultrasonic { range_cm: 200 },
            SensorKind::Infrared => SensorSettings::Infrared { sensitivity: 50 },
            SensorKind::Color => SensorSettings::Color { illumination: true },
            SensorKind::Gyro => SensorSettings::Gyro {
                axis: GyroAxis::ThreeAxis,
            },
            SensorKind::Camera => SensorSettings::Camera {
                resolution: CameraResolution::Hd720,
            },
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(catalog::spec(*self).name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GyroAxis {
    #[serde(rename = "3-axis")]
    ThreeAxis,
    #[serde(rename = "6-axis")]
    SixAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraResolution {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
}

/// Per-sensor settings. Each variant's fields are distinct, so the JSON form
/// needs no tag: `{"range_cm": 200}`, `{"sensitivity": 50}`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorSettings {
    Ultrasonic {
        #[serde(alias = "range")]
        range_cm: u16,
    },
    Infrared {
        sensitivity: u8,
    },
    Color {
        illumination: bool,
    },
    Gyro {
        axis: GyroAxis,
    },
    Camera {
        resolution: CameraResolution,
    },
}

impl SensorSettings {
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorSettings::Ultrasonic { .. } => SensorKind::Ultrasonic,
            SensorSettings::Infrared { .. } => SensorKind::Infrared,
            SensorSettings::Color { .. } => SensorKind::Color,
            SensorSettings::Gyro { .. } => SensorKind::Gyro,
            SensorSettings::Camera { .. } => SensorKind::Camera,
        }
    }

    /// Pull numeric settings into the ranges the hardware supports.
    /// Ultrasonic range snaps to 10 cm steps within 50..=400.
    pub fn normalized(self) -> Self {
        match self {
            SensorSettings::Ultrasonic { range_cm } => {
                let snapped = (range_cm.clamp(50, 400) + 5) / 10 * 10;
                SensorSettings::Ultrasonic {
                    range_cm: snapped.min(400),
                }
            }
            SensorSettings::Infrared { sensitivity } => SensorSettings::Infrared {
                sensitivity: sensitivity.min(100),
            },
            other => other,
        }
    }
}

impl fmt::Display for SensorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorSettings::Ultrasonic { range_cm } => write!(f, "range {range_cm} cm"),
            SensorSettings::Infrared { sensitivity } => write!(f, "sensitivity {sensitivity}%"),
            SensorSettings::Color { illumination } => {
                write!(f, "illumination {}", if *illumination { "on" } else { "off" })
            }
            SensorSettings::Gyro { axis } => f.write_str(match axis {
                GyroAxis::ThreeAxis => "3-axis",
                GyroAxis::SixAxis => "6-axis",
            }),
            SensorSettings::Camera { resolution } => f.write_str(match resolution {
                CameraResolution::Hd720 => "720p",
                CameraResolution::Hd1080 => "1080p",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotStats {
    pub total_power: u32,
    /// Grams.
    pub total_weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub name: String,
    #[serde(alias = "type", default)]
    pub chassis: Chassis,
    #[serde(default)]
    pub sensors: Vec<SensorKind>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sensor_config: BTreeMap<SensorKind, SensorSettings>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            name: "Robot-1".into(),
            chassis: Chassis::Rover,
            sensors: Vec::new(),
            sensor_config: BTreeMap::new(),
        }
    }
}

impl RobotConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: RobotConfig = error::read_json(path.as_ref())?;
        for (kind, settings) in &config.sensor_config {
            if settings.kind() != *kind {
                return Err(SimError::invalid(format!(
                    "settings for {kind:?} belong to {:?}",
                    settings.kind()
                )));
            }
        }
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        error::write_json(path.as_ref(), self)
    }

    pub fn has_sensor(&self, kind: SensorKind) -> bool {
        self.sensors.contains(&kind)
    }

    /// Fit or remove a sensor.
    ///
    /// Fitting appends the sensor and gives it default settings unless it
    /// already has some; removing keeps its settings for the next time it is
    /// fitted.
    pub fn toggle_sensor(&mut self, kind: SensorKind) {
        if self.has_sensor(kind) {
            self.sensors.retain(|s| *s != kind);
        } else {
            self.sensors.push(kind);
            self.sensor_config
                .entry(kind)
                .or_insert_with(|| kind.default_settings());
        }
    }

    /// Replace the settings for `kind`.
    pub fn update_sensor(&mut self, kind: SensorKind, settings: SensorSettings) -> Result<()> {
        if settings.kind() != kind {
            return Err(SimError::invalid(format!(
                "{:?} settings cannot be applied to {kind:?}",
                settings.kind()
            )));
        }
        self.sensor_config.insert(kind, settings.normalized());
        Ok(())
    }

    /// Settings in effect for a fitted sensor, defaults if none were stored.
    pub fn settings(&self, kind: SensorKind) -> Option<SensorSettings> {
        if !self.has_sensor(kind) {
            return None;
        }
        Some(
            self.sensor_config
                .get(&kind)
                .copied()
                .unwrap_or_else(|| kind.default_settings()),
        )
    }

    pub fn stats(&self) -> RobotStats {
        let fitted = catalog::SENSORS.iter().filter(|s| self.has_sensor(s.kind));
        let (power, weight) = fitted.fold((0, 0), |(p, w), s| (p + s.power, w + s.weight));
        RobotStats {
            total_power: catalog::BASE_POWER + power,
            total_weight: catalog::BASE_WEIGHT + weight,
        }
    }
}
