use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPAWN_LATITUDE: UniformRange = UniformRange::new(40.0, 41.0);
pub const DEFAULT_SPAWN_LONGITUDE: UniformRange = UniformRange::new(-74.0, -73.0);
pub const DEFAULT_ALTITUDE: UniformRange = UniformRange::new(100.0, 200.0);
pub const DEFAULT_POSITION_JITTER: f64 = 0.001;
pub const DEFAULT_BATTERY_DRAIN: UniformRange = UniformRange::new(0.01, 0.05);
pub const FULL_BATTERY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFinite { field });
        }
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Ranges the telemetry simulator draws from.
///
/// Any field missing from a JSON document falls back to its default, so an
/// empty object `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub spawn_latitude: UniformRange,
    pub spawn_longitude: UniformRange,
    pub altitude: UniformRange,
    /// Maximum per-tick displacement on each axis, in degrees.
    pub position_jitter: f64,
    pub battery_drain: UniformRange,
    pub initial_battery: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spawn_latitude: DEFAULT_SPAWN_LATITUDE,
            spawn_longitude: DEFAULT_SPAWN_LONGITUDE,
            altitude: DEFAULT_ALTITUDE,
            position_jitter: DEFAULT_POSITION_JITTER,
            battery_drain: DEFAULT_BATTERY_DRAIN,
            initial_battery: FULL_BATTERY,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_latitude.validate("spawn_latitude")?;
        self.spawn_longitude.validate("spawn_longitude")?;
        self.altitude.validate("altitude")?;
        self.battery_drain.validate("battery_drain")?;

        if !self.position_jitter.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "position_jitter",
            });
        }
        if self.position_jitter < 0.0 {
            return Err(ConfigError::OutOfBounds {
                field: "position_jitter",
                value: self.position_jitter,
            });
        }
        if self.battery_drain.min < 0.0 {
            return Err(ConfigError::OutOfBounds {
                field: "battery_drain",
                value: self.battery_drain.min,
            });
        }
        if !self.initial_battery.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "initial_battery",
            });
        }
        if !(0.0..=FULL_BATTERY).contains(&self.initial_battery) {
            return Err(ConfigError::OutOfBounds {
                field: "initial_battery",
                value: self.initial_battery,
            });
        }
        Ok(())
    }
}
