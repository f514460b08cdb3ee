use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use skyfleet_core::{GeoPoint, SimulationConfig};
use std::path::Path;

pub const SETTINGS_ENV_VAR: &str = "SKYFLEET_SETTINGS";
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_MAP_CENTER: GeoPoint = GeoPoint {
    latitude: 40.75,
    longitude: -73.95,
};
pub const DEFAULT_MAP_ZOOM: f64 = 11.0;

/// Runtime settings of the tracker window, optionally read from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub poll_interval_secs: f64,
    pub map_center: GeoPoint,
    pub map_zoom: f64,
    /// Fixed seed for reproducible fleets; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub simulation: SimulationConfig,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
            seed: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl TrackerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).context("malformed settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Reads the file named by the first CLI argument or by
    /// `SKYFLEET_SETTINGS`; defaults when neither is given.
    pub fn from_args_or_env(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let path = args
            .into_iter()
            .nth(1)
            .or_else(|| std::env::var(SETTINGS_ENV_VAR).ok());
        match path {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.poll_interval_secs.is_finite() && self.poll_interval_secs > 0.0,
            "poll_interval_secs must be positive, got {}",
            self.poll_interval_secs
        );
        ensure!(
            self.map_zoom.is_finite(),
            "map_zoom must be finite, got {}",
            self.map_zoom
        );
        self.simulation
            .validate()
            .context("invalid simulation section")?;
        Ok(())
    }
}
