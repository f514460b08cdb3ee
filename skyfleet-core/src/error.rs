use thiserror::Error;

/// Rejections raised while loading or validating a [`SimulationConfig`].
///
/// [`SimulationConfig`]: crate::config::SimulationConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field}: range minimum {min} exceeds maximum {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field}: value must be finite")]
    NonFinite { field: &'static str },

    #[error("{field}: value {value} is out of bounds")]
    OutOfBounds { field: &'static str, value: f64 },

    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
}
