pub mod config;
pub mod coordinates;
pub mod error;
pub mod fleet;
pub mod random;
pub mod sensor;

pub use config::{SimulationConfig, UniformRange};
pub use coordinates::GeoPoint;
pub use error::ConfigError;
pub use fleet::{FleetRegistry, FleetSnapshot};
pub use random::RandomSource;
pub use sensor::{DroneSensor, Telemetry};
