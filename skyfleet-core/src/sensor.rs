use crate::config::SimulationConfig;
use crate::coordinates::GeoPoint;
use crate::random::RandomSource;
use serde::Serialize;

/// One telemetry sample. The trail is a view into the simulator's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Telemetry<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub battery: f64,
    pub trail: &'a [GeoPoint],
}

impl Telemetry<'_> {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Simulated sensor feed for a single drone: a bounded random walk with a
/// draining battery.
#[derive(Debug, Clone)]
pub struct DroneSensor {
    position: GeoPoint,
    altitude: f64,
    battery: f64,
    trail: Vec<GeoPoint>,
    position_jitter: f64,
    battery_drain: (f64, f64),
}

impl DroneSensor {
    /// Places a new drone. Coordinates are drawn from the configured spawn
    /// area unless `initial` is given; altitude is always drawn.
    pub fn spawn<R: RandomSource + ?Sized>(
        source: &mut R,
        config: &SimulationConfig,
        initial: Option<GeoPoint>,
    ) -> Self {
        let position = initial.unwrap_or_else(|| {
            let latitude = source.uniform(config.spawn_latitude.min, config.spawn_latitude.max);
            let longitude = source.uniform(config.spawn_longitude.min, config.spawn_longitude.max);
            GeoPoint::new(latitude, longitude)
        });
        let altitude = source.uniform(config.altitude.min, config.altitude.max);

        Self {
            position,
            altitude,
            battery: config.initial_battery,
            trail: vec![position],
            position_jitter: config.position_jitter,
            battery_drain: (config.battery_drain.min, config.battery_drain.max),
        }
    }

    /// Advances the walk by one step and returns the new sample.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, source: &mut R) -> Telemetry<'_> {
        let jitter = self.position_jitter;
        let d_latitude = source.uniform(-jitter, jitter);
        let d_longitude = source.uniform(-jitter, jitter);
        let drain = source.uniform(self.battery_drain.0, self.battery_drain.1);

        self.position = self.position.offset(d_latitude, d_longitude);
        self.trail.push(self.position);

        self.battery = (self.battery - drain).max(0.0);

        self.telemetry()
    }

    /// The most recent sample, without advancing the walk.
    pub fn telemetry(&self) -> Telemetry<'_> {
        Telemetry {
            latitude: self.position.latitude,
            longitude: self.position.longitude,
            altitude: self.altitude,
            battery: self.battery,
            trail: &self.trail,
        }
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn trail(&self) -> &[GeoPoint] {
        &self.trail
    }

    pub fn ticks(&self) -> usize {
        self.trail.len() - 1
    }

    pub fn is_depleted(&self) -> bool {
        self.battery <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UniformRange;
    use crate::random::testing::ScriptedSource;
    use fastrand::Rng;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn spawn_draws_position_then_altitude() {
        let mut source = ScriptedSource::new([0.5, 0.25, 0.75]);
        let sensor = DroneSensor::spawn(&mut source, &config(), None);

        assert_eq!(sensor.position(), GeoPoint::new(40.5, -73.75));
        assert_eq!(sensor.altitude(), 175.0);
        assert_eq!(sensor.battery(), 100.0);
        assert_eq!(sensor.trail(), &[GeoPoint::new(40.5, -73.75)]);
        assert_eq!(sensor.ticks(), 0);
    }

    #[test]
    fn spawn_at_given_position_only_draws_altitude() {
        let mut source = ScriptedSource::new([0.0]);
        let sensor = DroneSensor::spawn(&mut source, &config(), Some(GeoPoint::new(10.0, 20.0)));

        assert_eq!(sensor.trail()[0], GeoPoint::new(10.0, 20.0));
        assert_eq!(sensor.altitude(), 100.0);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn tick_applies_scripted_step() {
        let mut source = ScriptedSource::new([0.0]);
        let mut sensor = DroneSensor::spawn(&mut source, &config(), Some(GeoPoint::new(10.0, 20.0)));

        // lat delta +0.001, lon delta -0.001, drain 0.03
        let mut step = ScriptedSource::new([1.0, 0.0, 0.5]);
        let sample = sensor.tick(&mut step);

        assert!((sample.latitude - 10.001).abs() < 1e-12);
        assert!((sample.longitude - 19.999).abs() < 1e-12);
        assert!((sample.battery - 99.97).abs() < 1e-12);
        assert_eq!(sample.altitude, 100.0);
        assert_eq!(sample.trail.len(), 2);
        assert_eq!(sample.trail[1], sample.position());
    }

    #[test]
    fn tick_deltas_stay_within_bounds() {
        let mut rng = Rng::with_seed(11);
        let mut sensor = DroneSensor::spawn(&mut rng, &config(), None);

        for _ in 0..500 {
            let before = sensor.position();
            let battery_before = sensor.battery();
            let sample = sensor.tick(&mut rng);

            assert!((sample.latitude - before.latitude).abs() <= 0.001 + 1e-12);
            assert!((sample.longitude - before.longitude).abs() <= 0.001 + 1e-12);
            let drain = battery_before - sample.battery;
            assert!((0.01 - 1e-12..=0.05 + 1e-12).contains(&drain));
        }
    }

    #[test]
    fn trail_grows_by_one_per_tick_and_keeps_origin() {
        let mut rng = Rng::with_seed(3);
        let mut sensor = DroneSensor::spawn(&mut rng, &config(), None);
        let origin = sensor.position();

        for n in 1..=25 {
            let sample = sensor.tick(&mut rng);
            assert_eq!(sample.trail.len(), n + 1);
            assert_eq!(sample.trail[0], origin);
        }
        assert_eq!(sensor.ticks(), 25);
    }

    #[test]
    fn battery_is_hundred_minus_drawn_drain() {
        let mut source = ScriptedSource::new([0.0]);
        let mut sensor = DroneSensor::spawn(&mut source, &config(), Some(GeoPoint::new(0.0, 0.0)));

        let drains = [0.0, 1.0, 0.25, 0.5];
        let mut expected = 100.0;
        for fraction in drains {
            let mut step = ScriptedSource::new([0.5, 0.5, fraction]);
            expected -= 0.01 + fraction * 0.04;
            let sample = sensor.tick(&mut step);
            assert!((sample.battery - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn battery_floors_at_zero_and_stays_there() {
        let mut config = config();
        config.initial_battery = 0.05;
        config.battery_drain = UniformRange::new(0.04, 0.04);
        let mut rng = Rng::with_seed(5);
        let mut sensor = DroneSensor::spawn(&mut rng, &config, None);

        assert!((sensor.tick(&mut rng).battery - 0.01).abs() < 1e-12);
        assert_eq!(sensor.tick(&mut rng).battery, 0.0);
        assert!(sensor.is_depleted());
        assert_eq!(sensor.tick(&mut rng).battery, 0.0);
        assert_eq!(sensor.trail().len(), 4);
    }

    #[test]
    fn telemetry_reads_without_advancing() {
        let mut rng = Rng::with_seed(9);
        let mut sensor = DroneSensor::spawn(&mut rng, &config(), None);
        sensor.tick(&mut rng);

        let first = sensor.telemetry();
        assert_eq!(first.trail.len(), 2);
        assert_eq!(sensor.telemetry(), first);
        assert_eq!(sensor.ticks(), 1);
    }
}
