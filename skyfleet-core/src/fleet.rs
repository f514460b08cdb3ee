use crate::config::SimulationConfig;
use crate::coordinates::GeoPoint;
use crate::random::RandomSource;
use crate::sensor::{DroneSensor, Telemetry};
use fastrand::Rng;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

pub const DRONE_ID_PREFIX: &str = "Drone_";

/// Owns every simulated drone, keyed by id, in insertion order.
pub struct FleetRegistry<R = Rng> {
    drones: Vec<(String, DroneSensor)>,
    source: R,
    config: SimulationConfig,
    id_counter: u64,
}

impl FleetRegistry<Rng> {
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self::with_source(Rng::new(), config)
    }

    /// A registry whose whole trajectory is fixed by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_seed_and_config(seed, SimulationConfig::default())
    }

    pub fn with_seed_and_config(seed: u64, config: SimulationConfig) -> Self {
        Self::with_source(Rng::with_seed(seed), config)
    }
}

impl Default for FleetRegistry<Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> FleetRegistry<R> {
    pub fn with_source(source: R, config: SimulationConfig) -> Self {
        Self {
            drones: Vec::new(),
            source,
            config,
            id_counter: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Registers a drone under `id`. Returns `false` without touching the
    /// existing drone when the id is already taken.
    pub fn add(&mut self, id: impl Into<String>, initial: Option<GeoPoint>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            debug!(drone = %id, "add ignored, id already registered");
            return false;
        }

        let sensor = DroneSensor::spawn(&mut self.source, &self.config, initial);
        debug!(
            drone = %id,
            latitude = sensor.position().latitude,
            longitude = sensor.position().longitude,
            altitude = sensor.altitude(),
            "drone added"
        );
        self.drones.push((id, sensor));
        true
    }

    /// Drops the drone and its trail. Returns `false` if `id` was unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let (_, sensor) = self.drones.remove(index);
        debug!(drone = id, ticks = sensor.ticks(), "drone removed");
        true
    }

    /// Advances every drone by exactly one tick and collects the samples.
    pub fn snapshot_all(&mut self) -> FleetSnapshot<'_> {
        let source = &mut self.source;
        let entries = self
            .drones
            .iter_mut()
            .map(|(id, sensor)| {
                let was_depleted = sensor.is_depleted();
                let sensor: &DroneSensor = {
                    sensor.tick(&mut *source);
                    sensor
                };
                if !was_depleted && sensor.is_depleted() {
                    warn!(drone = %id, ticks = sensor.ticks(), "battery depleted");
                }
                (id.as_str(), sensor.telemetry())
            })
            .collect();
        FleetSnapshot { entries }
    }

    /// Returns a fresh `Drone_<n>` id that is not currently registered.
    pub fn next_id(&mut self) -> String {
        loop {
            self.id_counter += 1;
            let candidate = format!("{DRONE_ID_PREFIX}{}", self.id_counter);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&DroneSensor> {
        self.index_of(id).map(|index| &self.drones[index].1)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.drones.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DroneSensor)> {
        self.drones.iter().map(|(id, sensor)| (id.as_str(), sensor))
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.drones.iter().position(|(existing, _)| existing == id)
    }
}

/// Telemetry for every drone from one `snapshot_all` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSnapshot<'a> {
    entries: Vec<(&'a str, Telemetry<'a>)>,
}

impl<'a> FleetSnapshot<'a> {
    pub fn get(&self, id: &str) -> Option<&Telemetry<'a>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, telemetry)| telemetry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &Telemetry<'a>)> {
        self.entries.iter().map(|(id, telemetry)| (*id, telemetry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FleetSnapshot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, telemetry)| (*id, telemetry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::testing::ScriptedSource;

    fn registry() -> FleetRegistry {
        FleetRegistry::with_seed(42)
    }

    #[test]
    fn add_starts_full_battery_with_single_point_trail() {
        let mut fleet = registry();
        assert!(fleet.add("D1", None));

        let drone = fleet.get("D1").unwrap();
        assert_eq!(drone.battery(), 100.0);
        assert_eq!(drone.trail().len(), 1);
        assert!((100.0..=200.0).contains(&drone.altitude()));
        assert!((40.0..=41.0).contains(&drone.position().latitude));
        assert!((-74.0..=-73.0).contains(&drone.position().longitude));
    }

    #[test]
    fn three_snapshots_drain_battery_and_grow_trail() {
        let mut fleet = registry();
        fleet.add("D1", None);

        let mut last_battery = 100.0;
        for _ in 0..3 {
            let snapshot = fleet.snapshot_all();
            let battery = snapshot.get("D1").unwrap().battery;
            assert!(battery < last_battery);
            last_battery = battery;
        }

        assert!(last_battery <= 100.0 - 3.0 * 0.01 + 1e-9);
        assert!(last_battery >= 100.0 - 3.0 * 0.05 - 1e-9);
        assert_eq!(fleet.get("D1").unwrap().trail().len(), 4);
    }

    #[test]
    fn add_with_coordinates_starts_trail_there() {
        let mut fleet = registry();
        fleet.add("D1", Some(GeoPoint::new(10.0, 20.0)));

        let snapshot = fleet.snapshot_all();
        let first = snapshot.get("D1").unwrap().trail[0];
        assert_eq!(first.as_pair(), (10.0, 20.0));
    }

    #[test]
    fn duplicate_add_keeps_existing_drone() {
        let mut fleet = registry();
        fleet.add("D1", Some(GeoPoint::new(10.0, 20.0)));
        fleet.snapshot_all();
        let before = fleet.get("D1").unwrap().trail().to_vec();

        assert!(!fleet.add("D1", Some(GeoPoint::new(-5.0, -5.0))));

        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.get("D1").unwrap().trail(), before.as_slice());
    }

    #[test]
    fn duplicate_add_consumes_no_randomness() {
        let mut fleet = FleetRegistry::with_source(
            ScriptedSource::new([0.5, 0.5, 0.5]),
            SimulationConfig::default(),
        );
        fleet.add("D1", None);
        // The source is exhausted; a second spawn would panic.
        fleet.add("D1", None);
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn removing_missing_id_is_a_no_op() {
        let mut fleet = registry();
        fleet.add("D1", None);

        assert!(!fleet.remove("Dx"));
        assert_eq!(fleet.ids().collect::<Vec<_>>(), vec!["D1"]);
        assert_eq!(fleet.get("D1").unwrap().ticks(), 0);
    }

    #[test]
    fn removed_drone_disappears_and_readding_starts_fresh() {
        let mut fleet = registry();
        fleet.add("D1", None);
        fleet.add("D2", None);
        fleet.snapshot_all();
        fleet.snapshot_all();

        assert!(fleet.remove("D1"));
        let snapshot = fleet.snapshot_all();
        assert!(snapshot.get("D1").is_none());
        assert_eq!(snapshot.len(), 1);

        fleet.add("D1", None);
        assert_eq!(fleet.get("D1").unwrap().trail().len(), 1);
        assert_eq!(fleet.get("D1").unwrap().battery(), 100.0);
    }

    #[test]
    fn snapshot_ticks_every_drone_once_in_insertion_order() {
        let mut fleet = registry();
        for id in ["C", "A", "B"] {
            fleet.add(id, None);
        }

        let snapshot = fleet.snapshot_all();
        let ids: Vec<&str> = snapshot.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
        assert!(snapshot.iter().all(|(_, t)| t.trail.len() == 2));
    }

    #[test]
    fn reads_do_not_advance_the_clock() {
        let mut fleet = registry();
        fleet.add("D1", None);
        fleet.snapshot_all();

        let _ = fleet.get("D1").unwrap().telemetry();
        let _ = fleet.iter().count();

        assert_eq!(fleet.get("D1").unwrap().ticks(), 1);
    }

    #[test]
    fn seeded_fleets_follow_identical_trajectories() {
        let mut a = FleetRegistry::with_seed(1234);
        let mut b = FleetRegistry::with_seed(1234);
        for fleet in [&mut a, &mut b] {
            fleet.add("D1", None);
            fleet.add("D2", None);
        }

        for _ in 0..10 {
            let left = serde_json::to_value(a.snapshot_all()).unwrap();
            let right = serde_json::to_value(b.snapshot_all()).unwrap();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn empty_fleet_snapshot_is_empty() {
        let mut fleet = registry();
        assert!(fleet.is_empty());
        assert!(fleet.snapshot_all().is_empty());
    }

    #[test]
    fn snapshot_serializes_as_map_keyed_by_id() {
        let mut fleet = registry();
        fleet.add("D1", Some(GeoPoint::new(10.0, 20.0)));

        let value = serde_json::to_value(fleet.snapshot_all()).unwrap();
        let entry = &value["D1"];
        assert!(entry["latitude"].is_f64());
        assert!(entry["altitude"].is_f64());
        assert!(entry["battery"].as_f64().unwrap() < 100.0);
        let trail = entry["trail"].as_array().unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0]["latitude"].as_f64(), Some(10.0));
        assert_eq!(trail[0]["longitude"].as_f64(), Some(20.0));
    }

    #[test]
    fn next_id_skips_ids_in_use() {
        let mut fleet = registry();
        fleet.add("Drone_2", None);

        let first = fleet.next_id();
        fleet.add(first.clone(), None);
        let second = fleet.next_id();

        assert_eq!(first, "Drone_1");
        assert_eq!(second, "Drone_3");
    }

    #[test]
    fn next_id_does_not_reuse_after_removal() {
        let mut fleet = registry();
        let first = fleet.next_id();
        fleet.add(first.clone(), None);
        fleet.remove(&first);

        assert_eq!(fleet.next_id(), "Drone_2");
    }
}
