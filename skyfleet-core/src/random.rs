use fastrand::Rng;

/// Source of the noise that drives the simulation.
///
/// The registry owns one source and lends it to each simulator on spawn and
/// on every tick, so seeding the source fixes the whole fleet trajectory.
pub trait RandomSource {
    /// Returns a value drawn uniformly from `[min, max]`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl RandomSource for Rng {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + self.f64() * (max - min)
    }
}
