use crate::{rng, EntityId, SplitMix64};

/// Per-step context handed to every update and tree evaluation.
///
/// `time_seconds` is the simulation clock at the *start* of the step; deadlines
/// (forget timers, blackboard idle expiry) are compared against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub time_seconds: f64,
    pub seed: u64,
}

impl TickContext {
    /// Context for a fixed-step simulation: the clock is `tick * dt_seconds`.
    pub fn fixed(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            time_seconds: tick as f64 * dt_seconds as f64,
            seed,
        }
    }

    /// Context for the step following this one.
    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            dt_seconds: self.dt_seconds,
            time_seconds: self.time_seconds + self.dt_seconds as f64,
            seed: self.seed,
        }
    }

    pub fn rng_for_entity<E: EntityId>(&self, entity: E, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, entity.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
