use eco_core::rng::mix64;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Per-creature template. Copied into offspring, never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureStats {
    pub max_health: f32,
    pub max_hunger: f32,
    pub max_thirst: f32,
    pub max_stamina: f32,
    pub speed: f32,
    pub fov_range: f32,
    pub grow_duration_seconds: f32,
    pub mating_cooldown_seconds: f32,
    pub reproduction_time_seconds: f32,
    pub gender: Gender,
}

impl Default for CreatureStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_hunger: 100.0,
            max_thirst: 100.0,
            max_stamina: 100.0,
            speed: 3.5,
            fov_range: 10.0,
            grow_duration_seconds: 30.0,
            mating_cooldown_seconds: 30.0,
            reproduction_time_seconds: 1.0,
            gender: Gender::Female,
        }
    }
}

impl CreatureStats {
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_health", self.max_health)?;
        positive("max_hunger", self.max_hunger)?;
        positive("max_thirst", self.max_thirst)?;
        positive("max_stamina", self.max_stamina)?;
        positive("speed", self.speed)?;
        positive("fov_range", self.fov_range)?;
        non_negative("grow_duration_seconds", self.grow_duration_seconds)?;
        non_negative("mating_cooldown_seconds", self.mating_cooldown_seconds)?;
        non_negative("reproduction_time_seconds", self.reproduction_time_seconds)?;
        Ok(())
    }

    /// Offspring template: the mean of every numeric trait. Gender is taken from
    /// the parity of a hash over both parents' traits, so the same two parents
    /// always produce the same child regardless of argument order.
    pub fn merge(&self, other: &CreatureStats) -> CreatureStats {
        let mean = |a: f32, b: f32| (a + b) * 0.5;
        let parity = mix64(self.trait_hash().wrapping_add(other.trait_hash()));
        CreatureStats {
            max_health: mean(self.max_health, other.max_health),
            max_hunger: mean(self.max_hunger, other.max_hunger),
            max_thirst: mean(self.max_thirst, other.max_thirst),
            max_stamina: mean(self.max_stamina, other.max_stamina),
            speed: mean(self.speed, other.speed),
            fov_range: mean(self.fov_range, other.fov_range),
            grow_duration_seconds: mean(self.grow_duration_seconds, other.grow_duration_seconds),
            mating_cooldown_seconds: mean(
                self.mating_cooldown_seconds,
                other.mating_cooldown_seconds,
            ),
            reproduction_time_seconds: mean(
                self.reproduction_time_seconds,
                other.reproduction_time_seconds,
            ),
            gender: if parity % 2 == 0 {
                Gender::Female
            } else {
                Gender::Male
            },
        }
    }

    fn trait_hash(&self) -> u64 {
        [
            self.max_health,
            self.max_hunger,
            self.max_thirst,
            self.max_stamina,
            self.speed,
            self.fov_range,
            self.grow_duration_seconds,
            self.mating_cooldown_seconds,
            self.reproduction_time_seconds,
        ]
        .iter()
        .fold(self.gender as u64, |h, v| mix64(h ^ u64::from(v.to_bits())))
    }
}
