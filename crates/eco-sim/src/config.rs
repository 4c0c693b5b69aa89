//! Scenario files: what to place in the sandbox and how long to run it.

use std::collections::BTreeSet;
use std::path::Path;

use eco_agent::{CreatureStats, SpeciesProfile, Tuning};
use eco_core::BlackboardConfig;
use eco_nav::Vec3;
use serde::{Deserialize, Serialize};

use crate::ScenarioError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub dt_seconds: f32,
    pub steps: u64,
    pub world: WorldConfig,
    pub species: Vec<SpeciesGroup>,
    pub food: Vec<FoodConfig>,
    pub water: Vec<Vec3>,
}

/// Sandbox geometry and engine stand-in parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// The world is the square `[-half_extent, half_extent]` on x and z.
    pub half_extent: f32,
    pub stopping_distance: f32,
    pub agent_radius: f32,
    /// How long an animation clip keeps playing after its flag is raised.
    pub clip_seconds: f32,
    /// Offspring requests beyond this many living creatures are refused.
    pub max_population: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGroup {
    pub profile: SpeciesProfile,
    pub count: usize,
    #[serde(default)]
    pub stats: CreatureStats,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub blackboard: BlackboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodConfig {
    pub tag: String,
    pub initial: usize,
    pub max: usize,
    /// Seconds between regrowth of one item while below `max`. `0` disables regrowth.
    #[serde(default)]
    pub regrow_seconds: f32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt_seconds: 0.1,
            steps: 3_000,
            world: WorldConfig::default(),
            species: vec![
                SpeciesGroup::new(SpeciesProfile::herbivore("deer", "berry").fleeing("wolf"), 12),
                SpeciesGroup {
                    stats: CreatureStats {
                        speed: 4.0,
                        fov_range: 14.0,
                        ..CreatureStats::default()
                    },
                    ..SpeciesGroup::new(SpeciesProfile::carnivore("wolf", "deer"), 3)
                },
            ],
            food: vec![FoodConfig {
                tag: "berry".to_owned(),
                initial: 40,
                max: 60,
                regrow_seconds: 2.0,
            }],
            water: vec![
                Vec3::new(-15.0, 0.0, -15.0),
                Vec3::new(15.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 20.0),
            ],
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_extent: 30.0,
            stopping_distance: 0.5,
            agent_radius: 0.5,
            clip_seconds: 0.8,
            max_population: 200,
        }
    }
}

impl SpeciesGroup {
    pub fn new(profile: SpeciesProfile, count: usize) -> Self {
        Self {
            profile,
            count,
            stats: CreatureStats::default(),
            tuning: Tuning::default(),
            blackboard: BlackboardConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ScenarioError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        positive("dt_seconds", self.dt_seconds)?;
        positive("world.half_extent", self.world.half_extent)?;
        positive("world.stopping_distance", self.world.stopping_distance)?;
        positive("world.agent_radius", self.world.agent_radius)?;
        if !(self.world.clip_seconds.is_finite() && self.world.clip_seconds >= 0.0) {
            return Err(ScenarioError::NotPositive {
                field: "world.clip_seconds",
                value: self.world.clip_seconds,
            });
        }

        let mut names = BTreeSet::new();
        for group in &self.species {
            let name = &group.profile.name;
            if !names.insert(name.as_str()) {
                return Err(ScenarioError::DuplicateSpecies(name.clone()));
            }
            group
                .stats
                .validate()
                .and_then(|()| group.tuning.validate())
                .map_err(|source| ScenarioError::Species {
                    species: name.clone(),
                    source,
                })?;
        }

        for food in &self.food {
            if food.max < food.initial {
                return Err(ScenarioError::FoodCapacity {
                    initial: food.initial,
                    max: food.max,
                });
            }
        }

        let half = self.world.half_extent;
        if let Some(p) = self
            .water
            .iter()
            .find(|p| p.x.abs() > half || p.z.abs() > half)
        {
            return Err(ScenarioError::WaterOutOfBounds { x: p.x, z: p.z });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ScenarioError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_round_trips_through_yaml() {
        let config = ScenarioConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ScenarioConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = ScenarioConfig::from_yaml("seed: 9\nsteps: 10\n").unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.steps, 10);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn duplicate_species_are_rejected() {
        let mut config = ScenarioConfig::default();
        config.species.push(config.species[0].clone());
        assert!(matches!(
            config.validate(),
            Err(ScenarioError::DuplicateSpecies(name)) if name == "deer"
        ));
    }

    #[test]
    fn invalid_stats_name_the_species() {
        let yaml = r#"
species:
  - profile:
      name: deer
      diet: { kind: herbivore, food_tag: berry }
    count: 1
    stats:
      max_health: -1
"#;
        let err = ScenarioConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ScenarioError::Species { ref species, .. } if species == "deer"));
    }

    #[test]
    fn water_outside_the_world_is_rejected() {
        let mut config = ScenarioConfig::default();
        config.water.push(Vec3::new(100.0, 0.0, 0.0));
        assert!(matches!(
            config.validate(),
            Err(ScenarioError::WaterOutOfBounds { .. })
        ));
    }
}
