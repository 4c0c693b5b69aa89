//! Runtime constants shared by every creature of a simulation.

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Hunger lost per second.
    pub hunger_decay_per_second: f32,

    /// Thirst lost per second.
    pub thirst_decay_per_second: f32,

    /// Health lost per second while hunger or thirst is empty.
    pub health_decay_per_second: f32,

    /// Health regained per second while neither need is empty.
    pub health_regen_per_second: f32,

    /// Stamina spent per second while running.
    pub stamina_decay_per_second: f32,

    pub stamina_regen_per_second: f32,

    /// Hunger restored by one eaten food item; doubled for a kill.
    pub food_hunger_replenish: f32,

    /// Thirst restored by one drink.
    pub water_thirst_replenish: f32,

    pub damage_per_attack: f32,

    /// Uninterruptible window at the start of every interaction.
    pub commit_seconds: f32,

    /// Interval between "animation finished?" checks once committed.
    pub settle_poll_seconds: f32,

    /// How long a blacklisted target or water point stays excluded.
    pub forget_seconds: f32,

    /// Delay between death and the destroy request (before animation settle).
    pub death_delay_seconds: f32,

    /// Visual scale of a newborn.
    pub child_scale: f32,

    /// Measured speed above which a running creature spends stamina.
    pub run_speed_threshold: f32,

    pub run_speed_multiplier: f32,

    /// Fraction of max stamina an exhausted creature needs before it may run again.
    pub stamina_recover_fraction: f32,

    /// Hungry / thirsty at or below this fraction of the maximum.
    pub need_threshold_fraction: f32,

    /// A wandering creature picks a new destination at least this often.
    pub wander_repick_seconds: f32,

    /// A go-to that has not arrived after this long gives up on its target.
    pub give_up_seconds: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hunger_decay_per_second: 1.0,
            thirst_decay_per_second: 1.0,
            health_decay_per_second: 1.0,
            health_regen_per_second: 0.5,
            stamina_decay_per_second: 10.0,
            stamina_regen_per_second: 5.0,
            food_hunger_replenish: 20.0,
            water_thirst_replenish: 20.0,
            damage_per_attack: 25.0,
            commit_seconds: 1.0,
            settle_poll_seconds: 0.1,
            forget_seconds: 30.0,
            death_delay_seconds: 1.0,
            child_scale: 0.5,
            run_speed_threshold: 0.1,
            run_speed_multiplier: 2.0,
            stamina_recover_fraction: 0.9,
            need_threshold_fraction: 0.5,
            wander_repick_seconds: 5.0,
            give_up_seconds: 20.0,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hunger_decay_per_second", self.hunger_decay_per_second)?;
        non_negative("thirst_decay_per_second", self.thirst_decay_per_second)?;
        non_negative("health_decay_per_second", self.health_decay_per_second)?;
        non_negative("health_regen_per_second", self.health_regen_per_second)?;
        non_negative("stamina_decay_per_second", self.stamina_decay_per_second)?;
        non_negative("stamina_regen_per_second", self.stamina_regen_per_second)?;
        non_negative("food_hunger_replenish", self.food_hunger_replenish)?;
        non_negative("water_thirst_replenish", self.water_thirst_replenish)?;
        non_negative("damage_per_attack", self.damage_per_attack)?;
        non_negative("commit_seconds", self.commit_seconds)?;
        positive("settle_poll_seconds", self.settle_poll_seconds)?;
        positive("forget_seconds", self.forget_seconds)?;
        non_negative("death_delay_seconds", self.death_delay_seconds)?;
        positive("run_speed_multiplier", self.run_speed_multiplier)?;
        non_negative("run_speed_threshold", self.run_speed_threshold)?;
        non_negative("stamina_recover_fraction", self.stamina_recover_fraction)?;
        non_negative("need_threshold_fraction", self.need_threshold_fraction)?;
        positive("wander_repick_seconds", self.wander_repick_seconds)?;
        positive("give_up_seconds", self.give_up_seconds)?;
        if !(self.child_scale > 0.0 && self.child_scale <= 1.0) {
            return Err(ConfigError::ChildScale(self.child_scale));
        }
        Ok(())
    }
}
