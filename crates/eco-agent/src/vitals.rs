//! Mutable needs of one creature. Every value stays within `[0, max]`.

use serde::Serialize;

use crate::{CreatureStats, Tuning};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vitals {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub stamina: f32,
    pub is_child: bool,
    pub child_elapsed_seconds: f32,
    pub scale: f32,
    pub just_mated_recently: bool,
    pub mating_cooldown_remaining: f32,
    /// Set when stamina hits zero; cleared lazily by [`Vitals::can_sprint`].
    pub exhausted: bool,
}

impl Vitals {
    pub fn full(stats: &CreatureStats) -> Self {
        Self {
            health: stats.max_health,
            hunger: stats.max_hunger,
            thirst: stats.max_thirst,
            stamina: stats.max_stamina,
            is_child: false,
            child_elapsed_seconds: 0.0,
            scale: 1.0,
            just_mated_recently: false,
            mating_cooldown_remaining: 0.0,
            exhausted: false,
        }
    }

    pub fn newborn(stats: &CreatureStats, tuning: &Tuning) -> Self {
        Self {
            is_child: true,
            scale: tuning.child_scale,
            ..Self::full(stats)
        }
    }

    pub fn is_hungry(&self, stats: &CreatureStats, tuning: &Tuning) -> bool {
        self.hunger <= stats.max_hunger * tuning.need_threshold_fraction
    }

    pub fn is_thirsty(&self, stats: &CreatureStats, tuning: &Tuning) -> bool {
        self.thirst <= stats.max_thirst * tuning.need_threshold_fraction
    }

    /// Decay hunger and thirst, then drain or regenerate health.
    ///
    /// Returns `true` once health is at zero.
    pub fn decay_needs(&mut self, stats: &CreatureStats, tuning: &Tuning, dt: f32) -> bool {
        self.hunger = clamp(self.hunger - tuning.hunger_decay_per_second * dt, stats.max_hunger);
        self.thirst = clamp(self.thirst - tuning.thirst_decay_per_second * dt, stats.max_thirst);

        if self.health <= 0.0 {
            self.health = 0.0;
            return true;
        }

        let starving = self.hunger <= 0.0 || self.thirst <= 0.0;
        let delta = if starving {
            -tuning.health_decay_per_second * dt
        } else {
            tuning.health_regen_per_second * dt
        };
        self.health = clamp(self.health + delta, stats.max_health);
        self.health <= 0.0
    }

    pub fn update_stamina(
        &mut self,
        stats: &CreatureStats,
        tuning: &Tuning,
        running: bool,
        dt: f32,
    ) {
        if running {
            self.stamina = clamp(
                self.stamina - tuning.stamina_decay_per_second * dt,
                stats.max_stamina,
            );
            if self.stamina <= 0.0 {
                self.exhausted = true;
            }
        } else {
            self.stamina = clamp(
                self.stamina + tuning.stamina_regen_per_second * dt,
                stats.max_stamina,
            );
        }
    }

    /// Whether stamina-draining movement is allowed. Clears `exhausted` once
    /// stamina has recovered past the threshold.
    pub fn can_sprint(&mut self, stats: &CreatureStats, tuning: &Tuning) -> bool {
        if self.exhausted && self.stamina > stats.max_stamina * tuning.stamina_recover_fraction {
            self.exhausted = false;
        }
        !self.exhausted
    }

    /// Advance growth. Returns the new visual scale while it changes.
    pub fn mature(&mut self, stats: &CreatureStats, tuning: &Tuning, dt: f32) -> Option<f32> {
        if !self.is_child {
            return None;
        }

        self.child_elapsed_seconds += dt;
        if self.child_elapsed_seconds >= stats.grow_duration_seconds {
            self.is_child = false;
            self.child_elapsed_seconds = 0.0;
            self.scale = 1.0;
        } else {
            let progress = self.child_elapsed_seconds / stats.grow_duration_seconds;
            self.scale = tuning.child_scale + (1.0 - tuning.child_scale) * progress;
        }
        Some(self.scale)
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if !self.just_mated_recently {
            return;
        }
        self.mating_cooldown_remaining = (self.mating_cooldown_remaining - dt).max(0.0);
        if self.mating_cooldown_remaining <= 0.0 {
            self.just_mated_recently = false;
        }
    }

    pub fn mark_mated(&mut self, stats: &CreatureStats) {
        self.just_mated_recently = true;
        self.mating_cooldown_remaining = stats.mating_cooldown_seconds;
    }

    pub fn replenish_hunger(&mut self, stats: &CreatureStats, amount: f32) {
        self.hunger = clamp(self.hunger + amount, stats.max_hunger);
    }

    pub fn replenish_thirst(&mut self, stats: &CreatureStats, amount: f32) {
        self.thirst = clamp(self.thirst + amount, stats.max_thirst);
    }

    pub fn take_damage(&mut self, stats: &CreatureStats, amount: f32) {
        self.health = clamp(self.health - amount, stats.max_health);
    }
}

fn clamp(value: f32, max: f32) -> f32 {
    value.clamp(0.0, max)
}
