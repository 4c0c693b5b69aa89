//! One creature's decision-side runtime: needs, state, steering and interactions.

use eco_bt::LeafFault;
use eco_core::rng::derive_seed;
use eco_core::{EntityId, SplitMix64, TickContext};
use eco_nav::steering::{self, Kinematics};
use eco_nav::{NavWorldMut, NavWorldView, Vec3};

use crate::error::{self, ConfigError};
use crate::interaction::{Interaction, InteractionKind, InteractionTarget, Phase, Progress, TimedTask};
use crate::memory::TargetMemory;
use crate::world::{AnimFlag, CreatureSnapshot, CreatureWorld, Effect};
use crate::{CreatureState, CreatureStats, Gender, Tuning, Vitals};

const WANDER_STREAM: u64 = 0x57A9_DE12;
const INTERACT_MARGIN: f32 = 0.1;

/// Outcome of a go-to or chase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoTo {
    Moving,
    /// No path, or no arrival within `give_up_seconds`; the target is now blacklisted.
    GaveUp,
    /// Too tired to run.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal<E> {
    Entity(E),
    Water([u32; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Approach<E> {
    goal: Goal<E>,
    since: f64,
}

#[derive(Debug)]
pub struct Creature<E: EntityId> {
    pub(crate) id: E,
    species: String,
    pub(crate) stats: CreatureStats,
    pub(crate) tuning: Tuning,
    pub(crate) vitals: Vitals,
    state: CreatureState,
    pub(crate) interact_radius: f32,
    pub(crate) reproduce_radius: f32,
    pub(crate) target_memory: TargetMemory<E>,
    pub(crate) water_memory: TargetMemory<[u32; 3]>,
    interaction: Option<Interaction<E>>,
    death: Option<TimedTask>,
    destroy_requested: bool,
    rng: SplitMix64,
    wander_elapsed: f32,
    approach: Option<Approach<E>>,
    pub(crate) now: f64,
}

impl<E: EntityId> Creature<E> {
    /// Validate the configuration and derive the interaction radii from the
    /// navigation agent's stopping distance and body radius.
    pub fn new<W>(
        id: E,
        species: impl Into<String>,
        stats: CreatureStats,
        tuning: Tuning,
        world: &W,
        seed: u64,
    ) -> Result<Self, ConfigError>
    where
        W: NavWorldView<Entity = E>,
    {
        stats.validate()?;
        tuning.validate()?;
        if world.position(id).is_none() {
            return Err(ConfigError::NotNavigable(id.stable_id()));
        }

        let stopping = world.stopping_distance(id);
        let interact_radius = stopping + INTERACT_MARGIN;
        let reproduce_radius = stopping + 2.0 * world.radius(id);
        error::positive("interact_radius", interact_radius)?;
        error::positive("reproduce_radius", reproduce_radius)?;

        let forget = f64::from(tuning.forget_seconds);
        Ok(Self {
            id,
            species: species.into(),
            stats,
            tuning,
            vitals: Vitals::full(&stats),
            state: CreatureState::Wandering,
            interact_radius,
            reproduce_radius,
            target_memory: TargetMemory::new(forget),
            water_memory: TargetMemory::new(forget),
            interaction: None,
            death: None,
            destroy_requested: false,
            rng: SplitMix64::new(derive_seed(seed, id.stable_id(), WANDER_STREAM)),
            // First wander picks a destination straight away.
            wander_elapsed: tuning.wander_repick_seconds,
            approach: None,
            now: 0.0,
        })
    }

    /// Start life as a newborn at child scale.
    pub fn with_child(mut self) -> Self {
        self.vitals = Vitals::newborn(&self.stats, &self.tuning);
        self
    }

    pub fn id(&self) -> E {
        self.id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn stats(&self) -> &CreatureStats {
        &self.stats
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    pub fn state(&self) -> CreatureState {
        self.state
    }

    /// Ignored once the creature is dead.
    pub fn set_state(&mut self, state: CreatureState) {
        if self.state.is_terminal() || self.state == state {
            return;
        }
        tracing::trace!(
            creature = self.id.stable_id(),
            from = %self.state,
            to = %state,
            "state change"
        );
        self.state = state;
    }

    pub fn interact_radius(&self) -> f32 {
        self.interact_radius
    }

    pub fn reproduce_radius(&self) -> f32 {
        self.reproduce_radius
    }

    /// Clock of the last [`Creature::update`].
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_terminal()
    }

    /// Dead and the destroy request has been issued.
    pub fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }

    pub fn is_hungry(&self) -> bool {
        self.vitals.is_hungry(&self.stats, &self.tuning)
    }

    pub fn is_thirsty(&self) -> bool {
        self.vitals.is_thirsty(&self.stats, &self.tuning)
    }

    pub fn can_mate(&self) -> bool {
        !self.is_dead()
            && !self.vitals.just_mated_recently
            && !self.vitals.is_child
            && !self.is_hungry()
            && !self.is_thirsty()
    }

    pub fn can_sprint(&mut self) -> bool {
        self.vitals.can_sprint(&self.stats, &self.tuning)
    }

    pub fn interaction_in_progress(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn active_interaction(&self) -> Option<InteractionKind> {
        self.interaction.map(|i| i.kind)
    }

    pub fn interaction_phase(&self) -> Option<Phase> {
        self.interaction.map(|i| i.task.phase())
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            stats: self.stats,
            health: self.vitals.health,
            can_mate: self.can_mate(),
            alive: !self.is_dead(),
        }
    }

    /// Advance needs, growth, cooldowns, memory and any interaction by one step.
    pub fn update<W>(&mut self, ctx: &TickContext, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        self.now = ctx.time_seconds;
        let dt = ctx.dt_seconds;

        if self.is_dead() {
            self.advance_death(dt, world);
            return;
        }

        if self.vitals.decay_needs(&self.stats, &self.tuning, dt) {
            self.die(world);
            return;
        }

        let running = self.state == CreatureState::Running
            && world.velocity(self.id).length() > self.tuning.run_speed_threshold;
        self.vitals
            .update_stamina(&self.stats, &self.tuning, running, dt);

        if let Some(scale) = self.vitals.mature(&self.stats, &self.tuning, dt) {
            world.set_scale(self.id, scale);
        }
        self.vitals.tick_cooldown(dt);

        self.target_memory.purge_due(self.now);
        self.water_memory.purge_due(self.now);

        self.advance_interaction(dt, world);
    }

    pub fn take_damage(&mut self, amount: f32) {
        if !self.is_dead() {
            self.vitals.take_damage(&self.stats, amount);
        }
    }

    pub fn mark_mated(&mut self) {
        if !self.is_dead() {
            self.vitals.mark_mated(&self.stats);
        }
    }

    /// Enter `Dead`: stop moving, raise the death flag and schedule the destroy request.
    pub fn die<W>(&mut self, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        if self.is_dead() {
            return;
        }
        if let Some(interaction) = self.interaction.take() {
            world.set_flag(self.id, interaction.kind.flag(), false);
        }
        self.approach = None;
        self.set_state(CreatureState::Dead);
        world.set_stopped(self.id, true);
        world.set_flag(self.id, AnimFlag::Dead, true);
        self.death = Some(TimedTask::new(
            self.tuning.death_delay_seconds,
            self.tuning.settle_poll_seconds,
        ));
        tracing::info!(
            creature = self.id.stable_id(),
            species = %self.species,
            "creature died"
        );
    }

    fn advance_death<W>(&mut self, dt: f32, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        let id = self.id;
        let Some(task) = self.death.as_mut() else {
            return;
        };
        if task.advance(dt, || world.is_playing(id)) == Progress::Ready {
            self.death = None;
            self.destroy_requested = true;
            world.destroy(id);
        }
    }

    pub fn seek<W>(&mut self, world: &mut W, point: Vec3) -> bool
    where
        W: NavWorldMut<Entity = E>,
    {
        world.set_max_speed(self.id, self.stats.speed);
        world.set_destination(self.id, point)
    }

    pub fn seek_run<W>(&mut self, world: &mut W, point: Vec3) -> bool
    where
        W: NavWorldMut<Entity = E>,
    {
        world.set_max_speed(self.id, self.run_speed());
        world.set_destination(self.id, point)
    }

    pub fn flee<W>(&mut self, world: &mut W, threat: Vec3) -> Result<(), LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        self.approach = None;
        let position = world
            .position(self.id)
            .ok_or(LeafFault::Stale("own position"))?;
        self.run_to(world, steering::flee_point(position, threat));
        Ok(())
    }

    /// Run to where `target` is predicted to be. Returns `Ok(false)` while exhausted.
    pub fn pursue<W>(&mut self, world: &mut W, target: E) -> Result<bool, LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        if !self.can_sprint() {
            return Ok(false);
        }
        let me = kinematics(world, self.id).ok_or(LeafFault::Stale("own position"))?;
        let them = kinematics(world, target).ok_or(LeafFault::Stale("pursuit target"))?;
        let aim = steering::pursue(&me, self.run_speed(), &them);
        self.set_state(CreatureState::Running);
        self.seek_run(world, aim.point());
        Ok(true)
    }

    /// Run away from where `threat` is predicted to be, or anywhere in view when cornered.
    pub fn evade<W>(&mut self, world: &mut W, threat: E) -> Result<(), LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        self.approach = None;
        let me = kinematics(world, self.id).ok_or(LeafFault::Stale("own position"))?;
        let them = kinematics(world, threat).ok_or(LeafFault::Stale("evade target"))?;
        let mut run_to = steering::evade(&me, self.run_speed(), &them);
        if steering::is_cornered(me.position, run_to) {
            run_to = steering::random_point_in_range(&mut self.rng, me.position, self.stats.fov_range);
        }
        self.run_to(world, run_to);
        Ok(())
    }

    pub fn wander<W>(&mut self, ctx: &TickContext, world: &mut W)
    where
        W: NavWorldMut<Entity = E>,
    {
        self.set_state(CreatureState::Wandering);
        self.approach = None;
        self.wander_elapsed += ctx.dt_seconds;

        let idle = !world.path_pending(self.id)
            && (world.reached_end(self.id) || !world.has_path(self.id));
        if !idle && self.wander_elapsed < self.tuning.wander_repick_seconds {
            return;
        }

        let Some(origin) = world.position(self.id) else {
            return;
        };
        let point = steering::random_point_in_range(&mut self.rng, origin, self.stats.fov_range);
        self.seek(world, point);
        self.wander_elapsed = 0.0;
    }

    pub fn is_at_destination<W>(&self, world: &W) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        !world.path_pending(self.id) && world.reached_end(self.id)
    }

    /// Walk to a food or prey entity, entering `state`.
    pub fn go_to_target<W>(
        &mut self,
        world: &mut W,
        target: E,
        state: CreatureState,
    ) -> Result<GoTo, LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        let position = world
            .position(target)
            .ok_or(LeafFault::Stale("go-to target"))?;
        if self.approach_expired(Goal::Entity(target)) || !self.seek_with_path(world, position) {
            self.approach = None;
            self.blacklist_target(target);
            return Ok(GoTo::GaveUp);
        }
        self.set_state(state);
        Ok(GoTo::Moving)
    }

    pub fn go_to_water<W>(&mut self, world: &mut W, point: Vec3) -> GoTo
    where
        W: NavWorldMut<Entity = E>,
    {
        if self.approach_expired(Goal::Water(point.bits())) || !self.seek_with_path(world, point) {
            self.approach = None;
            self.blacklist_water_point(point);
            return GoTo::GaveUp;
        }
        self.set_state(CreatureState::GoingToWater);
        GoTo::Moving
    }

    pub fn go_to_mate<W>(&mut self, world: &mut W, mate: E) -> Result<(), LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        self.approach = None;
        let position = world.position(mate).ok_or(LeafFault::Stale("mate"))?;
        self.seek(world, position);
        self.set_state(CreatureState::GoingToMate);
        Ok(())
    }

    /// Pursue prey, giving up on it after `give_up_seconds`.
    pub fn chase<W>(&mut self, world: &mut W, prey: E) -> Result<GoTo, LeafFault>
    where
        W: NavWorldMut<Entity = E>,
    {
        if self.approach_expired(Goal::Entity(prey)) {
            self.approach = None;
            self.blacklist_target(prey);
            return Ok(GoTo::GaveUp);
        }
        if self.pursue(world, prey)? {
            Ok(GoTo::Moving)
        } else {
            Ok(GoTo::Exhausted)
        }
    }

    fn run_speed(&self) -> f32 {
        self.stats.speed * self.tuning.run_speed_multiplier
    }

    /// Run when stamina allows, otherwise walk without entering `Running`.
    fn run_to<W>(&mut self, world: &mut W, point: Vec3)
    where
        W: NavWorldMut<Entity = E>,
    {
        if self.can_sprint() {
            self.set_state(CreatureState::Running);
            self.seek_run(world, point);
        } else {
            self.seek(world, point);
        }
    }

    fn seek_with_path<W>(&mut self, world: &mut W, point: Vec3) -> bool
    where
        W: NavWorldMut<Entity = E>,
    {
        self.seek(world, point) && (world.has_path(self.id) || world.path_pending(self.id))
    }

    fn approach_expired(&mut self, goal: Goal<E>) -> bool {
        match self.approach {
            Some(a) if a.goal == goal => {
                self.now - a.since > f64::from(self.tuning.give_up_seconds)
            }
            _ => {
                self.approach = Some(Approach {
                    goal,
                    since: self.now,
                });
                false
            }
        }
    }

    pub fn begin_eat<W>(&mut self, world: &mut W, food: E) -> Result<bool, LeafFault>
    where
        W: CreatureWorld<Entity = E>,
    {
        if !self.may_begin(InteractionKind::Eat) {
            return Ok(false);
        }
        if !world.exists(food) {
            return Err(LeafFault::Stale("food"));
        }
        let commit = self.tuning.commit_seconds;
        self.begin(world, InteractionKind::Eat, InteractionTarget::Entity(food), commit);
        Ok(true)
    }

    pub fn begin_drink<W>(&mut self, world: &mut W, point: Vec3) -> bool
    where
        W: CreatureWorld<Entity = E>,
    {
        if !self.may_begin(InteractionKind::Drink) {
            return false;
        }
        let commit = self.tuning.commit_seconds;
        self.begin(world, InteractionKind::Drink, InteractionTarget::Point(point), commit);
        true
    }

    pub fn begin_attack<W>(&mut self, world: &mut W, prey: E) -> Result<bool, LeafFault>
    where
        W: CreatureWorld<Entity = E>,
    {
        if !self.may_begin(InteractionKind::Attack) {
            return Ok(false);
        }
        let position = world.position(prey).ok_or(LeafFault::Stale("prey"))?;
        world.look_at(self.id, position);
        let commit = self.tuning.commit_seconds;
        self.begin(world, InteractionKind::Attack, InteractionTarget::Entity(prey), commit);
        Ok(true)
    }

    /// Both partners turn to face each other; the wait is the longer of the two
    /// reproduction times.
    pub fn begin_mate<W>(&mut self, world: &mut W, partner: E) -> Result<bool, LeafFault>
    where
        W: CreatureWorld<Entity = E>,
    {
        if !self.may_begin(InteractionKind::Mate) {
            return Ok(false);
        }
        let other = world.creature(partner).ok_or(LeafFault::Stale("mate"))?;
        let there = world.position(partner).ok_or(LeafFault::Stale("mate"))?;
        let here = world
            .position(self.id)
            .ok_or(LeafFault::Stale("own position"))?;

        world.look_at(self.id, there);
        world.push_effect(Effect::Face {
            target: partner,
            toward: here,
        });
        let wait = self
            .stats
            .reproduction_time_seconds
            .max(other.stats.reproduction_time_seconds);
        self.begin(world, InteractionKind::Mate, InteractionTarget::Entity(partner), wait);
        Ok(true)
    }

    fn may_begin(&self, kind: InteractionKind) -> bool {
        !self.is_dead() && self.state != kind.active_state() && self.interaction.is_none()
    }

    fn begin<W>(
        &mut self,
        world: &mut W,
        kind: InteractionKind,
        target: InteractionTarget<E>,
        commit_seconds: f32,
    ) where
        W: CreatureWorld<Entity = E>,
    {
        world.set_stopped(self.id, true);
        self.approach = None;
        self.set_state(kind.active_state());
        world.set_flag(self.id, kind.flag(), true);
        self.interaction = Some(Interaction {
            kind,
            target,
            task: TimedTask::new(commit_seconds, self.tuning.settle_poll_seconds),
        });
        tracing::trace!(creature = self.id.stable_id(), ?kind, "interaction begun");
    }

    fn advance_interaction<W>(&mut self, dt: f32, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        let Some(mut interaction) = self.interaction.take() else {
            return;
        };
        if let Some(target) = interaction.target.entity() {
            if !world.exists(target) {
                self.cancel(interaction, world);
                return;
            }
        }

        let id = self.id;
        match interaction.task.advance(dt, || world.is_playing(id)) {
            Progress::Pending => self.interaction = Some(interaction),
            Progress::Ready => self.resolve(interaction, world),
        }
    }

    fn cancel<W>(&mut self, interaction: Interaction<E>, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        world.set_flag(self.id, interaction.kind.flag(), false);
        world.set_stopped(self.id, false);
        self.set_state(CreatureState::Wandering);
        tracing::debug!(
            creature = self.id.stable_id(),
            kind = ?interaction.kind,
            "interaction target vanished"
        );
    }

    fn resolve<W>(&mut self, interaction: Interaction<E>, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        let kind = interaction.kind;
        match (kind, interaction.target) {
            (InteractionKind::Eat, InteractionTarget::Entity(food)) => {
                world.destroy(food);
                self.vitals
                    .replenish_hunger(&self.stats, self.tuning.food_hunger_replenish);
            }
            (InteractionKind::Drink, _) => {
                self.vitals
                    .replenish_thirst(&self.stats, self.tuning.water_thirst_replenish);
            }
            (InteractionKind::Attack, InteractionTarget::Entity(prey)) => {
                self.resolve_attack(prey, world);
            }
            (InteractionKind::Mate, InteractionTarget::Entity(partner)) => {
                self.resolve_mate(partner, world);
            }
            _ => {}
        }

        world.set_flag(self.id, kind.flag(), false);
        self.set_state(kind.done_state());
        world.set_stopped(self.id, false);
        tracing::trace!(creature = self.id.stable_id(), ?kind, "interaction resolved");
    }

    fn resolve_attack<W>(&mut self, prey: E, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        if let Some(position) = world.position(prey) {
            world.look_at(self.id, position);
        }
        let Some(target) = world.creature(prey).filter(|s| s.alive) else {
            return;
        };

        let damage = self.tuning.damage_per_attack;
        world.push_effect(Effect::Damage {
            target: prey,
            amount: damage,
        });
        if target.health - damage < 0.0 {
            self.vitals
                .replenish_hunger(&self.stats, 2.0 * self.tuning.food_hunger_replenish);
            tracing::debug!(
                creature = self.id.stable_id(),
                prey = prey.stable_id(),
                "kill"
            );
        }
    }

    fn resolve_mate<W>(&mut self, partner: E, world: &mut W)
    where
        W: CreatureWorld<Entity = E>,
    {
        self.vitals.mark_mated(&self.stats);
        world.push_effect(Effect::MarkMated { target: partner });

        if self.stats.gender != Gender::Female {
            return;
        }
        let Some(other) = world.creature(partner) else {
            return;
        };
        let Some(location) = world.position(self.id) else {
            return;
        };

        let child_stats = self.stats.merge(&other.stats);
        match world.spawn_offspring(self.id, child_stats, location) {
            Some(child) => tracing::info!(
                mother = self.id.stable_id(),
                father = partner.stable_id(),
                child = child.stable_id(),
                species = %self.species,
                "offspring born"
            ),
            None => tracing::debug!(mother = self.id.stable_id(), "offspring spawn refused"),
        }
    }
}

fn kinematics<W: NavWorldView>(world: &W, entity: W::Entity) -> Option<Kinematics> {
    Some(Kinematics {
        position: world.position(entity)?,
        forward: world.forward(entity).unwrap_or(Vec3::FORWARD),
        speed: world.velocity(entity).length(),
    })
}
