//! Engine stand-in: bodies on a flat square, straight-line navigation and
//! fixed-length animation clips.

use std::collections::{BTreeMap, BTreeSet};

use eco_agent::{
    AnimFlag, Animator, CreatureSnapshot, CreatureStats, Effect, Lifecycle, Perception,
    QueryFilter, WaterRegistry,
};
use eco_core::{DeterministicRng, WorldMut, WorldView};
use eco_nav::{NavWorldMut, NavWorldView, Vec3};

use crate::WorldConfig;

#[derive(Debug, Clone)]
struct Body {
    tag: String,
    /// `Some` for creatures; food and other props carry only a tag.
    species: Option<String>,
    position: Vec3,
    forward: Vec3,
    velocity: Vec3,
    destination: Option<Vec3>,
    max_speed: f32,
    stopped: bool,
    scale: f32,
    flags: BTreeSet<AnimFlag>,
    clip_remaining: f32,
    snapshot: Option<CreatureSnapshot>,
}

impl Body {
    fn new(tag: &str, species: Option<&str>, position: Vec3) -> Self {
        Self {
            tag: tag.to_owned(),
            species: species.map(str::to_owned),
            position,
            forward: Vec3::FORWARD,
            velocity: Vec3::ZERO,
            destination: None,
            max_speed: 0.0,
            stopped: false,
            scale: 1.0,
            flags: BTreeSet::new(),
            clip_remaining: 0.0,
            snapshot: None,
        }
    }
}

/// A creature body created by a successful offspring request.
#[derive(Debug, Clone, PartialEq)]
pub struct Birth {
    pub child: u64,
    pub parent: u64,
    pub species: String,
    pub stats: CreatureStats,
}

#[derive(Debug)]
pub struct SandboxWorld {
    config: WorldConfig,
    bodies: BTreeMap<u64, Body>,
    water: Vec<Vec3>,
    next_id: u64,
    effects: Vec<Effect<u64>>,
    births: Vec<Birth>,
}

impl SandboxWorld {
    pub fn new(config: WorldConfig, water: Vec<Vec3>) -> Self {
        Self {
            config,
            bodies: BTreeMap::new(),
            water,
            next_id: 1,
            effects: Vec::new(),
            births: Vec::new(),
        }
    }

    fn insert(&mut self, body: Body) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(id, body);
        id
    }

    pub fn add_food(&mut self, tag: &str, position: Vec3) -> u64 {
        let position = self.clamp(position);
        self.insert(Body::new(tag, None, position))
    }

    /// Creatures are tagged with their species name, which is what predators and
    /// carnivores query for.
    pub fn add_creature(&mut self, species: &str, position: Vec3) -> u64 {
        let position = self.clamp(position);
        self.insert(Body::new(species, Some(species), position))
    }

    /// Publish what other creatures may see of `entity`.
    pub fn sync(&mut self, entity: u64, snapshot: CreatureSnapshot) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.snapshot = Some(snapshot);
        }
    }

    pub fn take_effects(&mut self) -> Vec<Effect<u64>> {
        std::mem::take(&mut self.effects)
    }

    pub fn take_births(&mut self) -> Vec<Birth> {
        std::mem::take(&mut self.births)
    }

    pub fn creature_count(&self) -> usize {
        self.bodies.values().filter(|b| b.species.is_some()).count()
    }

    pub fn count_tag(&self, tag: &str) -> usize {
        self.bodies
            .values()
            .filter(|b| b.species.is_none() && b.tag == tag)
            .count()
    }

    pub fn scale(&self, entity: u64) -> Option<f32> {
        self.bodies.get(&entity).map(|b| b.scale)
    }

    pub fn flags(&self, entity: u64) -> Option<&BTreeSet<AnimFlag>> {
        self.bodies.get(&entity).map(|b| &b.flags)
    }

    /// Uniform point on the ground inside the world.
    pub fn random_point<R: DeterministicRng>(&self, rng: &mut R) -> Vec3 {
        let half = self.config.half_extent;
        Vec3::new(rng.next_f32_signed() * half, 0.0, rng.next_f32_signed() * half)
    }

    /// Move every unstopped body toward its destination and run down clip timers.
    pub fn integrate(&mut self, dt: f32) {
        let stopping = self.config.stopping_distance;
        let half = self.config.half_extent;

        for body in self.bodies.values_mut() {
            body.clip_remaining = (body.clip_remaining - dt).max(0.0);
            body.velocity = Vec3::ZERO;

            let Some(destination) = body.destination else {
                continue;
            };
            if body.stopped || body.max_speed <= 0.0 || dt <= 0.0 {
                continue;
            }
            let to_go = (destination - body.position).flatten();
            let distance = to_go.length();
            if distance <= stopping {
                continue;
            }

            let direction = to_go / distance;
            let step = (body.max_speed * dt).min(distance);
            let next = body.position + direction * step;
            body.position = Vec3::new(next.x.clamp(-half, half), 0.0, next.z.clamp(-half, half));
            body.velocity = direction * (step / dt);
            body.forward = direction;
        }
    }

    fn clamp(&self, point: Vec3) -> Vec3 {
        let half = self.config.half_extent;
        Vec3::new(point.x.clamp(-half, half), 0.0, point.z.clamp(-half, half))
    }
}

impl WorldView for SandboxWorld {
    type Entity = u64;
}

impl WorldMut for SandboxWorld {}

impl NavWorldView for SandboxWorld {
    fn position(&self, entity: u64) -> Option<Vec3> {
        self.bodies.get(&entity).map(|b| b.position)
    }

    fn forward(&self, entity: u64) -> Option<Vec3> {
        self.bodies.get(&entity).map(|b| b.forward)
    }

    fn velocity(&self, entity: u64) -> Vec3 {
        self.bodies
            .get(&entity)
            .map_or(Vec3::ZERO, |b| b.velocity)
    }

    fn radius(&self, _entity: u64) -> f32 {
        self.config.agent_radius
    }

    fn stopping_distance(&self, _entity: u64) -> f32 {
        self.config.stopping_distance
    }

    fn reached_end(&self, entity: u64) -> bool {
        let stopping = self.config.stopping_distance;
        self.bodies.get(&entity).is_some_and(|b| {
            b.destination
                .is_some_and(|d| (d - b.position).flatten().length() <= stopping)
        })
    }

    fn has_path(&self, entity: u64) -> bool {
        self.bodies
            .get(&entity)
            .is_some_and(|b| b.destination.is_some())
    }

    fn path_pending(&self, _entity: u64) -> bool {
        false
    }
}

impl NavWorldMut for SandboxWorld {
    fn set_destination(&mut self, entity: u64, destination: Vec3) -> bool {
        let destination = self.clamp(destination);
        match self.bodies.get_mut(&entity) {
            Some(body) => {
                body.destination = Some(destination);
                true
            }
            None => false,
        }
    }

    fn set_max_speed(&mut self, entity: u64, speed: f32) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.max_speed = speed;
        }
    }

    fn set_stopped(&mut self, entity: u64, stopped: bool) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.stopped = stopped;
        }
    }

    fn look_at(&mut self, entity: u64, point: Vec3) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            let facing = (point - body.position).flatten().normalize_or_zero();
            if facing != Vec3::ZERO {
                body.forward = facing;
            }
        }
    }
}

impl Animator for SandboxWorld {
    fn set_flag(&mut self, entity: u64, flag: AnimFlag, on: bool) {
        let clip = self.config.clip_seconds;
        if let Some(body) = self.bodies.get_mut(&entity) {
            if on {
                body.flags.insert(flag);
                body.clip_remaining = clip;
            } else {
                body.flags.remove(&flag);
            }
        }
    }

    fn is_playing(&self, entity: u64) -> bool {
        self.bodies
            .get(&entity)
            .is_some_and(|b| b.clip_remaining > 0.0)
    }

    fn set_scale(&mut self, entity: u64, scale: f32) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.scale = scale;
        }
    }
}

impl Perception for SandboxWorld {
    fn query_nearby(&self, origin: Vec3, radius: f32, filter: &QueryFilter<'_>) -> Vec<u64> {
        let radius_sq = radius * radius;
        self.bodies
            .iter()
            .filter(|(_, b)| b.position.distance_squared(origin) <= radius_sq)
            .filter(|(_, b)| match filter {
                QueryFilter::Tag(tag) => b.tag == *tag,
                QueryFilter::Species(species) => b.species.as_deref() == Some(*species),
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn creature(&self, entity: u64) -> Option<CreatureSnapshot> {
        self.bodies.get(&entity).and_then(|b| b.snapshot)
    }

    fn exists(&self, entity: u64) -> bool {
        self.bodies.contains_key(&entity)
    }
}

impl WaterRegistry for SandboxWorld {
    fn accessible_water_points(&self) -> &[Vec3] {
        &self.water
    }
}

impl Lifecycle for SandboxWorld {
    fn spawn_offspring(&mut self, parent: u64, stats: CreatureStats, location: Vec3) -> Option<u64> {
        if self.creature_count() >= self.config.max_population {
            return None;
        }
        let species = self.bodies.get(&parent)?.species.clone()?;
        let child = self.add_creature(&species, location);
        self.births.push(Birth {
            child,
            parent,
            species,
            stats,
        });
        Some(child)
    }

    fn destroy(&mut self, entity: u64) {
        self.bodies.remove(&entity);
    }

    fn push_effect(&mut self, effect: Effect<u64>) {
        self.effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> SandboxWorld {
        SandboxWorld::new(WorldConfig::default(), Vec::new())
    }

    #[test]
    fn bodies_walk_toward_their_destination() {
        let mut w = world();
        let id = w.add_creature("deer", Vec3::ZERO);
        w.set_max_speed(id, 2.0);
        w.set_destination(id, Vec3::new(10.0, 0.0, 0.0));

        w.integrate(0.5);
        assert_eq!(w.position(id), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(w.velocity(id), Vec3::new(2.0, 0.0, 0.0));
        assert!(!w.reached_end(id));

        for _ in 0..20 {
            w.integrate(0.5);
        }
        assert!(w.reached_end(id));
        assert_eq!(w.velocity(id), Vec3::ZERO);
    }

    #[test]
    fn stopped_bodies_hold_position() {
        let mut w = world();
        let id = w.add_creature("deer", Vec3::ZERO);
        w.set_max_speed(id, 2.0);
        w.set_destination(id, Vec3::new(10.0, 0.0, 0.0));
        w.set_stopped(id, true);
        w.integrate(1.0);
        assert_eq!(w.position(id), Some(Vec3::ZERO));
    }

    #[test]
    fn destinations_are_clamped_to_the_world() {
        let mut w = world();
        let id = w.add_creature("deer", Vec3::ZERO);
        w.set_destination(id, Vec3::new(1_000.0, 4.0, -1_000.0));
        w.set_max_speed(id, 1_000.0);
        w.integrate(10.0);
        let p = w.position(id).unwrap();
        assert!(p.distance(Vec3::new(30.0, 0.0, -30.0)) < 1e-3);
    }

    #[test]
    fn clips_play_for_their_length() {
        let mut w = world();
        let id = w.add_creature("deer", Vec3::ZERO);
        w.set_flag(id, AnimFlag::Eating, true);
        assert!(w.is_playing(id));
        w.integrate(0.5);
        assert!(w.is_playing(id));
        w.integrate(0.5);
        assert!(!w.is_playing(id));
    }

    #[test]
    fn tag_queries_separate_food_from_creatures() {
        let mut w = world();
        let berry = w.add_food("berry", Vec3::new(1.0, 0.0, 0.0));
        let deer = w.add_creature("deer", Vec3::new(2.0, 0.0, 0.0));
        w.add_food("berry", Vec3::new(20.0, 0.0, 0.0));

        assert_eq!(w.query_nearby(Vec3::ZERO, 5.0, &QueryFilter::Tag("berry")), vec![berry]);
        assert_eq!(w.query_nearby(Vec3::ZERO, 5.0, &QueryFilter::Species("deer")), vec![deer]);
        assert_eq!(w.count_tag("berry"), 2);
        assert_eq!(w.creature_count(), 1);
    }

    #[test]
    fn offspring_respect_the_population_cap() {
        let mut w = SandboxWorld::new(
            WorldConfig {
                max_population: 2,
                ..WorldConfig::default()
            },
            Vec::new(),
        );
        let mother = w.add_creature("deer", Vec3::ZERO);
        let stats = CreatureStats::default();

        let child = w.spawn_offspring(mother, stats, Vec3::ZERO);
        assert!(child.is_some());
        assert_eq!(w.spawn_offspring(mother, stats, Vec3::ZERO), None);

        let births = w.take_births();
        assert_eq!(births.len(), 1);
        assert_eq!(births[0].species, "deer");
        assert_eq!(Some(births[0].child), child);
    }
}
