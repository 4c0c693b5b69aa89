#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use eco_agent::{
    AnimFlag, Animator, Creature, CreatureSnapshot, CreatureStats, Effect, Lifecycle, Perception,
    QueryFilter, Tuning, WaterRegistry,
};
use eco_core::{TickContext, WorldMut, WorldView};
use eco_nav::{NavWorldMut, NavWorldView, Vec3};

#[derive(Debug, Clone, Default)]
pub struct Body {
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub tag: Option<String>,
    pub species: Option<String>,
    pub snapshot: Option<CreatureSnapshot>,
    pub destination: Option<Vec3>,
    pub max_speed: f32,
    pub stopped: bool,
    pub scale: f32,
    pub flags: BTreeSet<AnimFlag>,
}

#[derive(Debug, Default)]
pub struct MockWorld {
    pub bodies: BTreeMap<u32, Body>,
    pub water: Vec<Vec3>,
    pub effects: Vec<Effect<u32>>,
    pub destroyed: Vec<u32>,
    pub spawned: Vec<(u32, CreatureStats, Vec3)>,
    pub next_id: u32,
    pub stopping_distance: f32,
    pub radius: f32,
    pub path_available: bool,
    pub reached_end: bool,
    pub playing: bool,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            stopping_distance: 0.5,
            radius: 0.5,
            path_available: true,
            ..Self::default()
        }
    }

    fn insert(&mut self, body: Body) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(id, body);
        id
    }

    pub fn add_food(&mut self, tag: &str, position: Vec3) -> u32 {
        self.insert(Body {
            position,
            forward: Vec3::FORWARD,
            tag: Some(tag.to_owned()),
            ..Body::default()
        })
    }

    pub fn add_creature(&mut self, species: &str, position: Vec3) -> u32 {
        self.insert(Body {
            position,
            forward: Vec3::FORWARD,
            tag: Some(species.to_owned()),
            species: Some(species.to_owned()),
            scale: 1.0,
            ..Body::default()
        })
    }

    pub fn body(&self, id: u32) -> &Body {
        &self.bodies[&id]
    }

    pub fn body_mut(&mut self, id: u32) -> &mut Body {
        self.bodies.get_mut(&id).expect("unknown body")
    }

    pub fn set_snapshot(&mut self, id: u32, snapshot: CreatureSnapshot) {
        self.body_mut(id).snapshot = Some(snapshot);
    }

    pub fn sync(&mut self, creature: &Creature<u32>) {
        self.set_snapshot(creature.id(), creature.snapshot());
    }
}

impl WorldView for MockWorld {
    type Entity = u32;
}

impl WorldMut for MockWorld {}

impl NavWorldView for MockWorld {
    fn position(&self, entity: u32) -> Option<Vec3> {
        self.bodies.get(&entity).map(|b| b.position)
    }

    fn forward(&self, entity: u32) -> Option<Vec3> {
        self.bodies.get(&entity).map(|b| b.forward)
    }

    fn velocity(&self, entity: u32) -> Vec3 {
        self.bodies
            .get(&entity)
            .map(|b| b.velocity)
            .unwrap_or(Vec3::ZERO)
    }

    fn radius(&self, _entity: u32) -> f32 {
        self.radius
    }

    fn stopping_distance(&self, _entity: u32) -> f32 {
        self.stopping_distance
    }

    fn reached_end(&self, _entity: u32) -> bool {
        self.reached_end
    }

    fn has_path(&self, entity: u32) -> bool {
        self.path_available && self.bodies.get(&entity).is_some_and(|b| b.destination.is_some())
    }

    fn path_pending(&self, _entity: u32) -> bool {
        false
    }
}

impl NavWorldMut for MockWorld {
    fn set_destination(&mut self, entity: u32, destination: Vec3) -> bool {
        match self.bodies.get_mut(&entity) {
            Some(b) => {
                b.destination = Some(destination);
                true
            }
            None => false,
        }
    }

    fn set_max_speed(&mut self, entity: u32, speed: f32) {
        self.body_mut(entity).max_speed = speed;
    }

    fn set_stopped(&mut self, entity: u32, stopped: bool) {
        self.body_mut(entity).stopped = stopped;
    }

    fn look_at(&mut self, entity: u32, point: Vec3) {
        let b = self.body_mut(entity);
        let dir = (point - b.position).flatten().normalize_or_zero();
        if dir != Vec3::ZERO {
            b.forward = dir;
        }
    }
}

impl Animator for MockWorld {
    fn set_flag(&mut self, entity: u32, flag: AnimFlag, on: bool) {
        let flags = &mut self.body_mut(entity).flags;
        if on {
            flags.insert(flag);
        } else {
            flags.remove(&flag);
        }
    }

    fn is_playing(&self, _entity: u32) -> bool {
        self.playing
    }

    fn set_scale(&mut self, entity: u32, scale: f32) {
        self.body_mut(entity).scale = scale;
    }
}

impl Perception for MockWorld {
    fn query_nearby(&self, origin: Vec3, radius: f32, filter: &QueryFilter<'_>) -> Vec<u32> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.position.distance(origin) <= radius)
            .filter(|(_, b)| match filter {
                QueryFilter::Tag(tag) => b.tag.as_deref() == Some(*tag),
                QueryFilter::Species(s) => b.species.as_deref() == Some(*s),
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn creature(&self, entity: u32) -> Option<CreatureSnapshot> {
        self.bodies.get(&entity).and_then(|b| b.snapshot)
    }

    fn exists(&self, entity: u32) -> bool {
        self.bodies.contains_key(&entity)
    }
}

impl WaterRegistry for MockWorld {
    fn accessible_water_points(&self) -> &[Vec3] {
        &self.water
    }
}

impl Lifecycle for MockWorld {
    fn spawn_offspring(&mut self, parent: u32, stats: CreatureStats, location: Vec3) -> Option<u32> {
        self.spawned.push((parent, stats, location));
        let species = self.bodies.get(&parent)?.species.clone()?;
        Some(self.add_creature(&species, location))
    }

    fn destroy(&mut self, entity: u32) {
        self.bodies.remove(&entity);
        self.destroyed.push(entity);
    }

    fn push_effect(&mut self, effect: Effect<u32>) {
        self.effects.push(effect);
    }
}

/// Tuning with every passive rate at zero, so tests see only what they cause.
pub fn still_tuning() -> Tuning {
    Tuning {
        hunger_decay_per_second: 0.0,
        thirst_decay_per_second: 0.0,
        health_decay_per_second: 0.0,
        health_regen_per_second: 0.0,
        stamina_decay_per_second: 0.0,
        stamina_regen_per_second: 0.0,
        ..Tuning::default()
    }
}

pub fn spawn(
    world: &mut MockWorld,
    species: &str,
    position: Vec3,
    stats: CreatureStats,
    tuning: Tuning,
) -> Creature<u32> {
    let id = world.add_creature(species, position);
    let creature = Creature::new(id, species, stats, tuning, &*world, 7).expect("valid creature");
    world.sync(&creature);
    creature
}

pub fn at(time_seconds: f64, dt_seconds: f32) -> TickContext {
    TickContext {
        tick: (time_seconds / f64::from(dt_seconds)).round() as u64,
        dt_seconds,
        time_seconds,
        seed: 7,
    }
}

/// Run `update` repeatedly from `start`; returns the clock after the last step.
pub fn run(creature: &mut Creature<u32>, world: &mut MockWorld, start: f64, dt: f32, steps: u32) -> f64 {
    let mut now = start;
    for _ in 0..steps {
        creature.update(&at(now, dt), world);
        now += f64::from(dt);
    }
    now
}
