//! Collaborators a creature needs beyond navigation.
//!
//! Queries take `&self`; commands take `&mut self`. Consequences for *other*
//! creatures are never applied directly: they are queued as [`Effect`]s and the
//! host applies them once the acting creature has finished its step.

use eco_core::WorldView;
use eco_nav::{NavWorldMut, Vec3};

use crate::CreatureStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimFlag {
    Eating,
    Drinking,
    Mating,
    Attacking,
    Dead,
}

impl AnimFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimFlag::Eating => "isEating",
            AnimFlag::Drinking => "isDrinking",
            AnimFlag::Mating => "isMating",
            AnimFlag::Attacking => "isAttacking",
            AnimFlag::Dead => "isDead",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter<'a> {
    /// Entities carrying a category tag, e.g. `"berry"`.
    Tag(&'a str),
    /// Living creatures of a species.
    Species(&'a str),
}

/// What one creature may know about another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureSnapshot {
    pub stats: CreatureStats,
    pub health: f32,
    pub can_mate: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect<E> {
    Damage { target: E, amount: f32 },
    MarkMated { target: E },
    Face { target: E, toward: Vec3 },
}

pub trait Animator: WorldView {
    fn set_flag(&mut self, entity: Self::Entity, flag: AnimFlag, on: bool);

    /// `true` while the current clip is unfinished or mid-transition.
    fn is_playing(&self, entity: Self::Entity) -> bool;

    fn set_scale(&mut self, entity: Self::Entity, scale: f32);
}

pub trait Perception: WorldView {
    fn query_nearby(
        &self,
        origin: Vec3,
        radius: f32,
        filter: &QueryFilter<'_>,
    ) -> Vec<Self::Entity>;

    fn creature(&self, entity: Self::Entity) -> Option<CreatureSnapshot>;

    fn exists(&self, entity: Self::Entity) -> bool;
}

pub trait WaterRegistry {
    fn accessible_water_points(&self) -> &[Vec3];
}

pub trait Lifecycle: WorldView {
    fn spawn_offspring(
        &mut self,
        parent: Self::Entity,
        stats: CreatureStats,
        location: Vec3,
    ) -> Option<Self::Entity>;

    fn destroy(&mut self, entity: Self::Entity);

    fn push_effect(&mut self, effect: Effect<Self::Entity>);
}

/// Everything a [`crate::Creature`] talks to.
pub trait CreatureWorld: NavWorldMut + Animator + Perception + WaterRegistry + Lifecycle {}

impl<T> CreatureWorld for T where T: NavWorldMut + Animator + Perception + WaterRegistry + Lifecycle
{}
