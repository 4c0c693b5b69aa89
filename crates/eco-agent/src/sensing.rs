//! What a creature can see, what it can reach, and what it has given up on.
//!
//! Candidate lists are unbounded and ordered by squared distance, ties broken
//! by entity id, so two runs with the same world always pick the same target.

use eco_core::EntityId;
use eco_nav::{NavWorldView, Vec3};

use crate::world::{CreatureWorld, QueryFilter, WaterRegistry};
use crate::Creature;

impl<E: EntityId> Creature<E> {
    /// Food of `tag` in view, minus blacklisted items.
    pub fn food_in_fov<W>(&self, world: &W, tag: &str) -> Vec<E>
    where
        W: CreatureWorld<Entity = E>,
    {
        self.nearest_matching(world, &QueryFilter::Tag(tag), |e| !self.is_blacklisted(e))
    }

    /// Living predators of `tag` in view.
    pub fn predators_in_fov<W>(&self, world: &W, tag: &str) -> Vec<E>
    where
        W: CreatureWorld<Entity = E>,
    {
        self.nearest_matching(world, &QueryFilter::Tag(tag), |e| {
            world.creature(e).map_or(true, |s| s.alive)
        })
    }

    /// Living prey of `tag` in view, minus blacklisted creatures.
    pub fn prey_in_fov<W>(&self, world: &W, tag: &str) -> Vec<E>
    where
        W: CreatureWorld<Entity = E>,
    {
        self.nearest_matching(world, &QueryFilter::Tag(tag), |e| {
            !self.is_blacklisted(e) && world.creature(e).is_some_and(|s| s.alive)
        })
    }

    /// Same-species creatures of the other gender that are able to mate.
    pub fn mates_in_fov<W>(&self, world: &W) -> Vec<E>
    where
        W: CreatureWorld<Entity = E>,
    {
        let gender = self.stats.gender;
        self.nearest_matching(world, &QueryFilter::Species(self.species()), |e| {
            world
                .creature(e)
                .is_some_and(|s| s.alive && s.can_mate && s.stats.gender != gender)
        })
    }

    /// Accessible water points in view, minus blacklisted ones.
    pub fn water_in_fov<W>(&self, world: &W) -> Vec<Vec3>
    where
        W: WaterRegistry + NavWorldView<Entity = E>,
    {
        let Some(origin) = world.position(self.id) else {
            return Vec::new();
        };
        let range_sq = self.stats.fov_range * self.stats.fov_range;

        let mut points: Vec<(f32, Vec3)> = world
            .accessible_water_points()
            .iter()
            .copied()
            .filter(|p| !self.is_water_blacklisted(*p))
            .map(|p| (origin.distance_squared(p), p))
            .filter(|(d, _)| *d <= range_sq)
            .collect();
        // Stable sort: equidistant points keep registry order.
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.into_iter().map(|(_, p)| p).collect()
    }

    pub fn is_target_interactable<W>(&self, world: &W, target: E) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        self.within(world, target, self.interact_radius)
    }

    pub fn is_target_in_attack_range<W>(&self, world: &W, target: E) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        self.within(world, target, 2.0 * self.interact_radius)
    }

    pub fn is_target_in_reproduce_range<W>(&self, world: &W, target: E) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        self.within(world, target, 2.0 * self.reproduce_radius)
    }

    pub fn is_coordinate_interactable<W>(&self, world: &W, point: Vec3) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        world
            .position(self.id)
            .is_some_and(|p| p.distance(point) <= 3.0 * self.interact_radius)
    }

    pub fn blacklist_target(&mut self, target: E) {
        self.target_memory.insert(target, self.now);
        tracing::debug!(
            creature = self.id.stable_id(),
            target = target.stable_id(),
            "target blacklisted"
        );
    }

    pub fn blacklist_water_point(&mut self, point: Vec3) {
        self.water_memory.insert(point.bits(), self.now);
        tracing::debug!(
            creature = self.id.stable_id(),
            x = point.x,
            z = point.z,
            "water point blacklisted"
        );
    }

    pub fn is_blacklisted(&self, target: E) -> bool {
        self.target_memory.contains(&target, self.now)
    }

    pub fn is_water_blacklisted(&self, point: Vec3) -> bool {
        self.water_memory.contains(&point.bits(), self.now)
    }

    fn within<W>(&self, world: &W, target: E, radius: f32) -> bool
    where
        W: NavWorldView<Entity = E>,
    {
        match (world.position(self.id), world.position(target)) {
            (Some(a), Some(b)) => a.distance(b) <= radius,
            _ => false,
        }
    }

    fn nearest_matching<W, F>(&self, world: &W, filter: &QueryFilter<'_>, mut keep: F) -> Vec<E>
    where
        W: CreatureWorld<Entity = E>,
        F: FnMut(E) -> bool,
    {
        let Some(origin) = world.position(self.id) else {
            return Vec::new();
        };
        let range_sq = self.stats.fov_range * self.stats.fov_range;

        let mut found: Vec<(f32, E)> = world
            .query_nearby(origin, self.stats.fov_range, filter)
            .into_iter()
            .filter(|e| *e != self.id && keep(*e))
            .filter_map(|e| world.position(e).map(|p| (origin.distance_squared(p), e)))
            .filter(|(d, _)| *d <= range_sq)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.dedup_by_key(|(_, e)| *e);
        found.into_iter().map(|(_, e)| e).collect()
    }
}
