use eco_core::{WorldMut, WorldView};

use crate::Vec3;

/// Queries answered by the navigation service for any navigating entity.
pub trait NavWorldView: WorldView {
    fn position(&self, entity: Self::Entity) -> Option<Vec3>;

    /// Unit facing direction on the ground plane.
    fn forward(&self, entity: Self::Entity) -> Option<Vec3>;

    /// Measured velocity (zero for entities that do not move).
    fn velocity(&self, entity: Self::Entity) -> Vec3;

    fn radius(&self, entity: Self::Entity) -> f32;

    /// Distance at which the navigation agent considers a destination reached.
    fn stopping_distance(&self, entity: Self::Entity) -> f32;

    fn reached_end(&self, entity: Self::Entity) -> bool;

    fn has_path(&self, entity: Self::Entity) -> bool;

    fn path_pending(&self, entity: Self::Entity) -> bool;
}

/// Commands accepted by the navigation service.
pub trait NavWorldMut: WorldMut + NavWorldView {
    /// Request a path to `destination`. Returns `false` when the request was rejected outright.
    fn set_destination(&mut self, entity: Self::Entity, destination: Vec3) -> bool;

    fn set_max_speed(&mut self, entity: Self::Entity, speed: f32);

    fn set_stopped(&mut self, entity: Self::Entity, stopped: bool);

    /// Turn in place to face `point`.
    fn look_at(&mut self, entity: Self::Entity, point: Vec3);
}
