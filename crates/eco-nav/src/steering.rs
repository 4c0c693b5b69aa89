//! Steering geometry: where to send an agent, not how to get there.
//!
//! Every function here is pure. The agent runtime turns the resulting points
//! into `set_destination` requests at normal or running speed.

use eco_core::DeterministicRng;

use crate::Vec3;

/// Targets slower than this are treated as standing still.
pub const STILL_SPEED: f32 = 0.01;
/// Run-to points closer than this to the evader mean it is cornered.
pub const CORNERED_DISTANCE: f32 = 1.0;

const BEHIND_ANGLE_DEGREES: f32 = 90.0;
const ALIGNED_HEADING_DEGREES: f32 = 20.0;

/// Position, facing, and current speed of a moving entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub forward: Vec3,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitAim {
    /// Head straight for the target's current position.
    Direct(Vec3),
    /// Head for where the target will be after `look_ahead` seconds.
    Intercept { point: Vec3, look_ahead: f32 },
}

impl PursuitAim {
    pub fn point(self) -> Vec3 {
        match self {
            PursuitAim::Direct(point) => point,
            PursuitAim::Intercept { point, .. } => point,
        }
    }
}

/// Point on the far side of `position`, mirrored away from `threat`.
pub fn flee_point(position: Vec3, threat: Vec3) -> Vec3 {
    position - (threat - position)
}

/// Time for a chaser at `max_speed` to close on `target`, first-order estimate.
pub fn look_ahead_time(chaser: Vec3, max_speed: f32, target: &Kinematics) -> f32 {
    let closing_speed = max_speed + target.speed;
    if closing_speed <= f32::EPSILON {
        return 0.0;
    }
    (target.position - chaser).length() / closing_speed
}

pub fn pursue(pursuer: &Kinematics, max_speed: f32, target: &Kinematics) -> PursuitAim {
    let to_target = target.position - pursuer.position;
    let relative_heading = pursuer.forward.angle_degrees(target.forward);
    let to_target_angle = pursuer.forward.angle_degrees(to_target);

    if (to_target_angle > BEHIND_ANGLE_DEGREES && relative_heading < ALIGNED_HEADING_DEGREES)
        || target.speed < STILL_SPEED
    {
        return PursuitAim::Direct(target.position);
    }

    let look_ahead = look_ahead_time(pursuer.position, max_speed, target);
    PursuitAim::Intercept {
        point: target.position + target.forward * look_ahead,
        look_ahead,
    }
}

/// Flee point away from where `threat` is predicted to be.
///
/// The caller decides what to do when the result [`is_cornered`].
pub fn evade(evader: &Kinematics, max_speed: f32, threat: &Kinematics) -> Vec3 {
    let look_ahead = look_ahead_time(evader.position, max_speed, threat);
    let predicted = threat.position + threat.forward * look_ahead;
    flee_point(evader.position, predicted)
}

pub fn is_cornered(position: Vec3, run_to: Vec3) -> bool {
    position.distance(run_to) < CORNERED_DISTANCE
}

/// Random point within `range` of `origin`, sampled in a sphere and flattened onto
/// the ground plane through `origin`.
pub fn random_point_in_range<R: DeterministicRng>(rng: &mut R, origin: Vec3, range: f32) -> Vec3 {
    let mut offset = Vec3::new(range, 0.0, 0.0);
    for _ in 0..16 {
        let sample = Vec3::new(
            rng.next_f32_signed(),
            rng.next_f32_signed(),
            rng.next_f32_signed(),
        );
        if sample.length_squared() <= 1.0 {
            offset = sample * range;
            break;
        }
    }
    origin + offset.flatten()
}
