use eco_core::SplitMix64;
use eco_nav::steering::{self, Kinematics, PursuitAim};
use eco_nav::Vec3;

fn moving(position: Vec3, forward: Vec3, speed: f32) -> Kinematics {
    Kinematics {
        position,
        forward,
        speed,
    }
}

#[test]
fn pursuit_leads_a_crossing_target() {
    let pursuer = moving(Vec3::ZERO, Vec3::FORWARD, 0.0);
    let target = moving(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 0.0), 2.0);

    match steering::pursue(&pursuer, 3.0, &target) {
        PursuitAim::Intercept { point, look_ahead } => {
            assert!((look_ahead - 2.0).abs() < 1e-5);
            assert!((point.x - 2.0).abs() < 1e-4);
            assert!((point.z - 10.0).abs() < 1e-4);
        }
        aim => panic!("expected an intercept, got {aim:?}"),
    }
}

#[test]
fn pursuit_of_an_aligned_target_behind_goes_direct() {
    let pursuer = moving(Vec3::ZERO, Vec3::FORWARD, 1.0);
    let target = moving(Vec3::new(0.0, 0.0, -5.0), Vec3::FORWARD, 1.0);
    assert_eq!(
        steering::pursue(&pursuer, 3.0, &target),
        PursuitAim::Direct(target.position)
    );
}

#[test]
fn evade_runs_from_the_predicted_position() {
    let evader = moving(Vec3::ZERO, Vec3::FORWARD, 0.0);
    let threat = moving(Vec3::new(4.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 4.0);

    // Closing speed 8 over distance 4: the threat is expected half a second closer.
    let run_to = steering::evade(&evader, 4.0, &threat);
    assert!((run_to.x + 3.5).abs() < 1e-4);
    assert!(run_to.z.abs() < 1e-4);
    assert!(!steering::is_cornered(evader.position, run_to));
}

#[test]
fn a_threat_at_arms_length_corners_the_evader() {
    let evader = moving(Vec3::ZERO, Vec3::FORWARD, 0.0);
    let threat = moving(Vec3::new(0.4, 0.0, 0.0), Vec3::FORWARD, 0.0);
    let run_to = steering::evade(&evader, 4.0, &threat);
    assert!(steering::is_cornered(evader.position, run_to));
}

#[test]
fn random_points_are_reproducible_per_seed() {
    let origin = Vec3::new(1.0, 0.0, 1.0);
    let draw = |seed| {
        let mut rng = SplitMix64::new(seed);
        (0..8)
            .map(|_| steering::random_point_in_range(&mut rng, origin, 5.0).bits())
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(11), draw(11));
    assert_ne!(draw(11), draw(12));
}
