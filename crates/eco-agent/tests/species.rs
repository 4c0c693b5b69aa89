mod common;

use common::{at, run, spawn, still_tuning, MockWorld};
use eco_agent::{
    CreatureSnapshot, CreatureState, CreatureStats, Diet, Effect, Gender, InteractionKind,
    SpeciesProfile, SpeciesTree, SpeciesTreeBuilder,
};
use eco_bt::BtStatus;
use eco_nav::Vec3;

fn deer_tree() -> SpeciesTree<MockWorld> {
    SpeciesTreeBuilder::new(SpeciesProfile::herbivore("deer", "berry")).build()
}

fn alive(stats: CreatureStats) -> CreatureSnapshot {
    CreatureSnapshot {
        stats,
        health: stats.max_health,
        can_mate: false,
        alive: true,
    }
}

#[test]
fn hungry_herbivore_walks_to_food_then_eats() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    let berry = world.add_food("berry", Vec3::new(5.0, 0.0, 0.0));
    deer.vitals_mut().hunger = 10.0;
    let mut tree = deer_tree();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut deer, &mut world), BtStatus::Success);
    assert_eq!(deer.state(), CreatureState::GoingToFood);
    assert_eq!(world.body(deer.id()).destination, Some(Vec3::new(5.0, 0.0, 0.0)));
    assert!(!tree.blackboard().is_empty());

    world.body_mut(deer.id()).position = Vec3::new(4.7, 0.0, 0.0);
    assert_eq!(tree.tick(&at(0.1, 0.1), &mut deer, &mut world), BtStatus::Running);
    assert_eq!(deer.state(), CreatureState::Eating);
    assert_eq!(deer.active_interaction(), Some(InteractionKind::Eat));

    // The busy branch holds the tree while the interaction runs.
    assert_eq!(tree.tick(&at(0.2, 0.1), &mut deer, &mut world), BtStatus::Running);

    run(&mut deer, &mut world, 0.2, 0.5, 2);
    assert_eq!(deer.state(), CreatureState::DoneEating);
    assert_eq!(deer.vitals().hunger, 30.0);
    assert_eq!(world.destroyed, vec![berry]);
}

#[test]
fn evasion_beats_eating() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    world.add_food("berry", Vec3::new(0.3, 0.0, 0.0));
    world.add_creature("wolf", Vec3::new(3.0, 0.0, 0.0));
    deer.vitals_mut().hunger = 10.0;
    let mut tree =
        SpeciesTreeBuilder::new(SpeciesProfile::herbivore("deer", "berry").fleeing("wolf"))
            .build::<MockWorld>();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut deer, &mut world), BtStatus::Success);
    assert_eq!(deer.state(), CreatureState::Running);
    assert!(!deer.interaction_in_progress());
    let destination = world.body(deer.id()).destination.expect("flee destination");
    assert!((destination.x + 3.0).abs() < 1e-4);
    assert_eq!(world.body(deer.id()).max_speed, 7.0);
}

#[test]
fn dead_creatures_are_not_evaluated() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    let mut tree = deer_tree();

    deer.die(&mut world);
    assert_eq!(tree.tick(&at(0.0, 0.1), &mut deer, &mut world), BtStatus::Failure);
    assert_eq!(deer.state(), CreatureState::Dead);
    assert_eq!(world.body(deer.id()).destination, None);
}

#[test]
fn content_creature_wanders() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    world.add_food("berry", Vec3::new(2.0, 0.0, 0.0));
    let mut tree = deer_tree();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut deer, &mut world), BtStatus::Success);
    assert_eq!(deer.state(), CreatureState::Wandering);
    let destination = world.body(deer.id()).destination.expect("wander destination");
    assert!(destination.distance(Vec3::ZERO) <= deer.stats().fov_range + 1e-4);
    assert_eq!(destination.y, 0.0);
}

#[test]
fn thirst_leads_to_water_then_drinking() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    world.water = vec![Vec3::new(8.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)];
    deer.vitals_mut().thirst = 10.0;
    let mut tree = deer_tree();

    tree.tick(&at(0.0, 0.1), &mut deer, &mut world);
    assert_eq!(deer.state(), CreatureState::GoingToWater);
    assert_eq!(world.body(deer.id()).destination, Some(Vec3::new(3.0, 0.0, 0.0)));

    world.body_mut(deer.id()).position = Vec3::new(2.0, 0.0, 0.0);
    assert_eq!(tree.tick(&at(0.1, 0.1), &mut deer, &mut world), BtStatus::Running);
    assert_eq!(deer.state(), CreatureState::Drinking);

    run(&mut deer, &mut world, 0.1, 0.5, 2);
    assert_eq!(deer.state(), CreatureState::DoneDrinking);
    assert_eq!(deer.vitals().thirst, 30.0);
}

#[test]
fn unreachable_food_is_given_up_and_the_creature_wanders() {
    let mut world = MockWorld::new();
    let mut deer = spawn(&mut world, "deer", Vec3::ZERO, CreatureStats::default(), still_tuning());
    let berry = world.add_food("berry", Vec3::new(5.0, 0.0, 0.0));
    world.path_available = false;
    deer.vitals_mut().hunger = 10.0;
    let mut tree = deer_tree();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut deer, &mut world), BtStatus::Success);
    assert!(deer.is_blacklisted(berry));
    assert_eq!(deer.state(), CreatureState::Wandering);

    world.path_available = true;
    tree.tick(&at(0.1, 0.1), &mut deer, &mut world);
    assert_eq!(deer.state(), CreatureState::Wandering);
}

#[test]
fn hungry_carnivore_attacks_prey_in_reach() {
    let mut world = MockWorld::new();
    let mut wolf = spawn(&mut world, "wolf", Vec3::ZERO, CreatureStats::default(), still_tuning());
    let deer = world.add_creature("deer", Vec3::new(1.0, 0.0, 0.0));
    world.set_snapshot(deer, alive(CreatureStats::default()));
    wolf.vitals_mut().hunger = 10.0;
    let mut tree =
        SpeciesTreeBuilder::new(SpeciesProfile::carnivore("wolf", "deer")).build::<MockWorld>();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut wolf, &mut world), BtStatus::Running);
    assert_eq!(wolf.state(), CreatureState::Attacking);

    run(&mut wolf, &mut world, 0.0, 0.5, 2);
    assert_eq!(wolf.state(), CreatureState::DoneAttacking);
    assert!(world.effects.contains(&Effect::Damage {
        target: deer,
        amount: 25.0,
    }));
}

#[test]
fn hungry_carnivore_chases_distant_prey() {
    let mut world = MockWorld::new();
    let mut wolf = spawn(&mut world, "wolf", Vec3::ZERO, CreatureStats::default(), still_tuning());
    let deer = world.add_creature("deer", Vec3::new(6.0, 0.0, 0.0));
    world.set_snapshot(deer, alive(CreatureStats::default()));
    wolf.vitals_mut().hunger = 10.0;
    let mut tree =
        SpeciesTreeBuilder::new(SpeciesProfile::carnivore("wolf", "deer")).build::<MockWorld>();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut wolf, &mut world), BtStatus::Success);
    assert_eq!(wolf.state(), CreatureState::Running);
    assert_eq!(world.body(wolf.id()).destination, Some(Vec3::new(6.0, 0.0, 0.0)));
}

#[test]
fn partners_in_reach_start_mating() {
    let mut world = MockWorld::new();
    let female_stats = CreatureStats::default().with_gender(Gender::Female);
    let male_stats = CreatureStats::default().with_gender(Gender::Male);
    let mut doe = spawn(&mut world, "deer", Vec3::ZERO, female_stats, still_tuning());
    let stag = spawn(&mut world, "deer", Vec3::new(2.0, 0.0, 0.0), male_stats, still_tuning());
    world.sync(&stag);
    let mut tree = deer_tree();

    assert_eq!(tree.tick(&at(0.0, 0.1), &mut doe, &mut world), BtStatus::Running);
    assert_eq!(doe.state(), CreatureState::Mating);
    assert!(world.effects.contains(&Effect::Face {
        target: stag.id(),
        toward: Vec3::ZERO,
    }));
}

#[test]
fn profiles_load_from_yaml() {
    let yaml = "name: wolf\ndiet:\n  kind: carnivore\n  prey_tag: deer\n";
    let profile: SpeciesProfile = serde_yaml::from_str(yaml).expect("profile");
    assert_eq!(
        profile.diet,
        Diet::Carnivore {
            prey_tag: "deer".to_owned()
        }
    );
    assert_eq!(profile.predator_tag, None);
}
