use eco_agent::{CreatureStats, Tuning, Vitals};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Decay(f32),
    Stamina { running: bool, dt: f32 },
    Eat(f32),
    Drink(f32),
    Damage(f32),
    Mature(f32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f32..10.0).prop_map(Op::Decay),
        (any::<bool>(), 0.0f32..10.0).prop_map(|(running, dt)| Op::Stamina { running, dt }),
        (0.0f32..500.0).prop_map(Op::Eat),
        (0.0f32..500.0).prop_map(Op::Drink),
        (0.0f32..500.0).prop_map(Op::Damage),
        (0.0f32..10.0).prop_map(Op::Mature),
    ]
}

prop_compose! {
    fn arb_stats()(
        max_health in 1.0f32..500.0,
        max_hunger in 1.0f32..500.0,
        max_thirst in 1.0f32..500.0,
        max_stamina in 1.0f32..500.0,
        grow in 0.0f32..60.0,
    ) -> CreatureStats {
        CreatureStats {
            max_health,
            max_hunger,
            max_thirst,
            max_stamina,
            grow_duration_seconds: grow,
            ..CreatureStats::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn needs_stay_within_bounds(stats in arb_stats(), ops in prop::collection::vec(arb_op(), 1..64)) {
        let tuning = Tuning::default();
        let mut v = Vitals::newborn(&stats, &tuning);

        for op in ops {
            match op {
                Op::Decay(dt) => {
                    v.decay_needs(&stats, &tuning, dt);
                }
                Op::Stamina { running, dt } => v.update_stamina(&stats, &tuning, running, dt),
                Op::Eat(amount) => v.replenish_hunger(&stats, amount),
                Op::Drink(amount) => v.replenish_thirst(&stats, amount),
                Op::Damage(amount) => v.take_damage(&stats, amount),
                Op::Mature(dt) => {
                    v.mature(&stats, &tuning, dt);
                }
            }

            prop_assert!((0.0..=stats.max_health).contains(&v.health));
            prop_assert!((0.0..=stats.max_hunger).contains(&v.hunger));
            prop_assert!((0.0..=stats.max_thirst).contains(&v.thirst));
            prop_assert!((0.0..=stats.max_stamina).contains(&v.stamina));
            prop_assert!(v.scale >= tuning.child_scale && v.scale <= 1.0);
        }
    }

    #[test]
    fn replenishing_a_full_need_is_idempotent(stats in arb_stats(), amount in 0.0f32..1000.0) {
        let mut v = Vitals::full(&stats);
        v.replenish_hunger(&stats, amount);
        v.replenish_hunger(&stats, amount);
        prop_assert_eq!(v.hunger, stats.max_hunger);
    }
}
