use eco_core::{BbKey, Blackboard, BlackboardConfig, ScopeId};

const TARGET: BbKey<u64> = BbKey::new(1);
const LABEL: BbKey<String> = BbKey::new(2);

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let mut bb = Blackboard::new();
    assert!(!bb.contains(TARGET));

    bb.set(TARGET, 123);
    bb.set(LABEL, "hello".to_string());

    assert_eq!(bb.get(TARGET).copied(), Some(123));
    assert_eq!(bb.get(LABEL).map(|s| s.as_str()), Some("hello"));

    assert_eq!(bb.remove(TARGET), Some(123));
    assert_eq!(bb.get(TARGET), None);
}

#[test]
#[should_panic(expected = "blackboard type mismatch")]
fn blackboard_type_mismatch_panics() {
    let mut bb = Blackboard::new();
    bb.set(BbKey::<u32>::new(1), 1u32);
    let _ = bb.get(BbKey::<i32>::new(1));
}

#[test]
fn publish_lands_in_the_scope_above_the_enclosing_composite() {
    let mut bb = Blackboard::new();
    bb.begin_pass(0.0);

    // root selector (scope 1) -> sequence (scope 2) -> leaf
    bb.enter(Some(ScopeId(1)));
    bb.enter(Some(ScopeId(2)));
    bb.publish(TARGET, 7);
    bb.exit();

    // A sibling sequence under the same selector sees the published value.
    bb.enter(Some(ScopeId(3)));
    assert_eq!(bb.get(TARGET).copied(), Some(7));
    bb.exit();
    bb.exit();

    // Outside the selector the value is not visible.
    assert_eq!(bb.get(TARGET), None);
}

#[test]
fn set_stays_local_to_the_innermost_scope() {
    let mut bb = Blackboard::new();
    bb.begin_pass(0.0);

    bb.enter(Some(ScopeId(1)));
    bb.enter(Some(ScopeId(2)));
    bb.set(TARGET, 1);
    assert_eq!(bb.get(TARGET).copied(), Some(1));
    bb.exit();

    bb.enter(Some(ScopeId(3)));
    assert_eq!(bb.get(TARGET), None);
    bb.exit();
    bb.exit();
}

#[test]
fn unscoped_frames_are_skipped_when_publishing() {
    let mut bb = Blackboard::new();
    bb.begin_pass(0.0);

    bb.enter(Some(ScopeId(1)));
    bb.enter(None);
    bb.enter(None);
    bb.publish(TARGET, 9);
    bb.exit();
    bb.exit();
    assert_eq!(bb.get(TARGET).copied(), Some(9));
    bb.exit();
}

#[test]
fn idle_entries_expire_at_the_next_pass() {
    let mut bb = Blackboard::with_config(BlackboardConfig {
        idle_ttl_seconds: 5.0,
    });

    bb.begin_pass(0.0);
    bb.set(TARGET, 1);
    bb.set(LABEL, "kept".to_string());

    // Reading refreshes the entry.
    bb.begin_pass(4.0);
    assert!(bb.get(LABEL).is_some());

    bb.begin_pass(6.0);
    assert_eq!(bb.get(TARGET), None);
    assert!(bb.get(LABEL).is_some());

    bb.begin_pass(11.5);
    assert!(bb.is_empty());
}
