//! Fixed-priority behavior trees wired to a [`Creature`].
//!
//! The root is a scoped selector; every need is one or two sequences under it,
//! checked in this order:
//!
//! 1. an interaction already in progress keeps the tree `Running`
//! 2. evade the nearest predator (species with a predator tag)
//! 3. mate with a partner in reach, else walk to one in view
//! 4. eat (herbivores) or attack (carnivores) a target in reach, else go to one
//! 5. drink at a water point in reach, else go to one
//! 6. wander
//!
//! "Find" leaves cache their pick in the root scope so the matching "in reach"
//! sequence sees it on later ticks.

use eco_bt::{
    BehaviorTree, BtNode, BtStatus, Condition, LeafFault, LeafResult, Selector, Sequence, Task,
};
use eco_core::{BbKey, Blackboard, BlackboardConfig, EntityId, TickContext, WorldView};
use eco_nav::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Creature, CreatureState, CreatureWorld, GoTo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diet {
    Herbivore { food_tag: String },
    Carnivore { prey_tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub name: String,
    pub diet: Diet,
    /// Tag of the creatures this species runs from.
    #[serde(default)]
    pub predator_tag: Option<String>,
}

impl SpeciesProfile {
    pub fn herbivore(name: impl Into<String>, food_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diet: Diet::Herbivore {
                food_tag: food_tag.into(),
            },
            predator_tag: None,
        }
    }

    pub fn carnivore(name: impl Into<String>, prey_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diet: Diet::Carnivore {
                prey_tag: prey_tag.into(),
            },
            predator_tag: None,
        }
    }

    pub fn fleeing(mut self, predator_tag: impl Into<String>) -> Self {
        self.predator_tag = Some(predator_tag.into());
        self
    }
}

/// Blackboard keys for cached targets.
pub mod keys {
    use eco_core::{BbKey, EntityId};
    use eco_nav::Vec3;

    pub fn food<E: EntityId>() -> BbKey<E> {
        BbKey::new(0xEC0A_0000_0000_0001)
    }

    pub fn prey<E: EntityId>() -> BbKey<E> {
        BbKey::new(0xEC0A_0000_0000_0002)
    }

    pub fn mate<E: EntityId>() -> BbKey<E> {
        BbKey::new(0xEC0A_0000_0000_0003)
    }

    pub fn threat<E: EntityId>() -> BbKey<E> {
        BbKey::new(0xEC0A_0000_0000_0004)
    }

    pub const WATER: BbKey<Vec3> = BbKey::new(0xEC0A_0000_0000_0005);
}

pub struct SpeciesTreeBuilder {
    profile: SpeciesProfile,
    blackboard: BlackboardConfig,
}

impl SpeciesTreeBuilder {
    pub fn new(profile: SpeciesProfile) -> Self {
        Self {
            profile,
            blackboard: BlackboardConfig::default(),
        }
    }

    pub fn blackboard(mut self, config: BlackboardConfig) -> Self {
        self.blackboard = config;
        self
    }

    pub fn build<W>(self) -> SpeciesTree<W>
    where
        W: CreatureWorld + 'static,
    {
        let root = SpeciesTree::<W>::root(&self.profile);
        SpeciesTree {
            profile: self.profile,
            tree: BehaviorTree::with_blackboard(root, self.blackboard),
        }
    }
}

type Node<W> = Box<dyn BtNode<Creature<<W as WorldView>::Entity>, W>>;

/// One creature's tree. Built once, ticked every step after [`Creature::update`].
pub struct SpeciesTree<W>
where
    W: CreatureWorld + 'static,
{
    profile: SpeciesProfile,
    tree: BehaviorTree<Creature<W::Entity>, W>,
}

impl<W> SpeciesTree<W>
where
    W: CreatureWorld + 'static,
{
    /// Evaluate the tree once. Dead creatures are not evaluated.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        creature: &mut Creature<W::Entity>,
        world: &mut W,
    ) -> BtStatus {
        if creature.is_dead() {
            return BtStatus::Failure;
        }
        self.tree.tick(ctx, creature, world)
    }

    pub fn profile(&self) -> &SpeciesProfile {
        &self.profile
    }

    pub fn last_status(&self) -> Option<BtStatus> {
        self.tree.last_status()
    }

    pub fn blackboard(&self) -> &Blackboard {
        self.tree.blackboard()
    }

    fn root(profile: &SpeciesProfile) -> Node<W> {
        let mut branches = vec![Self::task("await_interaction", |_, c, _, _| {
            Ok(status(c.interaction_in_progress()).or_running())
        })];

        if let Some(tag) = &profile.predator_tag {
            branches.push(Self::evade_branch(tag.clone()));
        }
        branches.extend(Self::mate_branches());
        match &profile.diet {
            Diet::Herbivore { food_tag } => branches.extend(Self::food_branches(food_tag)),
            Diet::Carnivore { prey_tag } => branches.extend(Self::prey_branches(prey_tag)),
        }
        branches.extend(Self::water_branches());
        branches.push(Self::task("wander", |ctx, c, w, _| {
            c.wander(ctx, w);
            Ok(BtStatus::Success)
        }));

        Box::new(Selector::new(branches).named("species_root").scoped())
    }

    fn evade_branch(tag: String) -> Node<W> {
        Self::sequence(
            "evade",
            vec![
                Self::task("find_predator", move |_, c, w, bb| {
                    let key = keys::threat::<W::Entity>();
                    match c.predators_in_fov(w, &tag).first() {
                        Some(&threat) => {
                            bb.publish(key, threat);
                            Ok(BtStatus::Success)
                        }
                        None => {
                            bb.remove(key);
                            Ok(BtStatus::Failure)
                        }
                    }
                }),
                Self::task("evade_predator", |_, c, w, bb| {
                    let threat = cached(bb, keys::threat::<W::Entity>(), "threat")?;
                    c.evade(w, threat)?;
                    Ok(BtStatus::Success)
                }),
            ],
        )
    }

    fn mate_branches() -> [Node<W>; 2] {
        let valid = |c: &Creature<W::Entity>, w: &W, mate: W::Entity| {
            let gender = c.stats().gender;
            w.creature(mate)
                .is_some_and(|s| s.alive && s.can_mate && s.stats.gender != gender)
        };

        [
            Self::sequence(
                "mate",
                vec![
                    Self::condition("can_mate", |_, c, _, _| c.can_mate()),
                    Self::task("mate_in_reach", move |_, c, w, bb| {
                        let (c, w) = (&*c, &*w);
                        let mate = cached_or_nearest(
                            bb,
                            keys::mate::<W::Entity>(),
                            |m| valid(c, w, m),
                            || c.mates_in_fov(w).first().copied(),
                        );
                        Ok(status(mate.is_some_and(|m| c.is_target_in_reproduce_range(w, m))))
                    }),
                    Self::task("mate", |_, c, w, bb| {
                        let mate = cached(bb, keys::mate::<W::Entity>(), "mate")?;
                        Ok(status(c.begin_mate(w, mate)?).or_running())
                    }),
                ],
            ),
            Self::sequence(
                "go_to_mate",
                vec![
                    Self::condition("can_mate", |_, c, _, _| c.can_mate()),
                    Self::task("find_mate", move |_, c, w, bb| {
                        let (c, w) = (&*c, &*w);
                        let mate = cached_or_nearest(
                            bb,
                            keys::mate::<W::Entity>(),
                            |m| valid(c, w, m),
                            || c.mates_in_fov(w).first().copied(),
                        );
                        Ok(status(mate.is_some()))
                    }),
                    Self::task("walk_to_mate", |_, c, w, bb| {
                        let mate = cached(bb, keys::mate::<W::Entity>(), "mate")?;
                        c.go_to_mate(w, mate)?;
                        Ok(BtStatus::Success)
                    }),
                ],
            ),
        ]
    }

    fn food_branches(tag: &str) -> [Node<W>; 2] {
        let find = |tag: String| {
            move |c: &Creature<W::Entity>, w: &W, bb: &mut Blackboard| {
                cached_or_nearest(
                    bb,
                    keys::food::<W::Entity>(),
                    |f| w.exists(f) && !c.is_blacklisted(f),
                    || c.food_in_fov(w, &tag).first().copied(),
                )
            }
        };
        let food_in_reach = find(tag.to_owned());
        let find_food = find(tag.to_owned());

        [
            Self::sequence(
                "eat",
                vec![
                    Self::condition("hungry", |_, c, _, _| c.is_hungry()),
                    Self::task("food_in_reach", move |_, c, w, bb| {
                        let food = food_in_reach(&*c, &*w, bb);
                        Ok(status(food.is_some_and(|f| c.is_target_interactable(w, f))))
                    }),
                    Self::task("eat", |_, c, w, bb| {
                        let food = cached(bb, keys::food::<W::Entity>(), "food")?;
                        Ok(status(c.begin_eat(w, food)?).or_running())
                    }),
                ],
            ),
            Self::sequence(
                "go_to_food",
                vec![
                    Self::condition("hungry", |_, c, _, _| c.is_hungry()),
                    Self::task("find_food", move |_, c, w, bb| {
                        Ok(status(find_food(&*c, &*w, bb).is_some()))
                    }),
                    Self::task("walk_to_food", |_, c, w, bb| {
                        let key = keys::food::<W::Entity>();
                        let food = cached(bb, key, "food")?;
                        match c.go_to_target(w, food, CreatureState::GoingToFood)? {
                            GoTo::Moving => Ok(BtStatus::Success),
                            GoTo::GaveUp | GoTo::Exhausted => {
                                bb.remove(key);
                                Ok(BtStatus::Failure)
                            }
                        }
                    }),
                ],
            ),
        ]
    }

    fn prey_branches(tag: &str) -> [Node<W>; 2] {
        let find = |tag: String| {
            move |c: &Creature<W::Entity>, w: &W, bb: &mut Blackboard| {
                cached_or_nearest(
                    bb,
                    keys::prey::<W::Entity>(),
                    |p| !c.is_blacklisted(p) && w.creature(p).is_some_and(|s| s.alive),
                    || c.prey_in_fov(w, &tag).first().copied(),
                )
            }
        };
        let prey_in_reach = find(tag.to_owned());
        let find_prey = find(tag.to_owned());

        [
            Self::sequence(
                "attack",
                vec![
                    Self::condition("hungry", |_, c, _, _| c.is_hungry()),
                    Self::task("prey_in_reach", move |_, c, w, bb| {
                        let prey = prey_in_reach(&*c, &*w, bb);
                        Ok(status(prey.is_some_and(|p| c.is_target_in_attack_range(w, p))))
                    }),
                    Self::task("attack", |_, c, w, bb| {
                        let prey = cached(bb, keys::prey::<W::Entity>(), "prey")?;
                        Ok(status(c.begin_attack(w, prey)?).or_running())
                    }),
                ],
            ),
            Self::sequence(
                "hunt",
                vec![
                    Self::condition("hungry", |_, c, _, _| c.is_hungry()),
                    Self::task("find_prey", move |_, c, w, bb| {
                        Ok(status(find_prey(&*c, &*w, bb).is_some()))
                    }),
                    Self::task("pursue_prey", |_, c, w, bb| {
                        let key = keys::prey::<W::Entity>();
                        let prey = cached(bb, key, "prey")?;
                        match c.chase(w, prey)? {
                            GoTo::Moving => Ok(BtStatus::Success),
                            GoTo::GaveUp => {
                                bb.remove(key);
                                Ok(BtStatus::Failure)
                            }
                            GoTo::Exhausted => Ok(BtStatus::Failure),
                        }
                    }),
                ],
            ),
        ]
    }

    fn water_branches() -> [Node<W>; 2] {
        [
            Self::sequence(
                "drink",
                vec![
                    Self::condition("thirsty", |_, c, _, _| c.is_thirsty()),
                    Self::task("water_in_reach", |_, c, w, bb| {
                        let point = water_target(&*c, &*w, bb);
                        Ok(status(point.is_some_and(|p| c.is_coordinate_interactable(w, p))))
                    }),
                    Self::task("drink", |_, c, w, bb| {
                        let point = cached(bb, keys::WATER, "water point")?;
                        Ok(status(c.begin_drink(w, point)).or_running())
                    }),
                ],
            ),
            Self::sequence(
                "go_to_water",
                vec![
                    Self::condition("thirsty", |_, c, _, _| c.is_thirsty()),
                    Self::task("find_water", |_, c, w, bb| {
                        Ok(status(water_target(&*c, &*w, bb).is_some()))
                    }),
                    Self::task("walk_to_water", |_, c, w, bb| {
                        let point = cached(bb, keys::WATER, "water point")?;
                        match c.go_to_water(w, point) {
                            GoTo::Moving => Ok(BtStatus::Success),
                            GoTo::GaveUp | GoTo::Exhausted => {
                                bb.remove(keys::WATER);
                                Ok(BtStatus::Failure)
                            }
                        }
                    }),
                ],
            ),
        ]
    }

    fn sequence(name: &'static str, children: Vec<Node<W>>) -> Node<W> {
        Box::new(Sequence::new(children).named(name))
    }

    fn condition<F>(name: &'static str, f: F) -> Node<W>
    where
        F: FnMut(&TickContext, &Creature<W::Entity>, &W, &Blackboard) -> bool + 'static,
    {
        Box::new(Condition::new(name, f))
    }

    fn task<F>(name: &'static str, f: F) -> Node<W>
    where
        F: FnMut(&TickContext, &mut Creature<W::Entity>, &mut W, &mut Blackboard) -> LeafResult
            + 'static,
    {
        Box::new(Task::new(name, f))
    }
}

fn status(ok: bool) -> BtStatus {
    if ok {
        BtStatus::Success
    } else {
        BtStatus::Failure
    }
}

trait OrRunning {
    fn or_running(self) -> BtStatus;
}

impl OrRunning for BtStatus {
    /// `Success` from a leaf that started (or is waiting on) an interaction means `Running`.
    fn or_running(self) -> BtStatus {
        match self {
            BtStatus::Success => BtStatus::Running,
            other => other,
        }
    }
}

fn cached<T: Copy + 'static>(
    bb: &Blackboard,
    key: BbKey<T>,
    what: &'static str,
) -> Result<T, LeafFault> {
    bb.get(key).copied().ok_or(LeafFault::Stale(what))
}

/// Reuse the cached target while it stays valid, otherwise pick and publish the nearest.
fn cached_or_nearest<E: EntityId>(
    bb: &mut Blackboard,
    key: BbKey<E>,
    still_valid: impl FnOnce(E) -> bool,
    nearest: impl FnOnce() -> Option<E>,
) -> Option<E> {
    if let Some(&current) = bb.get(key) {
        if still_valid(current) {
            return Some(current);
        }
        bb.remove(key);
    }
    let found = nearest()?;
    bb.publish(key, found);
    Some(found)
}

fn water_target<W>(c: &Creature<W::Entity>, w: &W, bb: &mut Blackboard) -> Option<Vec3>
where
    W: CreatureWorld,
{
    if let Some(&point) = bb.get(keys::WATER) {
        if !c.is_water_blacklisted(point) {
            return Some(point);
        }
        bb.remove(keys::WATER);
    }
    let point = c.water_in_fov(w).first().copied()?;
    bb.publish(keys::WATER, point);
    Some(point)
}
