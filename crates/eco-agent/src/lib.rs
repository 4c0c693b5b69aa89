//! Creature agent runtime.
//!
//! A [`Creature`] owns one agent's needs, state machine, target memory and
//! timed interactions. A [`SpeciesTree`] wires those operations into a fixed
//! priority behavior tree. Everything outside the agent (navigation, animation,
//! spatial queries, spawning) is reached through the traits in [`world`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod creature;
pub mod error;
pub mod interaction;
pub mod memory;
pub mod sensing;
pub mod species;
pub mod state;
pub mod stats;
pub mod tuning;
pub mod vitals;
pub mod world;

pub use creature::{Creature, GoTo};
pub use error::ConfigError;
pub use interaction::{InteractionKind, InteractionTarget, Phase, Progress, TimedTask};
pub use memory::TargetMemory;
pub use species::{Diet, SpeciesProfile, SpeciesTree, SpeciesTreeBuilder};
pub use state::CreatureState;
pub use stats::{CreatureStats, Gender};
pub use tuning::Tuning;
pub use vitals::Vitals;
pub use world::{
    AnimFlag, Animator, CreatureSnapshot, CreatureWorld, Effect, Lifecycle, Perception,
    QueryFilter, WaterRegistry,
};
