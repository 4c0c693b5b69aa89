//! Deterministic, engine-agnostic kernel primitives shared by the creature crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod entity;
pub mod rng;
pub mod tick;
pub mod world;

pub use blackboard::{BbKey, Blackboard, BlackboardConfig, ScopeId};
pub use entity::EntityId;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
