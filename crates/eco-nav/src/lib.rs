//! Navigation contract and steering geometry.
//!
//! Path solving itself is an external service: this crate only describes what
//! the agent runtime asks of it ([`NavWorldView`], [`NavWorldMut`]) and computes
//! where to send an agent ([`steering`]).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod math;
pub mod steering;
pub mod world;

pub use math::Vec3;
pub use steering::{Kinematics, PursuitAim};
pub use world::{NavWorldMut, NavWorldView};
