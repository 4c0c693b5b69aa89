//! Headless sandbox host for the creature decision core.
//!
//! [`SandboxWorld`] stands in for the engine: straight-line navigation, timed
//! animation clips, tag queries and a water registry. [`Simulation`] owns one
//! [`Creature`](eco_agent::Creature) and species tree per living creature and
//! steps them in ascending id order.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod report;
pub mod sim;
pub mod world;

pub use config::{FoodConfig, ScenarioConfig, SpeciesGroup, WorldConfig};
pub use error::ScenarioError;
pub use report::RunSummary;
pub use sim::Simulation;
pub use world::SandboxWorld;
