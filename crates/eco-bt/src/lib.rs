//! Behavior Tree runtime built on `eco-core`.
//!
//! Trees are generic over the agent runtime `A` the leaves drive and the world
//! `W` that provides the agent's collaborators. Composites are reactive: every
//! tick starts from the first child, so guarding conditions are re-checked while
//! a task is running.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod error;
pub mod nodes;
pub mod tree;

pub use bt::{BtNode, BtStatus};
pub use error::{LeafFault, LeafResult};
pub use nodes::{AlwaysSucceed, Condition, Inverter, Selector, Sequence, Task};
pub use tree::BehaviorTree;
