use eco_core::{Blackboard, BlackboardConfig, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};

/// A root node plus the blackboard it evaluates against.
///
/// One instance per agent; the blackboard persists across ticks and expires
/// idle entries at the start of every pass.
pub struct BehaviorTree<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    root: Box<dyn BtNode<A, W>>,
    blackboard: Blackboard,
    last: Option<BtStatus>,
    scopes: u32,
}

impl<A, W> BehaviorTree<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    pub fn new(root: Box<dyn BtNode<A, W>>) -> Self {
        Self::with_blackboard(root, BlackboardConfig::default())
    }

    pub fn with_blackboard(mut root: Box<dyn BtNode<A, W>>, config: BlackboardConfig) -> Self {
        // 0 is the tree-level scope.
        let mut next = 1;
        root.assign_scopes(&mut next);
        Self {
            root,
            blackboard: Blackboard::with_config(config),
            last: None,
            scopes: next - 1,
        }
    }

    pub fn tick(&mut self, ctx: &TickContext, agent: &mut A, world: &mut W) -> BtStatus {
        self.blackboard.begin_pass(ctx.time_seconds);
        let status = self.root.tick(ctx, agent, world, &mut self.blackboard);
        self.last = Some(status);
        status
    }

    pub fn last_status(&self) -> Option<BtStatus> {
        self.last
    }

    pub fn root_name(&self) -> &'static str {
        self.root.name()
    }

    /// Number of composite scopes handed out at construction.
    pub fn scope_count(&self) -> u32 {
        self.scopes
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }
}
