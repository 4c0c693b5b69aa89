use eco_core::{Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

pub trait BtNode<A, W>: 'static
where
    A: 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: &mut A,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus;

    fn name(&self) -> &'static str;

    fn reset(&mut self) {}

    /// Hand out blackboard scope ids to scoped composites, depth-first.
    ///
    /// Called once by [`crate::BehaviorTree::new`]; `next` is the next free id.
    fn assign_scopes(&mut self, _next: &mut u32) {}
}
