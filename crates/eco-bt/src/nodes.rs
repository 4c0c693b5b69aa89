use eco_core::{Blackboard, ScopeId, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};
use crate::error::LeafResult;

/// Fail-fast AND: children run in order until one does not succeed.
pub struct Sequence<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    name: &'static str,
    children: Vec<Box<dyn BtNode<A, W>>>,
    running: Option<usize>,
    scoped: bool,
    scope: Option<ScopeId>,
}

impl<A, W> Sequence<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<A, W>>>) -> Self {
        Self {
            name: "sequence",
            children,
            running: None,
            scoped: false,
            scope: None,
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Give this composite its own blackboard scope.
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    fn tick_children(
        &mut self,
        ctx: &TickContext,
        agent: &mut A,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        for (i, child) in self.children.iter_mut().enumerate() {
            let status = child.tick(ctx, agent, world, blackboard);
            match status {
                BtStatus::Failure => {
                    self.reset();
                    return BtStatus::Failure;
                }
                BtStatus::Running => {
                    if self.running != Some(i) {
                        if let Some(prev) = self.running {
                            self.children[prev].reset();
                        }
                        self.running = Some(i);
                    }
                    return BtStatus::Running;
                }
                BtStatus::Success => continue,
            }
        }

        self.reset();
        BtStatus::Success
    }
}

impl<A, W> BtNode<A, W> for Sequence<A, W>
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
    ) -> BtStatus {
        blackboard.enter(self.scope);
        let status = self.tick_children(ctx, agent, world, blackboard);
        blackboard.exit();
        status
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn reset(&mut self) {
        self.running = None;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }

    fn assign_scopes(&mut self, next: &mut u32) {
        if self.scoped {
            self.scope = Some(ScopeId(*next));
            *next += 1;
        }
        for c in self.children.iter_mut() {
            c.assign_scopes(next);
        }
    }
}

/// First-match-wins OR: children run in priority order until one succeeds or is running.
pub struct Selector<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    name: &'static str,
    children: Vec<Box<dyn BtNode<A, W>>>,
    running: Option<usize>,
    scoped: bool,
    scope: Option<ScopeId>,
}

impl<A, W> Selector<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<A, W>>>) -> Self {
        Self {
            name: "selector",
            children,
            running: None,
            scoped: false,
            scope: None,
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Give this composite its own blackboard scope.
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    fn tick_children(
        &mut self,
        ctx: &TickContext,
        agent: &mut A,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        for (i, child) in self.children.iter_mut().enumerate() {
            let status = child.tick(ctx, agent, world, blackboard);
            match status {
                BtStatus::Failure => continue,
                BtStatus::Success => {
                    self.reset();
                    return BtStatus::Success;
                }
                BtStatus::Running => {
                    if self.running != Some(i) {
                        if let Some(prev) = self.running {
                            self.children[prev].reset();
                        }
                        self.running = Some(i);
                    }
                    return BtStatus::Running;
                }
            }
        }

        self.reset();
        BtStatus::Failure
    }
}

impl<A, W> BtNode<A, W> for Selector<A, W>
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
    ) -> BtStatus {
        blackboard.enter(self.scope);
        let status = self.tick_children(ctx, agent, world, blackboard);
        blackboard.exit();
        status
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn reset(&mut self) {
        self.running = None;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }

    fn assign_scopes(&mut self, next: &mut u32) {
        if self.scoped {
            self.scope = Some(ScopeId(*next));
            *next += 1;
        }
        for c in self.children.iter_mut() {
            c.assign_scopes(next);
        }
    }
}

/// Leaf wrapping a side-effect-free predicate.
pub struct Condition<F> {
    name: &'static str,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(name: &'static str, cond: F) -> Self {
        Self { name, cond }
    }
}

impl<F, A, W> BtNode<A, W> for Condition<F>
where
    F: FnMut(&TickContext, &A, &W, &Blackboard) -> bool + 'static,
    A: 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: &mut A,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        if (self.cond)(ctx, &*agent, &*world, &*blackboard) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Leaf wrapping an action against the agent runtime.
///
/// A faulting action (stale target, missing collaborator answer) resolves to
/// `Failure`; the fault never leaves the leaf.
pub struct Task<F> {
    name: &'static str,
    run: F,
}

impl<F> Task<F> {
    pub fn new(name: &'static str, run: F) -> Self {
        Self { name, run }
    }
}

impl<F, A, W> BtNode<A, W> for Task<F>
where
    F: FnMut(&TickContext, &mut A, &mut W, &mut Blackboard) -> LeafResult + 'static,
    A: 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: &mut A,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match (self.run)(ctx, agent, world, blackboard) {
            Ok(status) => status,
            Err(fault) => {
                tracing::debug!(leaf = self.name, tick = ctx.tick, %fault, "leaf faulted");
                BtStatus::Failure
            }
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Decorator swapping `Success` and `Failure`; `Running` passes through.
pub struct Inverter<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    child: Box<dyn BtNode<A, W>>,
}

impl<A, W> Inverter<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    pub fn new(child: Box<dyn BtNode<A, W>>) -> Self {
        Self { child }
    }
}

impl<A, W> BtNode<A, W> for Inverter<A, W>
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
    ) -> BtStatus {
        match self.child.tick(ctx, agent, world, blackboard) {
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
        }
    }

    fn name(&self) -> &'static str {
        "inverter"
    }

    fn reset(&mut self) {
        self.child.reset();
    }

    fn assign_scopes(&mut self, next: &mut u32) {
        self.child.assign_scopes(next);
    }
}

/// Decorator turning `Failure` into `Success`, for optional steps inside a sequence.
pub struct AlwaysSucceed<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    child: Box<dyn BtNode<A, W>>,
}

impl<A, W> AlwaysSucceed<A, W>
where
    A: 'static,
    W: WorldMut + 'static,
{
    pub fn new(child: Box<dyn BtNode<A, W>>) -> Self {
        Self { child }
    }
}

impl<A, W> BtNode<A, W> for AlwaysSucceed<A, W>
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
    ) -> BtStatus {
        match self.child.tick(ctx, agent, world, blackboard) {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Success | BtStatus::Failure => BtStatus::Success,
        }
    }

    fn name(&self) -> &'static str {
        "always_succeed"
    }

    fn reset(&mut self) {
        self.child.reset();
    }

    fn assign_scopes(&mut self, next: &mut u32) {
        self.child.assign_scopes(next);
    }
}
