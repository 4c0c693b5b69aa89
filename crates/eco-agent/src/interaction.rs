//! Timed interactions as explicit phases.
//!
//! An interaction is begun by a tree leaf and then advanced once per step by
//! [`crate::Creature::update`]: a fixed commit window, then polling the
//! animator until the clip has finished, then resolution.

use eco_nav::Vec3;

use crate::world::AnimFlag;
use crate::CreatureState;

/// Slack for accumulated `dt` rounding when a countdown should hit zero exactly.
const TIME_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Eat,
    Drink,
    Mate,
    Attack,
}

impl InteractionKind {
    pub fn active_state(self) -> CreatureState {
        match self {
            InteractionKind::Eat => CreatureState::Eating,
            InteractionKind::Drink => CreatureState::Drinking,
            InteractionKind::Mate => CreatureState::Mating,
            InteractionKind::Attack => CreatureState::Attacking,
        }
    }

    pub fn done_state(self) -> CreatureState {
        match self {
            InteractionKind::Eat => CreatureState::DoneEating,
            InteractionKind::Drink => CreatureState::DoneDrinking,
            InteractionKind::Mate => CreatureState::DoneMating,
            InteractionKind::Attack => CreatureState::DoneAttacking,
        }
    }

    pub fn flag(self) -> AnimFlag {
        match self {
            InteractionKind::Eat => AnimFlag::Eating,
            InteractionKind::Drink => AnimFlag::Drinking,
            InteractionKind::Mate => AnimFlag::Mating,
            InteractionKind::Attack => AnimFlag::Attacking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionTarget<E> {
    Entity(E),
    Point(Vec3),
}

impl<E: Copy> InteractionTarget<E> {
    pub fn entity(&self) -> Option<E> {
        match self {
            InteractionTarget::Entity(e) => Some(*e),
            InteractionTarget::Point(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Uninterruptible window; `remaining` seconds left.
    Commit { remaining: f32 },
    /// Waiting for the animation to finish; next check in `poll_in` seconds.
    Settle { poll_in: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Ready,
}

/// Commit-then-settle countdown shared by interactions and the death sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedTask {
    phase: Phase,
    poll_interval: f32,
    elapsed: f32,
}

impl TimedTask {
    pub fn new(commit_seconds: f32, poll_interval: f32) -> Self {
        Self {
            phase: Phase::Commit {
                remaining: commit_seconds,
            },
            poll_interval,
            elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds advanced since the task began.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt`. `is_playing` is only consulted when a settle check is due;
    /// the first check happens on the step the commit window closes.
    pub fn advance(&mut self, dt: f32, is_playing: impl FnOnce() -> bool) -> Progress {
        self.elapsed += dt;
        let countdown = match &mut self.phase {
            Phase::Commit { remaining } => remaining,
            Phase::Settle { poll_in } => poll_in,
        };
        *countdown -= dt;
        if *countdown > TIME_EPSILON {
            return Progress::Pending;
        }

        if is_playing() {
            self.phase = Phase::Settle {
                poll_in: self.poll_interval,
            };
            Progress::Pending
        } else {
            Progress::Ready
        }
    }
}

/// An interaction in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Interaction<E> {
    pub(crate) kind: InteractionKind,
    pub(crate) target: InteractionTarget<E>,
    pub(crate) task: TimedTask,
}
