use serde::{Deserialize, Serialize};

/// The one active state of a creature. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreatureState {
    GoingToFood,
    Eating,
    DoneEating,
    GoingToWater,
    Drinking,
    DoneDrinking,
    GoingToMate,
    Mating,
    DoneMating,
    Attacking,
    DoneAttacking,
    Wandering,
    Running,
    Dead,
}

impl CreatureState {
    pub fn is_terminal(self) -> bool {
        self == CreatureState::Dead
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreatureState::GoingToFood => "GOING_TO_FOOD",
            CreatureState::Eating => "EATING",
            CreatureState::DoneEating => "DONE_EATING",
            CreatureState::GoingToWater => "GOING_TO_WATER",
            CreatureState::Drinking => "DRINKING",
            CreatureState::DoneDrinking => "DONE_DRINKING",
            CreatureState::GoingToMate => "GOING_TO_MATE",
            CreatureState::Mating => "MATING",
            CreatureState::DoneMating => "DONE_MATING",
            CreatureState::Attacking => "ATTACKING",
            CreatureState::DoneAttacking => "DONE_ATTACKING",
            CreatureState::Wandering => "WANDERING",
            CreatureState::Running => "RUNNING",
            CreatureState::Dead => "DEAD",
        }
    }
}

impl core::fmt::Display for CreatureState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
