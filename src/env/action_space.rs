use crate::error::TankError;

/// Closed set of commands the gunner can issue each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Fire,
}

impl Action {
    pub const COUNT: usize = 3;
    pub const ALL: [Action; Action::COUNT] = [Action::TurnLeft, Action::TurnRight, Action::Fire];
    pub const LABELS: [&'static str; Action::COUNT] = ["TURN LEFT", "TURN RIGHT", "FIRE"];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl TryFrom<usize> for Action {
    type Error = TankError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(value)
            .copied()
            .ok_or(TankError::InvalidAction(value))
    }
}
