//! Scripted input for headless runs

use serde::{Deserialize, Serialize};
use shore_engine::prelude::*;

/// Player action as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk forward
    Forward,
    /// Walk backward
    Backward,
    /// Strafe left
    Left,
    /// Strafe right
    Right,
    /// Fly up
    Up,
    /// Fly down
    Down,
    /// Jump
    Jump,
    /// Sprint
    Sprint,
    /// Turn left
    TurnLeft,
    /// Turn right
    TurnRight,
    /// Look up
    LookUp,
    /// Look down
    LookDown,
    /// Toggle creative mode
    ToggleCreative,
}

impl From<Action> for InputActions {
    fn from(action: Action) -> Self {
        match action {
            Action::Forward => Self::FORWARD,
            Action::Backward => Self::BACKWARD,
            Action::Left => Self::LEFT,
            Action::Right => Self::RIGHT,
            Action::Up => Self::UP,
            Action::Down => Self::DOWN,
            Action::Jump => Self::JUMP,
            Action::Sprint => Self::SPRINT,
            Action::TurnLeft => Self::TURN_LEFT,
            Action::TurnRight => Self::TURN_RIGHT,
            Action::LookUp => Self::LOOK_UP,
            Action::LookDown => Self::LOOK_DOWN,
            Action::ToggleCreative => Self::TOGGLE_CREATIVE,
        }
    }
}

/// Hold a set of actions for a number of frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frames to hold the input
    pub frames: u32,
    /// Held actions
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Mouse motion applied every frame of the step
    #[serde(default)]
    pub mouse: (f32, f32),
}

impl ScriptStep {
    /// Input snapshot for each frame of this step
    pub fn input(&self) -> InputState {
        let actions = self
            .actions
            .iter()
            .fold(InputActions::empty(), |acc, &a| acc | InputActions::from(a));
        InputState::new(actions).with_mouse(self.mouse.0, self.mouse.1)
    }
}
