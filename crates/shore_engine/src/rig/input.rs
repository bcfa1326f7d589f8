//! Per-frame input snapshot consumed by the movement rig
//!
//! Keyboard handling belongs to the host; the rig only sees which actions
//! are held this frame and the mouse motion since the last one.

use bitflags::bitflags;

bitflags! {
    /// Actions held down during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputActions: u16 {
        /// Move along the rig's local -Z
        const FORWARD = 1 << 0;
        /// Move along the rig's local +Z
        const BACKWARD = 1 << 1;
        /// Strafe along local -X
        const LEFT = 1 << 2;
        /// Strafe along local +X
        const RIGHT = 1 << 3;
        /// Fly up (creative mode only)
        const UP = 1 << 4;
        /// Fly down (creative mode only)
        const DOWN = 1 << 5;
        /// Start a jump
        const JUMP = 1 << 6;
        /// Move faster
        const SPRINT = 1 << 7;
        /// Turn left about the up axis
        const TURN_LEFT = 1 << 8;
        /// Turn right about the up axis
        const TURN_RIGHT = 1 << 9;
        /// Pitch the look attachment up
        const LOOK_UP = 1 << 10;
        /// Pitch the look attachment down
        const LOOK_DOWN = 1 << 11;
        /// Flip creative (free-flight) mode
        const TOGGLE_CREATIVE = 1 << 12;

        /// Every translation action; these are the ones a contact can mask
        const MOVEMENT = Self::FORWARD.bits()
            | Self::BACKWARD.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::UP.bits()
            | Self::DOWN.bits();
    }
}

/// Input for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Held actions
    pub actions: InputActions,
    /// Horizontal mouse motion; positive turns right
    pub mouse_dx: f32,
    /// Vertical mouse motion; negative looks up
    pub mouse_dy: f32,
}

impl InputState {
    /// Input with the given actions held and no mouse motion
    pub fn new(actions: InputActions) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    /// Add mouse motion
    pub fn with_mouse(mut self, dx: f32, dy: f32) -> Self {
        self.mouse_dx = dx;
        self.mouse_dy = dy;
        self
    }

    /// Whether `action` is held
    pub fn is_pressed(&self, action: InputActions) -> bool {
        self.actions.contains(action)
    }
}
