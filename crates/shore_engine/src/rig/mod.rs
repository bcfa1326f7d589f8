//! Player rigs
//!
//! A rig is anything the collision resolver can push around. The movement
//! rig is the concrete controller that also turns input into motion.

pub mod input;
pub mod movement_rig;

pub use input::{InputActions, InputState};
pub use movement_rig::{Airborne, MovementRig, VerticalState};

use crate::foundation::math::Vec3;

/// Transform controller the resolver can nudge
pub trait Rig {
    /// Move by `delta`; `local` deltas are rotated into the rig's heading
    fn translate(&mut self, delta: Vec3, local: bool);

    /// World-space position
    fn global_position(&self) -> Vec3;
}
