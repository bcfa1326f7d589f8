//! First-person movement rig
//!
//! The rig is a position with a yaw, plus a look attachment that only
//! pitches. It walks, sprints, jumps and falls under gravity, and flies up
//! and down in creative mode. The collision resolver feeds it one flag per
//! frame telling it whether the agent is supported by an obstacle.

use crate::core::config::RigConfig;
use crate::foundation::math::{utils, Vec3};

use super::input::{InputActions, InputState};
use super::Rig;

/// Why the rig is off the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Airborne {
    /// Rising or falling through a jump
    Jumping,
    /// Dropping under gravity without a jump
    Falling,
}

/// Vertical status of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalState {
    /// On the ground plane or resting on an obstacle
    Grounded,
    /// In the air
    Airborne(Airborne),
}

/// Player movement controller
#[derive(Debug, Clone)]
pub struct MovementRig {
    config: RigConfig,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    jumping: bool,
    jump_speed: f32,
    fall_speed: f32,
    creative: bool,
    restricted: InputActions,
}

impl MovementRig {
    /// Create a rig at the origin
    pub fn new(config: RigConfig) -> Self {
        let jump_speed = config.jump_speed;
        Self {
            config,
            position: Vec3::zeros(),
            yaw: 0.0,
            pitch: 0.0,
            jumping: false,
            jump_speed,
            fall_speed: 0.0,
            creative: false,
            restricted: InputActions::empty(),
        }
    }

    /// Place the rig
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the rig
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Heading about the up axis, in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Set the heading
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Look attachment pitch, in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the look pitch
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    /// Whether free flight is enabled
    pub fn is_creative(&self) -> bool {
        self.creative
    }

    /// Remaining upward speed of the current jump
    pub fn jump_speed(&self) -> f32 {
        self.jump_speed
    }

    /// Current fall speed
    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    /// Movement actions currently masked by a contact
    pub fn restricted(&self) -> InputActions {
        self.restricted
    }

    /// Vertical status derived from the jump flag and fall speed
    pub fn vertical_state(&self) -> VerticalState {
        if self.jumping {
            VerticalState::Airborne(Airborne::Jumping)
        } else if self.position.y > 0.0 && self.fall_speed > 0.0 {
            VerticalState::Airborne(Airborne::Falling)
        } else {
            VerticalState::Grounded
        }
    }

    /// Mask the movement actions in `held` until [`allow_movement`](Self::allow_movement)
    pub fn restrict_movement(&mut self, held: InputActions) {
        self.restricted |= held & InputActions::MOVEMENT;
    }

    /// Clear every movement mask
    pub fn allow_movement(&mut self) {
        self.restricted = InputActions::empty();
    }

    /// Advance the rig by one frame
    ///
    /// `supported` is the resolver's grounded flag for this frame: it stops
    /// falling and ends a jump on top of an obstacle. Creative mode flips on
    /// every frame the toggle is held, so hosts should send it for one frame.
    pub fn update(&mut self, input: &InputState, delta_time: f32, supported: bool) {
        let cfg = &self.config;
        let mut move_amount = cfg.units_per_second * delta_time;
        let rotate_amount = cfg.degrees_per_second.to_radians() * delta_time * cfg.mouse_sensitivity;

        if input.is_pressed(InputActions::SPRINT) {
            move_amount *= cfg.sprint_multiplier;
        }

        if input.is_pressed(InputActions::JUMP) && !self.jumping {
            self.jumping = true;
        }

        if input.is_pressed(InputActions::TOGGLE_CREATIVE) {
            self.creative = !self.creative;
            log::debug!("Creative mode {}", if self.creative { "on" } else { "off" });
        }

        self.update_vertical(delta_time, supported);

        let held = input.actions & InputActions::MOVEMENT & !self.restricted;
        let mut step = Vec3::zeros();
        if held.contains(InputActions::FORWARD) {
            step.z -= move_amount;
        }
        if held.contains(InputActions::BACKWARD) {
            step.z += move_amount;
        }
        if held.contains(InputActions::LEFT) {
            step.x -= move_amount;
        }
        if held.contains(InputActions::RIGHT) {
            step.x += move_amount;
        }
        if self.creative && held.contains(InputActions::UP) {
            step.y += move_amount;
        }
        if self.creative && held.contains(InputActions::DOWN) {
            step.y -= move_amount;
        }
        if step != Vec3::zeros() {
            self.translate(step, true);
        }

        if input.is_pressed(InputActions::TURN_RIGHT) || input.mouse_dx > 0.0 {
            self.yaw -= rotate_amount;
        }
        if input.is_pressed(InputActions::TURN_LEFT) || input.mouse_dx < 0.0 {
            self.yaw += rotate_amount;
        }
        if input.is_pressed(InputActions::LOOK_UP) || input.mouse_dy < 0.0 {
            self.pitch += rotate_amount;
        }
        if input.is_pressed(InputActions::LOOK_DOWN) || input.mouse_dy > 0.0 {
            self.pitch -= rotate_amount;
        }
    }

    fn update_vertical(&mut self, delta_time: f32, supported: bool) {
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.fall_speed = 0.0;
        }

        if supported {
            self.fall_speed = 0.0;
        }

        if self.position.y > 0.0 && !self.jumping && !supported {
            self.fall_speed += self.config.gravity * delta_time;
            self.position.y -= self.fall_speed * delta_time;
            if self.position.y <= 0.0 {
                self.position.y = 0.0;
                self.fall_speed = 0.0;
            }
        }

        if self.jumping {
            self.position.y += self.jump_speed * delta_time;
            self.jump_speed -= self.config.jump_decay * delta_time;

            if supported {
                self.land();
                self.position.y += self.config.landing_lift * delta_time;
            }

            if self.position.y <= 0.0 {
                self.land();
                self.position.y = 0.0;
            }
        }
    }

    fn land(&mut self) {
        self.jumping = false;
        self.jump_speed = self.config.jump_speed;
    }
}

impl Rig for MovementRig {
    fn translate(&mut self, delta: Vec3, local: bool) {
        if local {
            self.position += utils::yaw_rotation(self.yaw) * delta;
        } else {
            self.position += delta;
        }
    }

    fn global_position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> MovementRig {
        MovementRig::new(RigConfig::default())
    }

    fn held(actions: InputActions) -> InputState {
        InputState::new(actions)
    }

    #[test]
    fn test_walk_and_sprint() {
        let mut rig = rig();
        rig.update(&held(InputActions::FORWARD), 1.0, false);
        assert_relative_eq!(rig.position(), Vec3::new(0.0, 0.0, -3.0));

        rig.update(&held(InputActions::RIGHT | InputActions::SPRINT), 0.5, false);
        assert_relative_eq!(rig.position(), Vec3::new(3.0, 0.0, -3.0));
    }

    #[test]
    fn test_local_translation_follows_yaw() {
        let mut rig = rig();
        rig.set_yaw(std::f32::consts::FRAC_PI_2);
        rig.update(&held(InputActions::FORWARD), 1.0, false);
        assert_relative_eq!(rig.position(), Vec3::new(-3.0, 0.0, 0.0), epsilon = 1e-5);

        rig.translate(Vec3::new(0.0, 0.0, 1.0), false);
        assert_relative_eq!(rig.position(), Vec3::new(-3.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_jump_rises_then_lands_on_ground() {
        let mut rig = rig();
        rig.update(&held(InputActions::JUMP), 0.1, false);
        assert_eq!(rig.vertical_state(), VerticalState::Airborne(Airborne::Jumping));
        assert_relative_eq!(rig.position().y, 1.0);
        assert_relative_eq!(rig.jump_speed(), 8.5);

        let idle = InputState::default();
        let mut frames = 0;
        while rig.vertical_state() != VerticalState::Grounded {
            rig.update(&idle, 0.1, false);
            frames += 1;
            assert!(frames < 100, "jump never landed");
        }
        assert_relative_eq!(rig.position().y, 0.0);
        assert_relative_eq!(rig.jump_speed(), 10.0);
    }

    #[test]
    fn test_jump_lands_on_obstacle_with_lift() {
        let mut rig = rig();
        rig.update(&held(InputActions::JUMP), 0.1, false);
        let before = rig.position().y;

        rig.update(&InputState::default(), 0.1, true);
        assert_eq!(rig.vertical_state(), VerticalState::Grounded);
        // Jump step at 8.5 plus landing lift at 16.
        assert_relative_eq!(rig.position().y, before + 0.85 + 1.6, epsilon = 1e-5);
        assert_relative_eq!(rig.jump_speed(), 10.0);
    }

    #[test]
    fn test_gravity_until_supported() {
        let mut rig = rig().with_position(Vec3::new(0.0, 5.0, 0.0));
        rig.update(&InputState::default(), 0.1, false);
        assert_eq!(rig.vertical_state(), VerticalState::Airborne(Airborne::Falling));
        assert_relative_eq!(rig.fall_speed(), 1.5);
        assert_relative_eq!(rig.position().y, 4.85);

        rig.update(&InputState::default(), 0.1, true);
        assert_eq!(rig.vertical_state(), VerticalState::Grounded);
        assert_relative_eq!(rig.fall_speed(), 0.0);
        assert_relative_eq!(rig.position().y, 4.85);
    }

    #[test]
    fn test_fall_clamps_at_ground() {
        let mut rig = rig().with_position(Vec3::new(0.0, 0.01, 0.0));
        rig.update(&InputState::default(), 0.5, false);
        assert_relative_eq!(rig.position().y, 0.0);
        assert_eq!(rig.vertical_state(), VerticalState::Grounded);

        rig.set_position(Vec3::new(0.0, -2.0, 0.0));
        rig.update(&InputState::default(), 0.1, false);
        assert_relative_eq!(rig.position().y, 0.0);
    }

    #[test]
    fn test_vertical_flight_needs_creative() {
        let mut rig = rig();
        rig.update(&held(InputActions::UP), 1.0, false);
        assert_relative_eq!(rig.position().y, 0.0);

        rig.update(&held(InputActions::TOGGLE_CREATIVE), 0.0, false);
        assert!(rig.is_creative());
        rig.update(&held(InputActions::UP), 1.0, true);
        assert_relative_eq!(rig.position().y, 3.0);
    }

    #[test]
    fn test_restricted_movement_is_masked() {
        let mut rig = rig();
        rig.restrict_movement(InputActions::FORWARD | InputActions::JUMP);
        assert_eq!(rig.restricted(), InputActions::FORWARD);

        rig.update(&held(InputActions::FORWARD | InputActions::LEFT), 1.0, false);
        assert_relative_eq!(rig.position(), Vec3::new(-3.0, 0.0, 0.0));

        rig.allow_movement();
        rig.update(&held(InputActions::FORWARD), 1.0, false);
        assert_relative_eq!(rig.position(), Vec3::new(-3.0, 0.0, -3.0));
    }

    #[test]
    fn test_turn_and_look() {
        let mut rig = rig();
        let step = 60.0_f32.to_radians() * 1.5;

        rig.update(&InputState::default().with_mouse(4.0, -1.0), 1.0, false);
        assert_relative_eq!(rig.yaw(), -step);
        assert_relative_eq!(rig.pitch(), step);

        rig.update(&held(InputActions::TURN_LEFT | InputActions::LOOK_DOWN), 1.0, false);
        assert_relative_eq!(rig.yaw(), 0.0);
        assert_relative_eq!(rig.pitch(), 0.0);
    }
}
