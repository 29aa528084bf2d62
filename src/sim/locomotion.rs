//! Player rig movement
//!
//! Thumbsticks are integrated on a fixed frame timer; keyboard presses move in
//! discrete steps. Both are clamped to the play volume.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which controller a thumbstick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// Keyboard movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCommand {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    TurnLeft,
    TurnRight,
}

impl KeyCommand {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(KeyCommand::Forward),
            "KeyS" => Some(KeyCommand::Back),
            "KeyA" => Some(KeyCommand::StrafeLeft),
            "KeyD" => Some(KeyCommand::StrafeRight),
            "KeyQ" => Some(KeyCommand::Up),
            "KeyE" => Some(KeyCommand::Down),
            "ArrowLeft" => Some(KeyCommand::TurnLeft),
            "ArrowRight" => Some(KeyCommand::TurnRight),
            _ => None,
        }
    }
}

/// Latest axes reported by each controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbsticks {
    pub left: Vec2,
    pub right: Vec2,
}

impl Thumbsticks {
    pub fn set(&mut self, hand: Hand, axes: Vec2) {
        match hand {
            Hand::Left => self.left = axes,
            Hand::Right => self.right = axes,
        }
    }
}

#[inline]
fn outside_deadzone(axis: f32) -> bool {
    axis.abs() > STICK_DEADZONE
}

/// Camera rig the player stands in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRig {
    pub position: Vec3,
    /// Rotation around the vertical axis (degrees)
    pub yaw_deg: f32,
}

impl Default for PlayerRig {
    fn default() -> Self {
        Self {
            position: RIG_START_POSITION,
            yaw_deg: 0.0,
        }
    }
}

impl PlayerRig {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One frame of stick movement. Returns true if the rig moved.
    pub fn apply_sticks(&mut self, sticks: &Thumbsticks) -> bool {
        let mut moved = false;
        let radians = self.yaw_deg.to_radians();
        let (sin, cos) = radians.sin_cos();
        let left = sticks.left;
        let right = sticks.right;

        // Forward/back
        if outside_deadzone(left.y) {
            self.position.x += sin * left.y * STICK_MOVE_SPEED;
            self.position.z += cos * left.y * STICK_MOVE_SPEED;
            moved = true;
        }
        // Strafe
        if outside_deadzone(left.x) {
            self.position.x += cos * left.x * STICK_MOVE_SPEED;
            self.position.z -= sin * left.x * STICK_MOVE_SPEED;
            moved = true;
        }
        if outside_deadzone(right.x) {
            self.yaw_deg += right.x * STICK_TURN_SPEED_DEG;
            moved = true;
        }
        // Vertical
        if outside_deadzone(right.y) {
            self.position.y -= right.y * STICK_MOVE_SPEED;
            moved = true;
        }

        if moved {
            self.clamp_to_bounds();
        }
        moved
    }

    /// One discrete keyboard step
    pub fn apply_key(&mut self, key: KeyCommand) {
        match key {
            KeyCommand::Forward => self.position.z -= KEY_MOVE_STEP,
            KeyCommand::Back => self.position.z += KEY_MOVE_STEP,
            KeyCommand::StrafeLeft => self.position.x -= KEY_MOVE_STEP,
            KeyCommand::StrafeRight => self.position.x += KEY_MOVE_STEP,
            KeyCommand::Up => self.position.y += KEY_MOVE_STEP,
            KeyCommand::Down => self.position.y -= KEY_MOVE_STEP,
            KeyCommand::TurnLeft => self.yaw_deg -= KEY_TURN_STEP_DEG,
            KeyCommand::TurnRight => self.yaw_deg += KEY_TURN_STEP_DEG,
        }
        self.clamp_to_bounds();
    }

    fn clamp_to_bounds(&mut self) {
        self.position = self.position.clamp(RIG_MIN, RIG_MAX);
    }
}
