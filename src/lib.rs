//! Target Range - a VR target-shooting minigame
//!
//! Core modules:
//! - `sim`: Deterministic round and target lifecycle (timers, scoring, difficulty)
//! - `platform`: Browser view layer (A-Frame scene, DOM, controller events)
//! - `settings`: Runtime configuration
//! - `error`: Setup and precondition errors

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Round length
    pub const ROUND_DURATION_SECS: u32 = 30;
    /// Countdown tick period
    pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
    /// Time between target spawns
    pub const SPAWN_INTERVAL_MS: u32 = 3000;
    /// Targets spawn within ±this on x and z
    pub const SPAWN_HALF_WIDTH: f32 = 10.0;
    /// Points per destroyed target
    pub const POINTS_PER_HIT: u32 = 10;
    /// Shrink-away effect before a destroyed target is removed
    pub const DESTROY_EFFECT_MS: u32 = 200;

    /// Timer display turns orange at this many seconds left
    pub const TIMER_ORANGE_AT_SECS: u32 = 20;
    /// Timer display turns red at this many seconds left
    pub const TIMER_RED_AT_SECS: u32 = 10;

    /// Targets start below the floor...
    pub const TARGET_SPAWN_Y: f32 = -1.0;
    /// ...and rise to this height
    pub const TARGET_PEAK_Y: f32 = 5.0;
    pub const CYLINDER_HEIGHT: f32 = 0.3;

    /// Size cycle
    pub const DEFAULT_TARGET_SIZE: f32 = 1.0;
    pub const MIN_TARGET_SIZE: f32 = 0.5;
    pub const MAX_TARGET_SIZE: f32 = 1.5;
    pub const TARGET_SIZE_STEP: f32 = 0.25;

    /// Speed cycle (duration of each rise/fall leg)
    pub const DEFAULT_TARGET_SPEED_MS: u32 = 2000;
    pub const FASTEST_TARGET_SPEED_MS: u32 = 1000;
    pub const SLOWEST_TARGET_SPEED_MS: u32 = 2500;
    pub const TARGET_SPEED_STEP_MS: u32 = 500;

    /// Locomotion step (~60 Hz)
    pub const LOCOMOTION_FRAME_MS: u32 = 16;
    pub const STICK_DEADZONE: f32 = 0.15;
    pub const STICK_MOVE_SPEED: f32 = 0.1;
    pub const STICK_TURN_SPEED_DEG: f32 = 2.0;
    pub const KEY_MOVE_STEP: f32 = 0.5;
    pub const KEY_TURN_STEP_DEG: f32 = 5.0;

    /// Player rig start and play volume
    pub const RIG_START_POSITION: Vec3 = Vec3::new(0.0, 1.6, 5.0);
    pub const RIG_MIN: Vec3 = Vec3::new(-20.0, 0.5, -20.0);
    pub const RIG_MAX: Vec3 = Vec3::new(20.0, 15.0, 20.0);
}
