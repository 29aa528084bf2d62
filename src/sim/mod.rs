//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (the view layer feeds elapsed milliseconds)
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod events;
pub mod game;
pub mod locomotion;
pub mod round;
pub mod targets;

pub use clock::{Scheduler, TimerId};
pub use difficulty::{
    Color, Control, ControlFeedback, ControlPolicy, DifficultyParams, DifficultyStore,
    TargetGeometry, TargetShape, next_size, next_speed,
};
pub use events::{Easing, Effect, InputEvent, TimerBand, TimerEvent};
pub use game::Game;
pub use locomotion::{Hand, KeyCommand, PlayerRig, Thumbsticks};
pub use round::{RoundController, RoundState, TickOutcome};
pub use targets::{DestroyResult, PhaseOutcome, Target, TargetId, TargetPhase, TargetRegistry};
