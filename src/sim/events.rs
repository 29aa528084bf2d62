//! Messages crossing the simulation boundary
//!
//! [`InputEvent`] comes in from the view layer, [`Effect`] goes out to it, and
//! [`TimerEvent`] is the payload carried by the internal scheduler.

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::difficulty::{Color, ControlFeedback, TargetGeometry, TargetShape};
use super::locomotion::{Hand, KeyCommand};
use super::targets::{TargetId, TargetPhase};
use crate::consts::*;

/// User input routed to the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Trigger/click landed on a target
    DestroyRequested(TargetId),
    CycleSize,
    CycleSpeed,
    CycleShape,
    /// End screen dismissed
    RestartRequested,
    /// Keyboard movement
    Key(KeyCommand),
    /// Thumbstick axes, each in [-1, 1]
    Thumbstick { hand: Hand, axes: Vec2 },
}

/// Scheduled callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Once per second while a round runs
    Countdown,
    /// Spawn cadence
    Spawn,
    /// End of a rise or fall leg; stale unless the target is still in `expected`
    PhaseDeadline {
        target: TargetId,
        expected: TargetPhase,
    },
    /// Destruction effect finished
    RemoveDestroyed { target: TargetId },
    /// Locomotion integration step
    LocomotionFrame,
}

/// Animation easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Easing {
    EaseOutQuad,
    EaseInQuad,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInQuad => "easeInQuad",
        }
    }
}

/// Color band for the countdown display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerBand {
    Green,
    Orange,
    Red,
}

impl TimerBand {
    pub fn for_seconds(seconds_left: u32) -> Self {
        if seconds_left <= TIMER_RED_AT_SECS {
            TimerBand::Red
        } else if seconds_left <= TIMER_ORANGE_AT_SECS {
            TimerBand::Orange
        } else {
            TimerBand::Green
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerBand::Green => "green",
            TimerBand::Orange => "orange",
            TimerBand::Red => "red",
        }
    }
}

/// Fire-and-forget requests for the view layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    SpawnVisual {
        target: TargetId,
        shape: TargetShape,
        color: Color,
        geometry: TargetGeometry,
        position: Vec3,
    },
    AnimateRise {
        target: TargetId,
        to: Vec3,
        duration_ms: u32,
        easing: Easing,
    },
    AnimateFall {
        target: TargetId,
        to: Vec3,
        duration_ms: u32,
        easing: Easing,
    },
    /// Shrink to nothing
    AnimateDestroy { target: TargetId, duration_ms: u32 },
    RemoveVisual { target: TargetId },
    ScoreUpdate { score: u32 },
    TimerUpdate { seconds_left: u32, band: TimerBand },
    ShowEndScreen { final_score: u32 },
    HideEndScreen,
    /// A control panel button changed value
    ControlUpdate(ControlFeedback),
    /// Player rig moved or turned
    RigTransform { position: Vec3, yaw_deg: f32 },
}
