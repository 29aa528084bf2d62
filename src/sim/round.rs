//! Round lifecycle: countdown, spawn cadence and score
//!
//! `Inactive → Active` on start, `Active → Inactive` when time runs out,
//! `Inactive → Active` again on restart. The controller owns the two
//! round-level timers and cancels them on every transition, so a restart
//! never leaves a second countdown or spawner running.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Scheduler, TimerId};
use super::events::TimerEvent;
use crate::consts::*;
use crate::settings::Settings;

/// Score and clock of the current (or last) round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub active: bool,
    pub score: u32,
    pub time_left_secs: u32,
}

impl RoundState {
    /// Add points; ignored once the round is over. Returns true if applied.
    pub fn add_score(&mut self, points: u32) -> bool {
        if !self.active {
            return false;
        }
        self.score = self.score.saturating_add(points);
        true
    }
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round not running
    Ignored,
    Running { seconds_left: u32 },
    /// Hit zero; the round must end now
    TimeUp,
}

#[derive(Debug, Clone)]
pub struct RoundController {
    state: RoundState,
    duration_secs: u32,
    countdown_ms: u64,
    spawn_interval_ms: u64,
    spawn_half_width: f32,
    countdown: Option<TimerId>,
    spawner: Option<TimerId>,
    rng: Pcg32,
}

impl RoundController {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: RoundState {
                active: false,
                score: 0,
                time_left_secs: settings.round_duration_secs,
            },
            duration_secs: settings.round_duration_secs,
            countdown_ms: settings.countdown_interval_ms as u64,
            spawn_interval_ms: settings.spawn_interval_ms as u64,
            spawn_half_width: settings.spawn_half_width,
            countdown: None,
            spawner: None,
            rng: Pcg32::seed_from_u64(settings.seed),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn add_score(&mut self, points: u32) -> bool {
        self.state.add_score(points)
    }

    /// Reset score and clock and (re)arm the round timers.
    ///
    /// Safe to call mid-round: existing timers are cancelled first.
    pub fn start(&mut self, clock: &mut Scheduler<TimerEvent>) {
        self.cancel_timers(clock);
        self.state = RoundState {
            active: true,
            score: 0,
            time_left_secs: self.duration_secs,
        };
        self.countdown = Some(clock.schedule_interval(self.countdown_ms, TimerEvent::Countdown));
        self.spawner = Some(clock.schedule_interval(self.spawn_interval_ms, TimerEvent::Spawn));
        log::info!("Round started ({}s)", self.duration_secs);
    }

    /// One second elapsed
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.active {
            return TickOutcome::Ignored;
        }
        self.state.time_left_secs = self.state.time_left_secs.saturating_sub(1);
        if self.state.time_left_secs == 0 {
            TickOutcome::TimeUp
        } else {
            TickOutcome::Running {
                seconds_left: self.state.time_left_secs,
            }
        }
    }

    /// Stop the round. Returns the final score, or `None` if it was not running.
    pub fn end(&mut self, clock: &mut Scheduler<TimerEvent>) -> Option<u32> {
        self.cancel_timers(clock);
        if !self.state.active {
            return None;
        }
        self.state.active = false;
        log::info!("Round ended, final score {}", self.state.score);
        Some(self.state.score)
    }

    /// Random spawn point on the floor grid, below ground level
    pub fn next_spawn_position(&mut self) -> Vec3 {
        let half = self.spawn_half_width;
        let x = self.rng.random_range(-half..half);
        let z = self.rng.random_range(-half..half);
        Vec3::new(x, TARGET_SPAWN_Y, z)
    }

    /// Countdown or spawner still armed
    pub fn has_pending_timers(&self) -> bool {
        self.countdown.is_some() || self.spawner.is_some()
    }

    fn cancel_timers(&mut self, clock: &mut Scheduler<TimerEvent>) {
        if let Some(id) = self.countdown.take() {
            clock.cancel(id);
        }
        if let Some(id) = self.spawner.take() {
            clock.cancel(id);
        }
    }
}
