//! Game facade
//!
//! Wires the clock, round controller, target registry, difficulty store and
//! player rig together. Input events and timer callbacks go in; [`Effect`]s
//! come out for the view layer to apply.

use glam::Vec3;

use super::clock::Scheduler;
use super::difficulty::{DifficultyParams, DifficultyStore};
use super::events::{Easing, Effect, InputEvent, TimerBand, TimerEvent};
use super::locomotion::{KeyCommand, PlayerRig, Thumbsticks};
use super::round::{RoundController, RoundState, TickOutcome};
use super::targets::{DestroyResult, PhaseOutcome, TargetId, TargetRegistry};
use crate::error::GameResult;
use crate::settings::Settings;

/// A running game session
#[derive(Debug, Clone)]
pub struct Game {
    clock: Scheduler<TimerEvent>,
    round: RoundController,
    targets: TargetRegistry,
    difficulty: DifficultyStore,
    rig: PlayerRig,
    sticks: Thumbsticks,
    /// Queued view requests, oldest first
    effects: Vec<Effect>,
    points_per_hit: u32,
    destroy_effect_ms: u32,
    spawn_on_start: bool,
}

impl Game {
    /// Create an idle game; call [`Game::start_round`] to begin
    pub fn new(settings: Settings) -> GameResult<Self> {
        settings.validate()?;

        let mut clock = Scheduler::new();
        clock.schedule_interval(settings.locomotion_frame_ms as u64, TimerEvent::LocomotionFrame);

        Ok(Self {
            clock,
            round: RoundController::new(&settings),
            targets: TargetRegistry::new(settings.destroy_effect_ms),
            difficulty: DifficultyStore::new(settings.control_policy),
            rig: PlayerRig::default(),
            sticks: Thumbsticks::default(),
            effects: Vec::new(),
            points_per_hit: settings.points_per_hit,
            destroy_effect_ms: settings.destroy_effect_ms,
            spawn_on_start: settings.spawn_on_start,
        })
    }

    // === Round transitions ===

    /// Start (or restart) a round from a clean slate
    pub fn start_round(&mut self) {
        self.purge_targets();
        self.round.start(&mut self.clock);

        self.rig.reset();
        self.effects.push(Effect::RigTransform {
            position: self.rig.position,
            yaw_deg: self.rig.yaw_deg,
        });
        let state = *self.round.state();
        self.effects.push(Effect::ScoreUpdate { score: state.score });
        self.push_timer_update(state.time_left_secs);
        self.effects.push(Effect::HideEndScreen);

        if self.spawn_on_start {
            self.spawn_target();
        }
    }

    /// Stop the round, clear the field and show the end screen
    pub fn end_round(&mut self) {
        let final_score = self.round.end(&mut self.clock);
        self.purge_targets();
        if let Some(final_score) = final_score {
            self.effects.push(Effect::ShowEndScreen { final_score });
        }
    }

    /// Countdown step
    pub fn tick(&mut self) {
        match self.round.tick() {
            TickOutcome::Ignored => {}
            TickOutcome::Running { seconds_left } => self.push_timer_update(seconds_left),
            TickOutcome::TimeUp => {
                self.push_timer_update(0);
                self.end_round();
            }
        }
    }

    // === Targets ===

    /// Spawn a target at a random point using the current difficulty
    pub fn spawn_target(&mut self) -> Option<TargetId> {
        if !self.round.is_active() {
            return None;
        }
        let position = self.round.next_spawn_position();
        self.spawn_target_at(position)
    }

    /// Spawn a target at a fixed point using the current difficulty
    pub fn spawn_target_at(&mut self, position: Vec3) -> Option<TargetId> {
        if !self.round.is_active() {
            return None;
        }
        let snapshot = self.difficulty.snapshot();
        let id = self.targets.spawn(&mut self.clock, position, snapshot);

        self.effects.push(Effect::SpawnVisual {
            target: id,
            shape: snapshot.shape,
            color: snapshot.color(),
            geometry: snapshot.geometry(),
            position,
        });
        if let Some(target) = self.targets.get(id) {
            self.effects.push(Effect::AnimateRise {
                target: id,
                to: target.peak(),
                duration_ms: snapshot.speed_ms,
                easing: Easing::EaseOutQuad,
            });
        }
        Some(id)
    }

    /// A target was hit
    pub fn destroy_target(&mut self, id: TargetId) -> DestroyResult {
        if !self.round.is_active() {
            return DestroyResult::AlreadyGone;
        }
        let result = self.targets.destroy(&mut self.clock, id);
        if result == DestroyResult::Scored && self.round.add_score(self.points_per_hit) {
            self.effects.push(Effect::AnimateDestroy {
                target: id,
                duration_ms: self.destroy_effect_ms,
            });
            self.effects.push(Effect::ScoreUpdate {
                score: self.round.state().score,
            });
        }
        result
    }

    fn purge_targets(&mut self) {
        for id in self.targets.purge_all(&mut self.clock) {
            self.effects.push(Effect::RemoveVisual { target: id });
        }
    }

    // === Input ===

    pub fn handle_input(&mut self, event: InputEvent) {
        let active = self.round.is_active();
        match event {
            InputEvent::DestroyRequested(id) => {
                self.destroy_target(id);
            }
            InputEvent::CycleSize => {
                if let Some(feedback) = self.difficulty.cycle_size(active) {
                    self.effects.push(Effect::ControlUpdate(feedback));
                }
            }
            InputEvent::CycleSpeed => {
                if let Some(feedback) = self.difficulty.cycle_speed(active) {
                    self.effects.push(Effect::ControlUpdate(feedback));
                }
            }
            InputEvent::CycleShape => {
                if let Some(feedback) = self.difficulty.cycle_shape(active) {
                    self.effects.push(Effect::ControlUpdate(feedback));
                }
            }
            InputEvent::RestartRequested => {
                log::info!("Restart requested");
                self.start_round();
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Thumbstick { hand, axes } => self.sticks.set(hand, axes),
        }
    }

    fn handle_key(&mut self, key: KeyCommand) {
        if !self.round.is_active() {
            return;
        }
        self.rig.apply_key(key);
        self.push_rig_transform();
    }

    // === Timers ===

    /// Run every timer due within the next `elapsed_ms`, in deadline order
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.clock.now_ms() + elapsed_ms;
        while let Some((_, event)) = self.clock.pop_due(until) {
            self.fire_timer(event);
        }
        self.clock.advance_to(until);
    }

    /// Dispatch one timer callback. Stale callbacks are no-ops.
    pub fn fire_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Countdown => self.tick(),
            TimerEvent::Spawn => {
                self.spawn_target();
            }
            TimerEvent::PhaseDeadline { target, expected } => {
                let active = self.round.is_active();
                match self
                    .targets
                    .on_phase_deadline(&mut self.clock, target, expected, active)
                {
                    PhaseOutcome::Falling {
                        target,
                        to,
                        duration_ms,
                    } => self.effects.push(Effect::AnimateFall {
                        target,
                        to,
                        duration_ms,
                        easing: Easing::EaseInQuad,
                    }),
                    PhaseOutcome::Expired { target } => {
                        self.effects.push(Effect::RemoveVisual { target })
                    }
                    PhaseOutcome::Stale => {}
                }
            }
            TimerEvent::RemoveDestroyed { target } => {
                if self.targets.on_removal_due(target) {
                    self.effects.push(Effect::RemoveVisual { target });
                }
            }
            TimerEvent::LocomotionFrame => {
                if self.round.is_active() && self.rig.apply_sticks(&self.sticks) {
                    self.push_rig_transform();
                }
            }
        }
    }

    // === Effects ===

    fn push_timer_update(&mut self, seconds_left: u32) {
        self.effects.push(Effect::TimerUpdate {
            seconds_left,
            band: TimerBand::for_seconds(seconds_left),
        });
    }

    fn push_rig_transform(&mut self) {
        self.effects.push(Effect::RigTransform {
            position: self.rig.position,
            yaw_deg: self.rig.yaw_deg,
        });
    }

    /// Take all queued effects
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // === Accessors ===

    pub fn round_state(&self) -> &RoundState {
        self.round.state()
    }

    pub fn is_active(&self) -> bool {
        self.round.is_active()
    }

    pub fn difficulty(&self) -> DifficultyParams {
        self.difficulty.snapshot()
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn rig(&self) -> &PlayerRig {
        &self.rig
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Countdown or spawner armed
    pub fn has_round_timers(&self) -> bool {
        self.round.has_pending_timers()
    }

    /// Timers of any kind, including the locomotion frame
    pub fn pending_timer_count(&self) -> usize {
        self.clock.pending_count()
    }
}
