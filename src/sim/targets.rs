//! Target registry
//!
//! Owns every live target and the timers that move it through its lifecycle:
//!
//! ```text
//! Rising --speed_ms--> Falling --speed_ms--> Expired (removed)
//!    \                    /
//!     +--- destroy() ----+--> Destroyed --200ms--> removed
//! ```
//!
//! Timer callbacks can arrive after the target was destroyed or the round
//! ended, so every callback names the phase it expects and is dropped when the
//! target has moved on.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::clock::{Scheduler, TimerId};
use super::difficulty::DifficultyParams;
use super::events::TimerEvent;
use crate::consts::*;

/// Handle the view layer uses to refer to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPhase {
    Rising,
    Falling,
    /// Hit; waiting for the destruction effect to finish
    Destroyed,
    /// Fell back down unhit
    Expired,
}

impl TargetPhase {
    /// Still up and hittable
    pub fn is_live(&self) -> bool {
        matches!(self, TargetPhase::Rising | TargetPhase::Falling)
    }
}

/// A spawned target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Start (and end) point of the rise/fall
    pub spawn: Vec3,
    /// Difficulty in effect when spawned
    pub difficulty: DifficultyParams,
    pub phase: TargetPhase,
    /// Pending phase deadline or removal
    timer: Option<TimerId>,
}

impl Target {
    /// Top of the rise
    pub fn peak(&self) -> Vec3 {
        Vec3::new(self.spawn.x, TARGET_PEAK_Y, self.spawn.z)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }
}

/// Outcome of a destroy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyResult {
    Scored,
    /// Unknown, already destroyed or expired
    AlreadyGone,
}

/// Outcome of a phase deadline firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseOutcome {
    /// Reached the peak and started falling
    Falling {
        target: TargetId,
        to: Vec3,
        duration_ms: u32,
    },
    /// Fell back down and was removed
    Expired { target: TargetId },
    /// Target gone, phase moved on, or round over
    Stale,
}

/// All targets of the current round, keyed by id
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: BTreeMap<TargetId, Target>,
    next_id: u32,
    destroy_effect_ms: u32,
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new(DESTROY_EFFECT_MS)
    }
}

impl TargetRegistry {
    pub fn new(destroy_effect_ms: u32) -> Self {
        Self {
            targets: BTreeMap::new(),
            next_id: 1,
            destroy_effect_ms,
        }
    }

    /// Add a Rising target and arm its rise deadline
    pub fn spawn(
        &mut self,
        clock: &mut Scheduler<TimerEvent>,
        position: Vec3,
        snapshot: DifficultyParams,
    ) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;

        let timer = clock.schedule_once(
            snapshot.speed_ms as u64,
            TimerEvent::PhaseDeadline {
                target: id,
                expected: TargetPhase::Rising,
            },
        );
        self.targets.insert(
            id,
            Target {
                id,
                spawn: position,
                difficulty: snapshot,
                phase: TargetPhase::Rising,
                timer: Some(timer),
            },
        );
        log::debug!(
            "Spawned target {} at ({:.2}, {:.2}) as {}",
            id,
            position.x,
            position.z,
            snapshot.shape.as_str()
        );
        id
    }

    /// Rise or fall leg finished.
    ///
    /// Rising→Falling additionally requires the round to still be running;
    /// otherwise the target is retired on the spot.
    pub fn on_phase_deadline(
        &mut self,
        clock: &mut Scheduler<TimerEvent>,
        id: TargetId,
        expected: TargetPhase,
        round_active: bool,
    ) -> PhaseOutcome {
        let Some(target) = self.targets.get_mut(&id) else {
            return PhaseOutcome::Stale;
        };
        if target.phase != expected {
            return PhaseOutcome::Stale;
        }

        match expected {
            TargetPhase::Rising => {
                if !round_active {
                    target.phase = TargetPhase::Expired;
                    target.timer = None;
                    self.targets.remove(&id);
                    log::debug!("Target {} retired after round end", id);
                    return PhaseOutcome::Expired { target: id };
                }
                let duration_ms = target.difficulty.speed_ms;
                target.phase = TargetPhase::Falling;
                target.timer = Some(clock.schedule_once(
                    duration_ms as u64,
                    TimerEvent::PhaseDeadline {
                        target: id,
                        expected: TargetPhase::Falling,
                    },
                ));
                PhaseOutcome::Falling {
                    target: id,
                    to: target.spawn,
                    duration_ms,
                }
            }
            TargetPhase::Falling => {
                target.phase = TargetPhase::Expired;
                target.timer = None;
                self.targets.remove(&id);
                log::debug!("Target {} expired", id);
                PhaseOutcome::Expired { target: id }
            }
            TargetPhase::Destroyed | TargetPhase::Expired => PhaseOutcome::Stale,
        }
    }

    /// Hit a target. Only the first hit on a Rising/Falling target scores.
    pub fn destroy(&mut self, clock: &mut Scheduler<TimerEvent>, id: TargetId) -> DestroyResult {
        let Some(target) = self.targets.get_mut(&id) else {
            return DestroyResult::AlreadyGone;
        };
        if !target.phase.is_live() {
            return DestroyResult::AlreadyGone;
        }

        if let Some(timer) = target.timer.take() {
            clock.cancel(timer);
        }
        target.phase = TargetPhase::Destroyed;
        target.timer = Some(clock.schedule_once(
            self.destroy_effect_ms as u64,
            TimerEvent::RemoveDestroyed { target: id },
        ));
        log::debug!("Target {} destroyed", id);
        DestroyResult::Scored
    }

    /// Destruction effect finished; drop the target. Returns false if stale.
    pub fn on_removal_due(&mut self, id: TargetId) -> bool {
        match self.targets.get(&id) {
            Some(target) if target.phase == TargetPhase::Destroyed => {
                self.targets.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Remove every target and cancel its timers. Returns the removed ids.
    pub fn purge_all(&mut self, clock: &mut Scheduler<TimerEvent>) -> Vec<TargetId> {
        let targets = std::mem::take(&mut self.targets);
        targets
            .into_values()
            .map(|mut target| {
                if let Some(timer) = target.timer.take() {
                    clock.cancel(timer);
                }
                target.id
            })
            .collect()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(&id)
    }

    pub fn phase(&self, id: TargetId) -> Option<TargetPhase> {
        self.targets.get(&id).map(|t| t.phase)
    }

    /// Targets in id order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of targets waiting on a timer
    pub fn pending_timers(&self) -> usize {
        self.targets.values().filter(|t| t.has_pending_timer()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Scheduler<TimerEvent>, TargetRegistry) {
        (Scheduler::new(), TargetRegistry::default())
    }

    /// Fire everything due, feeding phase deadlines back into the registry
    fn run_until(
        clock: &mut Scheduler<TimerEvent>,
        registry: &mut TargetRegistry,
        until_ms: u64,
        round_active: bool,
    ) -> Vec<PhaseOutcome> {
        let mut outcomes = Vec::new();
        while let Some((_, event)) = clock.pop_due(until_ms) {
            match event {
                TimerEvent::PhaseDeadline { target, expected } => {
                    outcomes.push(registry.on_phase_deadline(clock, target, expected, round_active));
                }
                TimerEvent::RemoveDestroyed { target } => {
                    registry.on_removal_due(target);
                }
                _ => {}
            }
        }
        clock.advance_to(until_ms);
        outcomes
    }

    #[test]
    fn test_rise_fall_expire() {
        let (mut clock, mut registry) = setup();
        let id = registry.spawn(&mut clock, Vec3::new(2.0, 0.0, 2.0), DifficultyParams::default());
        assert_eq!(registry.phase(id), Some(TargetPhase::Rising));

        let outcomes = run_until(&mut clock, &mut registry, 2000, true);
        assert_eq!(
            outcomes,
            vec![PhaseOutcome::Falling {
                target: id,
                to: Vec3::new(2.0, 0.0, 2.0),
                duration_ms: 2000
            }]
        );
        assert_eq!(registry.phase(id), Some(TargetPhase::Falling));

        let outcomes = run_until(&mut clock, &mut registry, 4000, true);
        assert_eq!(outcomes, vec![PhaseOutcome::Expired { target: id }]);
        assert!(registry.is_empty());
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut clock, mut registry) = setup();
        let id = registry.spawn(&mut clock, Vec3::ZERO, DifficultyParams::default());

        assert_eq!(registry.destroy(&mut clock, id), DestroyResult::Scored);
        assert_eq!(registry.phase(id), Some(TargetPhase::Destroyed));
        assert_eq!(registry.destroy(&mut clock, id), DestroyResult::AlreadyGone);

        // Only the removal timer is left; the rise deadline was cancelled
        assert_eq!(clock.pending_count(), 1);
        let outcomes = run_until(&mut clock, &mut registry, 5000, true);
        assert!(outcomes.is_empty());
        assert!(registry.is_empty());
        assert_eq!(registry.destroy(&mut clock, id), DestroyResult::AlreadyGone);
    }

    #[test]
    fn test_destroy_while_falling() {
        let (mut clock, mut registry) = setup();
        let id = registry.spawn(&mut clock, Vec3::ZERO, DifficultyParams::default());
        run_until(&mut clock, &mut registry, 2500, true);
        assert_eq!(registry.phase(id), Some(TargetPhase::Falling));

        assert_eq!(registry.destroy(&mut clock, id), DestroyResult::Scored);
        run_until(&mut clock, &mut registry, 2700, true);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_deadline_after_destroy() {
        let (mut clock, mut registry) = setup();
        let id = registry.spawn(&mut clock, Vec3::ZERO, DifficultyParams::default());
        registry.destroy(&mut clock, id);

        // A callback that was already in flight when the hit landed
        let outcome = registry.on_phase_deadline(&mut clock, id, TargetPhase::Rising, true);
        assert_eq!(outcome, PhaseOutcome::Stale);
        assert_eq!(registry.phase(id), Some(TargetPhase::Destroyed));
    }

    #[test]
    fn test_rise_deadline_retires_target_when_round_over() {
        let (mut clock, mut registry) = setup();
        let id = registry.spawn(&mut clock, Vec3::ZERO, DifficultyParams::default());

        let outcome = registry.on_phase_deadline(&mut clock, id, TargetPhase::Rising, false);
        assert_eq!(outcome, PhaseOutcome::Expired { target: id });
        assert_eq!(registry.phase(id), None);
        assert_eq!(registry.pending_timers(), 0);
    }

    #[test]
    fn test_purge_cancels_timers() {
        let (mut clock, mut registry) = setup();
        let a = registry.spawn(&mut clock, Vec3::ZERO, DifficultyParams::default());
        let b = registry.spawn(&mut clock, Vec3::ONE, DifficultyParams::default());
        registry.destroy(&mut clock, b);
        assert_eq!(registry.pending_timers(), 2);

        let purged = registry.purge_all(&mut clock);
        assert_eq!(purged, vec![a, b]);
        assert!(registry.is_empty());
        assert_eq!(clock.pending_count(), 0);

        assert_eq!(
            registry.on_phase_deadline(&mut clock, a, TargetPhase::Rising, true),
            PhaseOutcome::Stale
        );
        assert!(!registry.on_removal_due(b));
    }

    #[test]
    fn test_snapshot_fixed_at_spawn() {
        let (mut clock, mut registry) = setup();
        let slow = DifficultyParams {
            speed_ms: 2500,
            ..Default::default()
        };
        let id = registry.spawn(&mut clock, Vec3::ZERO, slow);

        run_until(&mut clock, &mut registry, 2499, true);
        assert_eq!(registry.phase(id), Some(TargetPhase::Rising));
        run_until(&mut clock, &mut registry, 2500, true);
        assert_eq!(registry.phase(id), Some(TargetPhase::Falling));
        assert_eq!(registry.get(id).map(|t| t.peak().y), Some(TARGET_PEAK_Y));
    }
}
