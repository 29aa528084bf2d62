//! Headless tests for the round and target lifecycle.
//!
//! Everything runs on the virtual clock, so a full 30 second round takes
//! microseconds and every interleaving is reproducible.

use glam::Vec3;
use proptest::prelude::*;
use target_range::Settings;
use target_range::sim::{
    DestroyResult, Effect, Game, InputEvent, TargetId, TargetPhase, TargetShape, TimerEvent,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Game with no automatic spawn at round start, so tests control every target.
fn quiet_game() -> Game {
    let settings = Settings {
        spawn_on_start: false,
        ..Default::default()
    };
    Game::new(settings).expect("default settings are valid")
}

fn started_game() -> Game {
    let mut game = quiet_game();
    game.start_round();
    game.drain_effects();
    game
}

fn removed(effects: &[Effect], id: TargetId) -> bool {
    effects.contains(&Effect::RemoveVisual { target: id })
}

// ── Round transitions ─────────────────────────────────────────────────────────

#[test]
fn start_resets_score_and_clock() {
    let mut game = started_game();
    let id = game.spawn_target_at(Vec3::ZERO).unwrap();
    game.destroy_target(id);
    game.advance(5_000);
    assert_eq!(game.round_state().score, 10);
    assert_eq!(game.round_state().time_left_secs, 25);

    game.start_round();
    assert!(game.is_active());
    assert_eq!(game.round_state().score, 0);
    assert_eq!(game.round_state().time_left_secs, 30);
    assert!(game.targets().is_empty());
    assert_eq!(game.targets().pending_timers(), 0);
}

#[test]
fn repeated_starts_do_not_stack_timers() {
    let mut game = quiet_game();
    for _ in 0..5 {
        game.start_round();
    }
    // Countdown, spawner and the locomotion frame
    assert_eq!(game.pending_timer_count(), 3);

    game.advance(1_000);
    assert_eq!(game.round_state().time_left_secs, 29);

    game.advance(2_000);
    assert_eq!(game.targets().len(), 1, "one spawner, one target");
}

#[test]
fn round_times_out_after_thirty_seconds() {
    let mut game = started_game();
    game.advance(29_999);
    assert!(game.is_active());
    assert_eq!(game.round_state().time_left_secs, 1);

    game.advance(1);
    assert!(!game.is_active());
    assert_eq!(game.round_state().time_left_secs, 0);
    assert!(!game.has_round_timers());

    let effects = game.drain_effects();
    assert!(effects.contains(&Effect::ShowEndScreen { final_score: 0 }));
}

#[test]
fn end_purges_targets_and_stops_schedules() {
    let mut game = started_game();
    game.advance(9_000);
    // Spawned at 6s (falling) and 9s (rising); the 3s one already expired
    assert_eq!(game.targets().len(), 2);
    let live: Vec<_> = game.targets().iter().map(|t| t.id).collect();
    game.drain_effects();

    game.end_round();
    assert!(game.targets().is_empty());
    let effects = game.drain_effects();
    for id in live {
        assert!(removed(&effects, id));
    }

    // Nothing ticks, spawns or animates until the next start
    game.advance(60_000);
    assert!(game.drain_effects().is_empty());
    assert_eq!(game.round_state().time_left_secs, 21);
    assert!(game.targets().is_empty());
}

#[test]
fn restart_from_end_screen() {
    let mut game = Game::new(Settings::default()).unwrap();
    game.start_round();
    game.advance(30_000);
    assert!(!game.is_active());
    game.drain_effects();

    game.handle_input(InputEvent::RestartRequested);
    assert!(game.is_active());
    assert_eq!(game.round_state().time_left_secs, 30);
    assert_eq!(game.targets().len(), 1);
    assert!(game.drain_effects().contains(&Effect::HideEndScreen));
}

// ── Target lifecycle ──────────────────────────────────────────────────────────

#[test]
fn unhit_target_rises_falls_and_expires() {
    let mut game = started_game();
    let id = game.spawn_target_at(Vec3::new(2.0, 0.0, 2.0)).unwrap();
    assert_eq!(game.difficulty().speed_ms, 2_000);

    game.advance(2_000);
    assert_eq!(game.targets().phase(id), Some(TargetPhase::Falling));
    assert_eq!(game.round_state().score, 0);
    assert!(game.drain_effects().iter().any(|e| matches!(
        e,
        Effect::AnimateFall { target, to, duration_ms: 2_000, .. }
            if *target == id && *to == Vec3::new(2.0, 0.0, 2.0)
    )));

    game.advance(2_000);
    assert!(game.targets().get(id).is_none());
    assert_eq!(game.round_state().score, 0);
    assert!(removed(&game.drain_effects(), id));
}

#[test]
fn destroy_scores_once() {
    let mut game = started_game();
    let id = game.spawn_target_at(Vec3::new(2.0, -1.0, 2.0)).unwrap();

    assert_eq!(game.destroy_target(id), DestroyResult::Scored);
    assert_eq!(game.round_state().score, 10);
    assert_eq!(game.targets().phase(id), Some(TargetPhase::Destroyed));

    assert_eq!(game.destroy_target(id), DestroyResult::AlreadyGone);
    assert_eq!(game.round_state().score, 10);

    // The destroyed target never falls
    game.advance(4_000);
    assert!(
        !game
            .drain_effects()
            .iter()
            .any(|e| matches!(e, Effect::AnimateFall { target, .. } if *target == id))
    );
}

#[test]
fn destroy_after_expiry_is_already_gone() {
    let mut game = started_game();
    let id = game.spawn_target_at(Vec3::ZERO).unwrap();
    game.advance(4_000);
    assert_eq!(game.destroy_target(id), DestroyResult::AlreadyGone);
    assert_eq!(game.round_state().score, 0);
}

#[test]
fn timeout_while_rising_makes_late_callback_a_no_op() {
    let mut game = started_game();
    game.advance(29_500);
    let id = game.spawn_target_at(Vec3::ZERO).unwrap();
    assert_eq!(game.targets().phase(id), Some(TargetPhase::Rising));

    game.advance(500);
    assert!(!game.is_active());
    assert!(game.targets().is_empty());
    game.drain_effects();

    // A rise deadline that was already in flight when the round ended
    game.fire_timer(TimerEvent::PhaseDeadline {
        target: id,
        expected: TargetPhase::Rising,
    });
    game.fire_timer(TimerEvent::RemoveDestroyed { target: id });
    assert!(game.drain_effects().is_empty());
    assert!(game.targets().is_empty());
    assert_eq!(game.destroy_target(id), DestroyResult::AlreadyGone);
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[test]
fn difficulty_cycles_round_trip() {
    let mut game = started_game();
    let initial = game.difficulty();

    for _ in 0..4 {
        game.handle_input(InputEvent::CycleShape);
    }
    for _ in 0..5 {
        game.handle_input(InputEvent::CycleSize);
    }
    for _ in 0..4 {
        game.handle_input(InputEvent::CycleSpeed);
    }
    assert_eq!(game.difficulty(), initial);
    assert_eq!(game.drain_effects().len(), 13);
}

#[test]
fn difficulty_locked_between_rounds() {
    let mut game = quiet_game();
    game.handle_input(InputEvent::CycleShape);
    game.handle_input(InputEvent::CycleSize);
    assert_eq!(game.difficulty().shape, TargetShape::Cylinder);
    assert_eq!(game.difficulty().size, 1.0);
    assert!(game.drain_effects().is_empty());
}

#[test]
fn difficulty_unlocked_by_policy() {
    let settings = Settings::from_json(r#"{"control_policy": "Always"}"#).unwrap();
    let mut game = Game::new(settings).unwrap();
    game.handle_input(InputEvent::CycleShape);
    assert_eq!(game.difficulty().shape, TargetShape::Box);
}

#[test]
fn speed_change_only_affects_new_targets() {
    let mut game = started_game();
    let old = game.spawn_target_at(Vec3::ZERO).unwrap();
    game.handle_input(InputEvent::CycleSpeed);
    let new = game.spawn_target_at(Vec3::ONE).unwrap();

    game.advance(1_500);
    assert_eq!(game.targets().phase(old), Some(TargetPhase::Rising));
    assert_eq!(game.targets().phase(new), Some(TargetPhase::Falling));
}

// ── Properties ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Advance(u64),
    Destroy(u32),
    CycleSize,
    CycleSpeed,
    CycleShape,
    Restart,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..4_000).prop_map(Op::Advance),
        4 => (1u32..20).prop_map(Op::Destroy),
        1 => Just(Op::CycleSize),
        1 => Just(Op::CycleSpeed),
        1 => Just(Op::CycleShape),
        1 => Just(Op::Restart),
    ]
}

proptest! {
    #[test]
    fn destroy_is_idempotent(delay in 0u64..4_500, repeats in 1usize..6) {
        let mut game = started_game();
        let id = game.spawn_target_at(Vec3::ZERO).unwrap();
        game.advance(delay);
        let live = game.targets().phase(id).is_some_and(|p| p.is_live());

        let results: Vec<_> = (0..repeats).map(|_| game.destroy_target(id)).collect();
        let scored = results.iter().filter(|r| **r == DestroyResult::Scored).count();
        prop_assert_eq!(scored, usize::from(live));
        if live {
            prop_assert_eq!(results[0], DestroyResult::Scored);
        }
        prop_assert_eq!(game.round_state().score, 10 * scored as u32);
    }

    #[test]
    fn invariants_hold_under_any_input(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut game = quiet_game();
        game.start_round();
        let mut hits = 0u32;

        for op in ops {
            let before = *game.round_state();
            match op {
                Op::Advance(ms) => game.advance(ms),
                Op::Destroy(id) => {
                    if game.destroy_target(TargetId(id)) == DestroyResult::Scored {
                        hits += 1;
                    }
                }
                Op::CycleSize => game.handle_input(InputEvent::CycleSize),
                Op::CycleSpeed => game.handle_input(InputEvent::CycleSpeed),
                Op::CycleShape => game.handle_input(InputEvent::CycleShape),
                Op::Restart => {
                    game.handle_input(InputEvent::RestartRequested);
                    hits = 0;
                }
            }
            let after = *game.round_state();

            prop_assert_eq!(after.score, hits * 10);
            prop_assert!(after.time_left_secs <= 30);
            if before.active && after.active && !matches!(op, Op::Restart) {
                prop_assert!(after.time_left_secs <= before.time_left_secs);
            }
            if !after.active {
                prop_assert!(game.targets().is_empty());
                prop_assert!(!game.has_round_timers());
            }
            // Every target still on the field has exactly one pending timer
            prop_assert_eq!(game.targets().pending_timers(), game.targets().len());
        }
    }
}
