//! Scene elements the view layer binds to
//!
//! Kept free of browser types so the list can be checked against
//! `index.html` natively.

use crate::error::{GameError, GameResult};

pub const SCENE: &str = "a-scene";
pub const PLAYER_RIG: &str = "#playerRig";
pub const LEFT_HAND: &str = "#leftHand";
pub const RIGHT_HAND: &str = "#rightHand";
pub const SCORE_DISPLAY: &str = "#scoreDisplay";
pub const TIMER_DISPLAY: &str = "#timerDisplay";
pub const FINAL_SCORE: &str = "#finalScore";
pub const GAME_OVER_SCREEN: &str = "#gameOverScreen";
pub const SIZE_BUTTON: &str = "#sizeBtn";
pub const SPEED_BUTTON: &str = "#speedBtn";
pub const SHAPE_BUTTON: &str = "#shapeBtn";

/// Binding fails without these
pub const REQUIRED: &[&str] = &[
    SCENE,
    PLAYER_RIG,
    SCORE_DISPLAY,
    TIMER_DISPLAY,
    FINAL_SCORE,
    GAME_OVER_SCREEN,
    SIZE_BUTTON,
    SPEED_BUTTON,
    SHAPE_BUTTON,
];

/// Controllers; desktop play works without them
pub const OPTIONAL: &[&str] = &[LEFT_HAND, RIGHT_HAND];

/// Required selectors `present` rejects, in declaration order
pub fn missing(mut present: impl FnMut(&'static str) -> bool) -> Vec<&'static str> {
    REQUIRED.iter().copied().filter(|s| !present(*s)).collect()
}

/// Fail on the first missing required element, logging all of them
pub fn check(present: impl FnMut(&'static str) -> bool) -> GameResult<()> {
    let missing = missing(present);
    match missing.first() {
        Some(&selector) => {
            log::error!("Scene is missing {}", missing.join(", "));
            Err(GameError::MissingElement { selector })
        }
        None => Ok(()),
    }
}
