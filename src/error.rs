//! Setup errors.
//!
//! Gameplay never fails: stale targets and out-of-round input are silent
//! no-ops inside `sim`. What remains are precondition violations caught
//! before a round can start, such as a scene element the view layer needs
//! being absent, or a setting that would stall the timers.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A required DOM / A-Frame element was not found.
    MissingElement {
        /// CSS selector that matched nothing.
        selector: &'static str,
    },

    /// A configuration value is outside its usable range.
    InvalidSetting {
        /// Settings field name.
        name: &'static str,
        /// Offending value, as text.
        value: String,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// Settings JSON could not be parsed.
    SettingsParse(String),

    /// A browser API call failed.
    Platform(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::MissingElement { selector } => {
                write!(f, "required scene element '{}' not found", selector)
            }
            GameError::InvalidSetting {
                name,
                value,
                expected,
            } => write!(f, "setting '{}' = {} is invalid (expected {})", name, value, expected),
            GameError::SettingsParse(msg) => write!(f, "failed to parse settings: {}", msg),
            GameError::Platform(msg) => write!(f, "platform error: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::SettingsParse(err.to_string())
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;
