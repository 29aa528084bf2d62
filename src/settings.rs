//! Game settings
//!
//! Read from LocalStorage at startup. Missing keys fall back to the defaults
//! in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::sim::ControlPolicy;

/// Timing, spawn and control tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Round length (seconds)
    pub round_duration_secs: u32,
    /// Countdown tick period (ms)
    pub countdown_interval_ms: u32,

    // === Targets ===
    /// Time between spawns (ms)
    pub spawn_interval_ms: u32,
    /// Spawn square half-width (world units)
    pub spawn_half_width: f32,
    /// Spawn one target as soon as the round starts
    pub spawn_on_start: bool,
    /// Points per destroyed target
    pub points_per_hit: u32,
    /// Destruction effect length before removal (ms)
    pub destroy_effect_ms: u32,

    // === Player ===
    /// Thumbstick integration step (ms)
    pub locomotion_frame_ms: u32,

    // === Controls ===
    /// Whether difficulty controls work between rounds
    pub control_policy: ControlPolicy,

    /// Spawn RNG seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_duration_secs: ROUND_DURATION_SECS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_half_width: SPAWN_HALF_WIDTH,
            spawn_on_start: true,
            points_per_hit: POINTS_PER_HIT,
            destroy_effect_ms: DESTROY_EFFECT_MS,

            locomotion_frame_ms: LOCOMOTION_FRAME_MS,

            control_policy: ControlPolicy::ActiveOnly,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse settings JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> GameResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values that would stall or flood the timers
    pub fn validate(&self) -> GameResult<()> {
        fn positive(name: &'static str, value: u32) -> GameResult<()> {
            if value == 0 {
                Err(GameError::InvalidSetting {
                    name,
                    value: value.to_string(),
                    expected: "> 0",
                })
            } else {
                Ok(())
            }
        }

        positive("round_duration_secs", self.round_duration_secs)?;
        positive("countdown_interval_ms", self.countdown_interval_ms)?;
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        positive("locomotion_frame_ms", self.locomotion_frame_ms)?;

        if !self.spawn_half_width.is_finite() || self.spawn_half_width <= 0.0 {
            return Err(GameError::InvalidSetting {
                name: "spawn_half_width",
                value: self.spawn_half_width.to_string(),
                expected: "finite and > 0",
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "target_range_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"round_duration_secs": 60, "control_policy": "Always"}"#)
            .unwrap();
        assert_eq!(settings.round_duration_secs, 60);
        assert_eq!(settings.control_policy, ControlPolicy::Always);
        assert_eq!(settings.spawn_interval_ms, SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Settings::from_json(r#"{"spawn_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidSetting {
                name: "spawn_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_half_width() {
        let settings = Settings {
            spawn_half_width: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{"),
            Err(GameError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: 42,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
