//! Game settings and tunables
//!
//! Loaded once at startup from an optional JSON file. Every field has a
//! default, so a partial file (or none at all) is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Which reward formula is submitted for player 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewardFormula {
    /// Score-based reward only
    #[default]
    Base,
    /// Base reward plus the spike-ratio bonus, rounded to two decimals
    PlayStyleBonus,
}

impl RewardFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardFormula::Base => "base",
            RewardFormula::PlayStyleBonus => "play_style_bonus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "base" => Some(RewardFormula::Base),
            "play_style_bonus" | "bonus" => Some(RewardFormula::PlayStyleBonus),
            _ => None,
        }
    }
}

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Rules ===
    /// Points needed to win (a 2-point lead is also required)
    pub winning_score: u32,
    /// Practice mode: rallies never end the round
    pub practice_mode: bool,

    // === Timing ===
    /// Nominal tick rate of the host clock
    pub normal_fps: u32,
    /// Effective rate during slow motion
    pub slow_motion_fps: u32,
    /// Simulation frames rendered in slow motion after a rally
    pub slow_motion_frames: u32,
    /// Delay between game end and the result dialog (ms)
    pub result_dialog_delay_ms: u64,
    /// Delay between a confirmed submission and restart (ms)
    pub restart_delay_ms: u64,

    // === Audio ===
    /// Pan player/ball cues left and right
    pub stereo_sound: bool,

    // === Submission ===
    pub reward_formula: RewardFormula,
    /// Result endpoint
    pub endpoint: String,
    /// Game name sent with every result
    pub game_name: String,
    /// Bearer token; usually injected from the environment
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            winning_score: DEFAULT_WINNING_SCORE,
            practice_mode: false,

            normal_fps: NORMAL_FPS,
            slow_motion_fps: SLOW_MOTION_FPS,
            slow_motion_frames: SLOW_MOTION_FRAMES,
            result_dialog_delay_ms: RESULT_DIALOG_DELAY_MS,
            restart_delay_ms: RESTART_AFTER_SUBMIT_MS,

            stereo_sound: true,

            reward_formula: RewardFormula::Base,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            game_name: Self::DEFAULT_GAME_NAME.to_string(),
            token: None,
        }
    }
}

impl Settings {
    const DEFAULT_ENDPOINT: &'static str =
        "https://0by7j8suf2.execute-api.ap-northeast-2.amazonaws.com/proxy/api/result";
    const DEFAULT_GAME_NAME: &'static str = "pikachu-volley";

    /// Environment variable holding the bearer token
    pub const TOKEN_ENV: &'static str = "URL_TOKEN";

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Fill in the token from the environment if the file did not set one
    pub fn with_env_token(mut self) -> Self {
        if self.token.is_none() {
            self.token = std::env::var(Self::TOKEN_ENV)
                .ok()
                .filter(|t| !t.trim().is_empty());
        }
        self
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.winning_score == 0 {
            return Err(SettingsError::Invalid {
                field: "winning_score",
                reason: "must be greater than zero",
            });
        }
        if self.normal_fps == 0 {
            return Err(SettingsError::Invalid {
                field: "normal_fps",
                reason: "must be greater than zero",
            });
        }
        if self.slow_motion_fps == 0 {
            return Err(SettingsError::Invalid {
                field: "slow_motion_fps",
                reason: "must be greater than zero",
            });
        }
        if self.endpoint.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "endpoint",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    /// Real ticks per slow-motion frame
    pub fn slow_motion_ratio(&self) -> u32 {
        let ratio = (self.normal_fps as f32 / self.slow_motion_fps as f32).round() as u32;
        ratio.max(1)
    }
}
