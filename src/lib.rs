//! Pika Volley - frame-driven controller for a two-player volleyball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic phase machine (scoring, slow motion, deferred tasks)
//! - `reward`: Player 1 reward formula
//! - `submission`: Result dialog and non-blocking score submission
//! - `game`: Host-facing facade that wires the session to its collaborators
//! - `view` / `audio`: Output ports implemented by the presentation layer
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod game;
pub mod reward;
pub mod settings;
pub mod sim;
pub mod submission;
pub mod view;

pub use game::Game;
pub use settings::{RewardFormula, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Nominal tick rate (frames per second)
    pub const NORMAL_FPS: u32 = 25;
    /// Rate used while the slow-motion window is active
    pub const SLOW_MOTION_FPS: u32 = 5;
    /// Simulation frames shown in slow motion after a scoring rally
    pub const SLOW_MOTION_FRAMES: u32 = 6;

    /// Default winning score (deuce rule applies on top of it)
    pub const DEFAULT_WINNING_SCORE: u32 = 7;

    /// Half of the ground width; landings left of this are on player 1's side
    pub const GROUND_HALF_WIDTH: i32 = 216;

    /// Phase frame budgets
    pub const INTRO_FRAMES: u32 = 165;
    pub const MENU_DWELL_FRAMES: u32 = 71;
    pub const AFTER_MENU_SELECTION_FRAMES: u32 = 15;
    pub const BEFORE_START_OF_NEW_GAME_FRAMES: u32 = 15;
    pub const START_OF_NEW_GAME_FRAMES: u32 = 71;
    pub const AFTER_END_OF_ROUND_FRAMES: u32 = 5;
    pub const BEFORE_START_OF_NEXT_ROUND_FRAMES: u32 = 30;
    pub const GAME_END_FRAMES: u32 = 211;
    /// Game-end animation can be skipped with a power hit after this many frames
    pub const GAME_END_SKIPPABLE_AFTER: u32 = 70;
    /// Ready message blinks every N frames before a rally
    pub const READY_BLINK_PERIOD: u32 = 5;

    /// Menu frames without input before auto AI mode (kept, not enabled)
    pub const MENU_NO_INPUT_FRAMES: u32 = 225;

    /// Fade steps per frame
    pub const FADE_STEP: f32 = 1.0 / 16.0;
    pub const GAME_START_FADE_STEP: f32 = 1.0 / 17.0;

    /// Real-time delay between game end and the result dialog (ms)
    pub const RESULT_DIALOG_DELAY_MS: u64 = 3_000;
    /// Real-time delay between a successful submission and restart (ms)
    pub const RESTART_AFTER_SUBMIT_MS: u64 = 1_500;
}

/// Which side of the net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player1, Side::Player2];

    /// Index into per-player arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}
