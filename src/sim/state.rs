//! Game session and core controller types
//!
//! All state the controller mutates lives in one owned [`GameSession`].

use super::schedule::Schedule;
use super::slow_motion::SlowMotion;
use crate::Side;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title animation
    Intro,
    /// Choose to play against the computer or a friend
    Menu,
    /// Fade out after the menu choice
    AfterMenuSelection,
    /// Short delay before the match starts
    BeforeStartOfNewGame,
    /// Scores reset, "game start" message, fade in
    StartOfNewGame,
    /// Rally in progress (also hosts the game-end animation)
    Round,
    /// Fade out after a scoring rally
    AfterEndOfRound,
    /// Blinking "ready" message before the next serve
    BeforeStartOfNextRound,
}

impl GamePhase {
    /// Fixed frame budget, if the phase has one
    pub fn frame_budget(self) -> Option<u32> {
        match self {
            GamePhase::Intro => Some(INTRO_FRAMES),
            GamePhase::Menu | GamePhase::Round => None,
            GamePhase::AfterMenuSelection => Some(AFTER_MENU_SELECTION_FRAMES),
            GamePhase::BeforeStartOfNewGame => Some(BEFORE_START_OF_NEW_GAME_FRAMES),
            GamePhase::StartOfNewGame => Some(START_OF_NEW_GAME_FRAMES),
            GamePhase::AfterEndOfRound => Some(AFTER_END_OF_ROUND_FRAMES),
            GamePhase::BeforeStartOfNextRound => Some(BEFORE_START_OF_NEXT_ROUND_FRAMES),
        }
    }
}

/// Menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Opponent {
    #[default]
    VsComputer,
    VsFriend,
}

/// Visibility flags written by the controller and pushed to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub intro: bool,
    pub menu: bool,
    pub game: bool,
    pub ready_message: bool,
    pub score_boards: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            intro: false,
            menu: false,
            game: false,
            ready_message: false,
            score_boards: true,
        }
    }
}

/// Play-style counters feeding the reward bonus (player 1 only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayStyle {
    pub power_hit_presses: u32,
    pub spikes: u32,
    pub slides: u32,
}

/// True when `score` wins against `other` under the deuce rule
#[inline]
pub fn is_winning_score(score: u32, other: u32, winning_score: u32) -> bool {
    score >= winning_score && score >= other + 2
}

/// Complete controller state
#[derive(Debug, Clone)]
pub struct GameSession {
    /// [0] player 1, [1] player 2
    pub scores: [u32; 2],
    pub winning_score: u32,
    pub phase: GamePhase,
    /// Frames since entering the current phase
    pub frame_counter: u32,
    /// Frames in the menu without a selection change
    pub no_input_frames: u32,
    pub is_player2_serve: bool,
    pub round_ended: bool,
    pub game_ended: bool,
    pub winner: Option<Side>,
    pub slow_motion: SlowMotion,
    pub slow_motion_frames: u32,
    /// Freezes tick processing while the result dialog is open
    pub paused: bool,
    pub is_score_submitted: bool,
    pub practice_mode: bool,
    pub stereo_sound: bool,
    /// Which sides the AI drives
    pub computer: [bool; 2],
    pub selected: Opponent,
    pub play_style: PlayStyle,
    /// Fade overlay alpha in [0, 1]
    pub black_alpha: f32,
    pub visibility: Visibility,
    /// Game-instance identity; deferred work is tagged with it
    pub generation: u64,
    pub schedule: Schedule,
    /// Real-time delay before the result dialog opens
    pub result_dialog_delay_ms: u64,
}

impl GameSession {
    /// Create a session in `Intro`
    pub fn new(settings: &Settings) -> Self {
        Self {
            scores: [0, 0],
            winning_score: settings.winning_score,
            phase: GamePhase::Intro,
            frame_counter: 0,
            no_input_frames: 0,
            is_player2_serve: false,
            round_ended: false,
            game_ended: false,
            winner: None,
            slow_motion: SlowMotion::new(settings.slow_motion_ratio()),
            slow_motion_frames: settings.slow_motion_frames,
            paused: false,
            is_score_submitted: false,
            practice_mode: settings.practice_mode,
            stereo_sound: settings.stereo_sound,
            computer: [true, true],
            selected: Opponent::VsComputer,
            play_style: PlayStyle::default(),
            black_alpha: 0.0,
            visibility: Visibility {
                score_boards: !settings.practice_mode,
                ..Default::default()
            },
            generation: 0,
            schedule: Schedule::new(),
            result_dialog_delay_ms: settings.result_dialog_delay_ms,
        }
    }

    /// Switch phase; the frame counter always restarts at 0
    pub fn transition(&mut self, next: GamePhase) {
        log::debug!(
            "{:?} -> {:?} (frame {})",
            self.phase,
            next,
            self.frame_counter
        );
        self.phase = next;
        self.frame_counter = 0;
    }

    /// Start a new game instance; pending work for older instances is dropped
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.schedule.cancel_stale(self.generation);
        self.generation
    }

    /// Back to the intro. Match fields survive until the next game starts.
    pub fn restart(&mut self) {
        self.frame_counter = 0;
        self.no_input_frames = 0;
        self.slow_motion.clear();
        self.visibility.menu = false;
        self.visibility.game = false;
        self.is_score_submitted = false;
        self.phase = GamePhase::Intro;
        self.next_generation();
        log::info!("Restarted (generation {})", self.generation);
    }

    /// Reset everything scoped to one match
    pub fn reset_match(&mut self) {
        self.scores = [0, 0];
        self.game_ended = false;
        self.round_ended = false;
        self.winner = None;
        self.is_player2_serve = false;
        self.play_style = PlayStyle::default();
    }

    /// Credit a rally to `scorer`. Returns true when that ends the game.
    pub fn award_point(&mut self, scorer: Side) -> bool {
        self.scores[scorer.index()] += 1;
        // the scorer serves the next rally
        self.is_player2_serve = scorer == Side::Player2;

        let score = self.scores[scorer.index()];
        let other = self.scores[scorer.opponent().index()];
        if is_winning_score(score, other, self.winning_score) {
            self.game_ended = true;
            self.winner = Some(scorer);
            log::info!(
                "Game over: {:?} wins {}-{}",
                scorer,
                self.scores[0],
                self.scores[1]
            );
            return true;
        }
        log::info!("Point {:?}: {}-{}", scorer, self.scores[0], self.scores[1]);
        false
    }

    /// Nudge the fade overlay, clamped to [0, 1]
    pub fn change_black_alpha_by(&mut self, delta: f32) {
        self.black_alpha = (self.black_alpha + delta).clamp(0.0, 1.0);
    }

    pub fn set_black_alpha(&mut self, alpha: f32) {
        self.black_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_practice_mode(&mut self, on: bool) {
        self.practice_mode = on;
        self.visibility.score_boards = !on;
    }
}
