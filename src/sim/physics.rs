//! Physics port
//!
//! Ball and player simulation lives outside this crate. Each step reports
//! what happened as a list of events instead of flags left on entities.

use super::input::PlayerInput;
use crate::Side;

/// Who emitted a sound cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueSource {
    Player(Side),
    Ball,
}

/// Transient cue raised by a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    PiPikachu,
    Pika,
    Chu,
    PowerHit,
    BallTouchesGround,
}

/// Something a physics step wants the controller to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    Sound { source: CueSource, kind: CueKind },
    /// A power hit that drove the ball down into the opponent's court
    Spike(Side),
    /// A diving slide
    Slide(Side),
}

/// Result of advancing physics by one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub ball_touched_ground: bool,
    pub events: Vec<PhysicsEvent>,
}

/// Ball/player simulation driven by the controller
pub trait Physics {
    /// Advance one frame
    fn step(&mut self, inputs: &[PlayerInput; 2]) -> StepOutcome;

    /// Horizontal position where the ball last landed (punch effect x)
    fn ball_landing_x(&self) -> i32;

    /// Which sides the AI drives
    fn set_computer_controlled(&mut self, computer: [bool; 2]);

    /// `None` clears the end-of-game flags on both players
    fn set_game_end(&mut self, winner: Option<Side>);

    /// Put players and ball in their serve positions
    fn initialize_for_new_round(&mut self, is_player2_serve: bool);
}
