//! Deterministic controller module
//!
//! All phase and scoring logic lives here. This module must stay
//! deterministic:
//! - Behaviour is specified in frames, never in wall-clock time
//! - The only wall-clock work is deferred through [`Schedule`]
//! - No rendering, audio or network dependencies (only the port traits)

pub mod input;
pub mod physics;
pub mod schedule;
pub mod slow_motion;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use input::{HeldKeys, KeyLatch, Keyboard, PlayerInput, ScriptedKeyboard};
pub use physics::{CueKind, CueSource, Physics, PhysicsEvent, StepOutcome};
pub use schedule::{Deferred, Schedule, ScheduledTask};
pub use slow_motion::SlowMotion;
pub use state::{GamePhase, GameSession, Opponent, PlayStyle, Visibility, is_winning_score};
pub use tick::{Ports, TickResult, tick};
