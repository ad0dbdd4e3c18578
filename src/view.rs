//! View output port
//!
//! Draw calls are keyed by phase and frame counter. The controller never
//! reads anything back from the view.

use crate::sim::{Opponent, Visibility};

/// Implemented by the renderer. Every method defaults to a no-op so a
/// headless host only overrides what it cares about.
pub trait View {
    /// Push the controller-owned visibility flags
    fn apply_visibility(&mut self, _visibility: &Visibility) {}

    /// Alpha of the black fade overlay (0 = clear, 1 = black)
    fn set_black_alpha(&mut self, _alpha: f32) {}

    fn draw_intro_mark(&mut self, _frame: u32) {}

    /// Fight message, logos, sitting tiles and with-who prompts
    fn draw_menu(&mut self, _frame: u32) {}

    fn select_opponent(&mut self, _opponent: Opponent) {}

    fn draw_scores(&mut self, _scores: [u32; 2]) {}

    fn draw_players_and_ball(&mut self) {}

    fn draw_clouds_and_wave(&mut self) {}

    fn draw_game_start_message(&mut self, _frame: u32, _total: u32) {}

    fn draw_game_end_message(&mut self, _frame: u32) {}
}

/// View that renders nothing (headless runs and tests)
#[derive(Debug, Default)]
pub struct NullView;

impl View for NullView {}
