//! Player 1 reward formula
//!
//! The reward is always computed from player 1's point of view; the win test
//! is `p1 > p2`.

use std::fmt;

use serde::Serialize;

use crate::settings::RewardFormula;
use crate::sim::PlayStyle;

/// Value submitted to the scoring service
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reward {
    /// Base formula, sent as an integer
    Points(u32),
    /// Base plus play-style bonus, already rounded to two decimals
    Rated(f64),
}

impl Reward {
    pub fn value(&self) -> f64 {
        match *self {
            Reward::Points(p) => p as f64,
            Reward::Rated(r) => r,
        }
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reward::Points(p) => write!(f, "{}", p),
            Reward::Rated(r) => write!(f, "{:.2}", r),
        }
    }
}

/// Score-based reward for player 1
pub fn base_reward(scores: [u32; 2], winning_score: u32) -> u32 {
    let [p1, p2] = scores;
    let deuce_threshold = winning_score.saturating_sub(1);
    let is_deuce = p1.min(p2) >= deuce_threshold;
    let won = p1 > p2;

    match (is_deuce, won) {
        (true, true) => winning_score + 1,
        (true, false) => winning_score,
        (false, true) => winning_score + 3,
        (false, false) => p1,
    }
}

/// Spikes per effective power hit, as a percentage
pub fn spike_ratio(play: &PlayStyle) -> f64 {
    let attempts = play.power_hit_presses as i64 - play.slides as i64;
    if attempts <= 0 {
        return 0.0;
    }
    play.spikes as f64 / attempts as f64 * 100.0
}

/// Round to two decimals, the precision shown to the player
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Base reward plus spike ratio. The rounded value is what gets submitted.
pub fn bonus_reward(scores: [u32; 2], winning_score: u32, play: &PlayStyle) -> f64 {
    round_to_cents(base_reward(scores, winning_score) as f64 + spike_ratio(play))
}

/// Reward for the configured formula
pub fn compute(
    formula: RewardFormula,
    scores: [u32; 2],
    winning_score: u32,
    play: &PlayStyle,
) -> Reward {
    match formula {
        RewardFormula::Base => Reward::Points(base_reward(scores, winning_score)),
        RewardFormula::PlayStyleBonus => Reward::Rated(bonus_reward(scores, winning_score, play)),
    }
}
