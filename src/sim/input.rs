//! Keyboard snapshots
//!
//! The controller reads one frozen [`PlayerInput`] per player per live tick.

use std::collections::VecDeque;

use crate::Side;

/// Frozen read of one player's five logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInput {
    /// -1 left, 0 none, +1 right
    pub x_direction: i8,
    /// -1 up, 0 none, +1 down
    pub y_direction: i8,
    /// True only on the tick the power-hit button went down
    pub power_hit: bool,
}

impl PlayerInput {
    pub fn power_hit() -> Self {
        Self {
            power_hit: true,
            ..Default::default()
        }
    }

    pub fn up() -> Self {
        Self {
            y_direction: -1,
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self {
            y_direction: 1,
            ..Default::default()
        }
    }
}

/// Source of keyboard snapshots
pub trait Keyboard {
    /// Capture and freeze the current state for one player
    fn snapshot(&mut self, side: Side) -> PlayerInput;
}

/// Raw held state of the five buttons
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub power_hit: bool,
}

/// Turns held key state into a snapshot with an edge-triggered power hit
#[derive(Debug, Clone, Default)]
pub struct KeyLatch {
    power_hit_was_down: bool,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&mut self, held: HeldKeys) -> PlayerInput {
        let x_direction = axis(held.left, held.right);
        let y_direction = axis(held.up, held.down);
        let power_hit = held.power_hit && !self.power_hit_was_down;
        self.power_hit_was_down = held.power_hit;
        PlayerInput {
            x_direction,
            y_direction,
            power_hit,
        }
    }
}

fn axis(negative: bool, positive: bool) -> i8 {
    match (negative, positive) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}

/// Replays a fixed list of per-tick inputs, then idles
///
/// One entry is consumed per live tick (both players are read on a live
/// tick, player 1 first).
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeyboard {
    frames: VecDeque<[PlayerInput; 2]>,
    current: [PlayerInput; 2],
}

impl ScriptedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `count` ticks with no input
    pub fn idle(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.frames.push_back([PlayerInput::default(); 2]);
        }
        self
    }

    /// Queue one tick where `side` provides `input`
    pub fn press(&mut self, side: Side, input: PlayerInput) -> &mut Self {
        let mut frame = [PlayerInput::default(); 2];
        frame[side.index()] = input;
        self.frames.push_back(frame);
        self
    }

    /// Queue one tick with explicit input for both players
    pub fn frame(&mut self, inputs: [PlayerInput; 2]) -> &mut Self {
        self.frames.push_back(inputs);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Keyboard for ScriptedKeyboard {
    fn snapshot(&mut self, side: Side) -> PlayerInput {
        if side == Side::Player1 {
            self.current = self.frames.pop_front().unwrap_or_default();
        }
        self.current[side.index()]
    }
}
