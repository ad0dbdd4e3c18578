//! Fake collaborators shared by the unit tests

use std::time::Duration;

use super::input::{PlayerInput, ScriptedKeyboard};
use super::physics::{Physics, PhysicsEvent, StepOutcome};
use super::state::{GamePhase, GameSession, Opponent, Visibility};
use super::tick::{Ports, TickResult, tick};
use crate::Side;
use crate::audio::{Audio, Pan, Sound};
use crate::settings::Settings;
use crate::view::View;

/// Physics that only does what the test queued
#[derive(Debug, Default)]
pub struct FakePhysics {
    pub steps: u32,
    pub landing_x: i32,
    next_landing: Option<i32>,
    next_events: Vec<PhysicsEvent>,
    pub computer: [bool; 2],
    pub game_end: Option<Side>,
    pub game_end_calls: u32,
    /// `is_player2_serve` of every round initialization
    pub rounds: Vec<bool>,
}

impl FakePhysics {
    /// The next step reports a ground touch at `x`
    pub fn land_next(&mut self, x: i32) {
        self.next_landing = Some(x);
    }

    pub fn emit_next(&mut self, events: Vec<PhysicsEvent>) {
        self.next_events = events;
    }
}

impl Physics for FakePhysics {
    fn step(&mut self, _inputs: &[PlayerInput; 2]) -> StepOutcome {
        self.steps += 1;
        let ball_touched_ground = match self.next_landing.take() {
            Some(x) => {
                self.landing_x = x;
                true
            }
            None => false,
        };
        StepOutcome {
            ball_touched_ground,
            events: std::mem::take(&mut self.next_events),
        }
    }

    fn ball_landing_x(&self) -> i32 {
        self.landing_x
    }

    fn set_computer_controlled(&mut self, computer: [bool; 2]) {
        self.computer = computer;
    }

    fn set_game_end(&mut self, winner: Option<Side>) {
        self.game_end = winner;
        self.game_end_calls += 1;
    }

    fn initialize_for_new_round(&mut self, is_player2_serve: bool) {
        self.rounds.push(is_player2_serve);
    }
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<(Sound, Pan)>,
    pub bgm: bool,
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: Sound, pan: Pan) {
        self.played.push((sound, pan));
    }

    fn start_bgm(&mut self) {
        self.bgm = true;
    }

    fn stop_bgm(&mut self) {
        self.bgm = false;
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub visibility: Option<Visibility>,
    pub alpha: f32,
    pub scores: Vec<[u32; 2]>,
    pub selected: Vec<Opponent>,
    pub game_end_frames: u32,
}

impl View for RecordingView {
    fn apply_visibility(&mut self, visibility: &Visibility) {
        self.visibility = Some(*visibility);
    }

    fn set_black_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn select_opponent(&mut self, opponent: Opponent) {
        self.selected.push(opponent);
    }

    fn draw_scores(&mut self, scores: [u32; 2]) {
        self.scores.push(scores);
    }

    fn draw_game_end_message(&mut self, _frame: u32) {
        self.game_end_frames += 1;
    }
}

/// Session plus fakes, ticked at 25 Hz of simulated time
pub struct Rig {
    pub session: GameSession,
    pub physics: FakePhysics,
    pub view: RecordingView,
    pub audio: RecordingAudio,
    pub keyboard: ScriptedKeyboard,
    pub now: Duration,
}

impl Rig {
    pub const TICK: Duration = Duration::from_millis(40);

    pub fn new(settings: Settings) -> Self {
        Self {
            session: GameSession::new(&settings),
            physics: FakePhysics::default(),
            view: RecordingView::default(),
            audio: RecordingAudio::default(),
            keyboard: ScriptedKeyboard::new(),
            now: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) -> TickResult {
        self.now += Self::TICK;
        let mut ports = Ports {
            physics: &mut self.physics,
            view: &mut self.view,
            audio: &mut self.audio,
            keyboard: &mut self.keyboard,
        };
        tick(&mut self.session, &mut ports, self.now)
    }

    pub fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn press(&mut self, side: Side, input: PlayerInput) -> TickResult {
        self.keyboard.press(side, input);
        self.tick()
    }

    /// Intro -> Menu -> commit with `side`'s power hit -> fade -> new game -> Round
    pub fn enter_round(&mut self, side: Side) {
        self.press(side, PlayerInput::power_hit());
        assert_eq!(self.session.phase, GamePhase::Menu);
        self.press(side, PlayerInput::power_hit());
        self.press(side, PlayerInput::power_hit());
        assert_eq!(self.session.phase, GamePhase::AfterMenuSelection);
        self.ticks(15 + 15 + 71);
        assert_eq!(self.session.phase, GamePhase::Round);
    }
}
