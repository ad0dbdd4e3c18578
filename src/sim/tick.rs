//! Frame-driven phase machine
//!
//! One call to [`tick`] per host clock tick. Everything is counted in frames
//! except the deferred result dialog, which is scheduled by wall-clock time.

use std::time::Duration;

use super::input::{Keyboard, PlayerInput};
use super::physics::{CueKind, CueSource, Physics, PhysicsEvent};
use super::schedule::Deferred;
use super::state::{GamePhase, GameSession, Opponent};
use crate::Side;
use crate::audio::{Audio, Pan, Sound};
use crate::consts::*;
use crate::view::View;

/// Collaborators the controller talks to during a tick
pub struct Ports<'a> {
    pub physics: &'a mut dyn Physics,
    pub view: &'a mut dyn View,
    pub audio: &'a mut dyn Audio,
    pub keyboard: &'a mut dyn Keyboard,
}

/// What happened to a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Session paused, nothing touched
    Paused,
    /// Swallowed by slow motion
    Skipped,
    /// Keyboard captured and a phase handler ran
    Live,
}

/// Advance the controller by one host tick
pub fn tick(session: &mut GameSession, ports: &mut Ports<'_>, now: Duration) -> TickResult {
    if session.paused {
        return TickResult::Paused;
    }
    if !session.slow_motion.gate() {
        return TickResult::Skipped;
    }

    // catch keyboard input and freeze it
    let input = [
        ports.keyboard.snapshot(Side::Player1),
        ports.keyboard.snapshot(Side::Player2),
    ];

    match session.phase {
        GamePhase::Intro => intro(session, ports, &input),
        GamePhase::Menu => menu(session, ports, &input),
        GamePhase::AfterMenuSelection => after_menu_selection(session),
        GamePhase::BeforeStartOfNewGame => before_start_of_new_game(session),
        GamePhase::StartOfNewGame => start_of_new_game(session, ports),
        GamePhase::Round => round(session, ports, &input, now),
        GamePhase::AfterEndOfRound => after_end_of_round(session),
        GamePhase::BeforeStartOfNextRound => before_start_of_next_round(session, ports),
    }

    ports.view.apply_visibility(&session.visibility);
    ports.view.set_black_alpha(session.black_alpha);
    TickResult::Live
}

fn any_power_hit(input: &[PlayerInput; 2]) -> bool {
    input[0].power_hit || input[1].power_hit
}

fn intro(s: &mut GameSession, ports: &mut Ports<'_>, input: &[PlayerInput; 2]) {
    if s.frame_counter == 0 {
        s.visibility.intro = true;
        s.set_black_alpha(0.0);
        ports.audio.stop_bgm();
    }
    ports.view.draw_intro_mark(s.frame_counter);
    s.frame_counter += 1;

    if any_power_hit(input) || s.frame_counter >= INTRO_FRAMES {
        s.visibility.intro = false;
        s.transition(GamePhase::Menu);
    }
}

fn menu(s: &mut GameSession, ports: &mut Ports<'_>, input: &[PlayerInput; 2]) {
    if s.frame_counter == 0 {
        s.visibility.menu = true;
        s.set_black_alpha(0.0);
        s.selected = Opponent::VsComputer;
        ports.view.select_opponent(s.selected);
    }
    ports.view.draw_menu(s.frame_counter);
    s.frame_counter += 1;

    let pressed = any_power_hit(input);
    if s.frame_counter < MENU_DWELL_FRAMES && pressed {
        // skip the rest of the menu animation
        s.frame_counter = MENU_DWELL_FRAMES;
        return;
    }
    if s.frame_counter <= MENU_DWELL_FRAMES {
        return;
    }

    let up = input.iter().any(|i| i.y_direction == -1);
    let down = input.iter().any(|i| i.y_direction == 1);
    if up && s.selected == Opponent::VsFriend {
        s.no_input_frames = 0;
        s.selected = Opponent::VsComputer;
        ports.view.select_opponent(s.selected);
        ports.audio.play(Sound::Pi, Pan::Center);
    } else if down && s.selected == Opponent::VsComputer {
        s.no_input_frames = 0;
        s.selected = Opponent::VsFriend;
        ports.view.select_opponent(s.selected);
        ports.audio.play(Sound::Pi, Pan::Center);
    } else {
        // auto AI after MENU_NO_INPUT_FRAMES is intentionally not wired up
        s.no_input_frames += 1;
    }

    if pressed {
        s.computer = match s.selected {
            Opponent::VsFriend => [false, false],
            Opponent::VsComputer if input[0].power_hit => [false, true],
            Opponent::VsComputer => [true, false],
        };
        ports.physics.set_computer_controlled(s.computer);
        ports.audio.play(Sound::Pikachu, Pan::Center);
        log::info!("Menu: {:?}, computer sides {:?}", s.selected, s.computer);
        s.no_input_frames = 0;
        s.transition(GamePhase::AfterMenuSelection);
    }
}

fn after_menu_selection(s: &mut GameSession) {
    s.change_black_alpha_by(FADE_STEP);
    s.frame_counter += 1;
    if s.frame_counter >= AFTER_MENU_SELECTION_FRAMES {
        s.transition(GamePhase::BeforeStartOfNewGame);
    }
}

fn before_start_of_new_game(s: &mut GameSession) {
    s.frame_counter += 1;
    if s.frame_counter >= BEFORE_START_OF_NEW_GAME_FRAMES {
        s.visibility.menu = false;
        s.transition(GamePhase::StartOfNewGame);
    }
}

fn start_of_new_game(s: &mut GameSession, ports: &mut Ports<'_>) {
    if s.frame_counter == 0 {
        s.visibility.game = true;
        s.reset_match();
        let generation = s.next_generation();
        log::info!("New game (generation {})", generation);

        ports.physics.set_game_end(None);
        ports.view.draw_scores(s.scores);
        ports.physics.initialize_for_new_round(s.is_player2_serve);
        ports.view.draw_players_and_ball();

        s.set_black_alpha(1.0);
        ports.audio.start_bgm();
    }

    ports
        .view
        .draw_game_start_message(s.frame_counter, START_OF_NEW_GAME_FRAMES);
    ports.view.draw_clouds_and_wave();
    s.change_black_alpha_by(-GAME_START_FADE_STEP);
    s.frame_counter += 1;

    if s.frame_counter >= START_OF_NEW_GAME_FRAMES {
        s.set_black_alpha(0.0);
        s.transition(GamePhase::Round);
    }
}

fn round(s: &mut GameSession, ports: &mut Ports<'_>, input: &[PlayerInput; 2], now: Duration) {
    let pressed = any_power_hit(input);

    // demo mode: any power hit returns to the title
    if s.computer[0] && s.computer[1] && pressed {
        s.slow_motion.clear();
        s.visibility.game = false;
        s.transition(GamePhase::Intro);
        return;
    }

    let outcome = ports.physics.step(input);
    if !s.game_ended && input[0].power_hit {
        s.play_style.power_hit_presses += 1;
    }
    dispatch_events(s, ports, &outcome.events);
    ports.view.draw_players_and_ball();
    ports.view.draw_clouds_and_wave();

    if s.game_ended {
        ports.view.draw_game_end_message(s.frame_counter);
        s.frame_counter += 1;
        if s.frame_counter >= GAME_END_FRAMES
            || (s.frame_counter >= GAME_END_SKIPPABLE_AFTER && pressed)
        {
            s.visibility.game = false;
            s.transition(GamePhase::Intro);
        }
        return;
    }

    if outcome.ball_touched_ground && !s.practice_mode && !s.round_ended {
        let scorer = if ports.physics.ball_landing_x() < GROUND_HALF_WIDTH {
            Side::Player2
        } else {
            Side::Player1
        };
        let game_over = s.award_point(scorer);
        if game_over {
            ports.physics.set_game_end(s.winner);
        }
        ports.view.draw_scores(s.scores);

        if game_over && !s.is_score_submitted {
            let due = now + Duration::from_millis(s.result_dialog_delay_ms);
            s.schedule
                .schedule(due, s.generation, Deferred::OpenResultDialog);
        }
        if !game_over {
            s.slow_motion.arm(s.slow_motion_frames);
        }
        s.round_ended = true;
    }

    if s.round_ended && !s.game_ended && !s.slow_motion.is_active() {
        s.change_black_alpha_by(FADE_STEP);
        s.transition(GamePhase::AfterEndOfRound);
    }
}

fn after_end_of_round(s: &mut GameSession) {
    s.change_black_alpha_by(FADE_STEP);
    s.frame_counter += 1;
    if s.frame_counter >= AFTER_END_OF_ROUND_FRAMES {
        s.transition(GamePhase::BeforeStartOfNextRound);
    }
}

fn before_start_of_next_round(s: &mut GameSession, ports: &mut Ports<'_>) {
    if s.frame_counter == 0 {
        s.set_black_alpha(1.0);
        s.visibility.ready_message = false;
        ports.physics.initialize_for_new_round(s.is_player2_serve);
        ports.view.draw_players_and_ball();
    }

    ports.view.draw_clouds_and_wave();
    s.change_black_alpha_by(-FADE_STEP);

    s.frame_counter += 1;
    if s.frame_counter % READY_BLINK_PERIOD == 0 {
        s.visibility.ready_message = !s.visibility.ready_message;
    }

    if s.frame_counter >= BEFORE_START_OF_NEXT_ROUND_FRAMES {
        s.visibility.ready_message = false;
        s.set_black_alpha(0.0);
        s.round_ended = false;
        s.transition(GamePhase::Round);
    }
}

/// Route physics events: cues to audio, play-style events to the counters
fn dispatch_events(s: &mut GameSession, ports: &mut Ports<'_>, events: &[PhysicsEvent]) {
    for event in events {
        match *event {
            PhysicsEvent::Sound { source, kind } => {
                let pan = cue_pan(s, source, ports.physics.ball_landing_x());
                ports.audio.play(cue_sound(kind), pan);
            }
            PhysicsEvent::Spike(Side::Player1) if !s.game_ended => s.play_style.spikes += 1,
            PhysicsEvent::Slide(Side::Player1) if !s.game_ended => s.play_style.slides += 1,
            PhysicsEvent::Spike(_) | PhysicsEvent::Slide(_) => {}
        }
    }
}

fn cue_pan(s: &GameSession, source: CueSource, ball_x: i32) -> Pan {
    if !s.stereo_sound {
        return Pan::Center;
    }
    match source {
        CueSource::Player(Side::Player1) => Pan::Left,
        CueSource::Player(Side::Player2) => Pan::Right,
        CueSource::Ball => match ball_x.cmp(&GROUND_HALF_WIDTH) {
            std::cmp::Ordering::Less => Pan::Left,
            std::cmp::Ordering::Equal => Pan::Center,
            std::cmp::Ordering::Greater => Pan::Right,
        },
    }
}

fn cue_sound(kind: CueKind) -> Sound {
    match kind {
        CueKind::PiPikachu => Sound::PiPikachu,
        CueKind::Pika => Sound::Pika,
        CueKind::Chu => Sound::Chu,
        CueKind::PowerHit => Sound::PowerHit,
        CueKind::BallTouchesGround => Sound::BallTouchesGround,
    }
}
