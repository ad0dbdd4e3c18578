//! Pika Volley headless runner
//!
//! Plays one scripted match against seeded demo physics at simulated 25 Hz,
//! then opens the result dialog and (when credentials are present) submits
//! player 1's reward.
//!
//! Usage: `pika-volley [settings.json]`
//! Environment: `URL_TOKEN`, `PIKA_USER_ID`, `PIKA_SEED`, `PIKA_REWARD`.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pika_volley::audio::LogAudio;
use pika_volley::consts::GROUND_HALF_WIDTH;
use pika_volley::sim::{
    CueKind, CueSource, Physics, PhysicsEvent, PlayerInput, ScriptedKeyboard, StepOutcome,
};
use pika_volley::submission::SubmissionClient;
use pika_volley::view::NullView;
use pika_volley::{Game, RewardFormula, Settings, SettingsError, Side};

/// Upper bound on simulated ticks before giving up on the match
const MAX_TICKS: u32 = 200_000;
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Stand-in physics: rallies of random length landing on a random side
struct DemoPhysics {
    rng: Pcg32,
    frames_until_landing: u32,
    landing_x: i32,
    computer: [bool; 2],
}

impl DemoPhysics {
    fn new(seed: u64) -> Self {
        let mut physics = Self {
            rng: Pcg32::seed_from_u64(seed),
            frames_until_landing: 0,
            landing_x: GROUND_HALF_WIDTH,
            computer: [true, true],
        };
        physics.initialize_for_new_round(false);
        physics
    }
}

impl Physics for DemoPhysics {
    fn step(&mut self, inputs: &[PlayerInput; 2]) -> StepOutcome {
        let mut events = Vec::new();
        for side in Side::BOTH {
            if inputs[side.index()].power_hit {
                events.push(PhysicsEvent::Sound {
                    source: CueSource::Player(side),
                    kind: CueKind::PiPikachu,
                });
            }
        }

        if self.frames_until_landing == 0 {
            return StepOutcome {
                ball_touched_ground: false,
                events,
            };
        }
        self.frames_until_landing -= 1;
        if self.frames_until_landing > 0 {
            return StepOutcome {
                ball_touched_ground: false,
                events,
            };
        }

        self.landing_x = self.rng.random_range(0..GROUND_HALF_WIDTH * 2);
        events.push(PhysicsEvent::Sound {
            source: CueSource::Ball,
            kind: CueKind::BallTouchesGround,
        });
        StepOutcome {
            ball_touched_ground: true,
            events,
        }
    }

    fn ball_landing_x(&self) -> i32 {
        self.landing_x
    }

    fn set_computer_controlled(&mut self, computer: [bool; 2]) {
        self.computer = computer;
    }

    fn set_game_end(&mut self, winner: Option<Side>) {
        if let Some(winner) = winner {
            log::debug!("Physics: {:?} celebrates", winner);
        }
    }

    fn initialize_for_new_round(&mut self, is_player2_serve: bool) {
        self.frames_until_landing = self.rng.random_range(40..200);
        log::debug!(
            "Serve: {:?}, rally lasts {} frames",
            if is_player2_serve { Side::Player2 } else { Side::Player1 },
            self.frames_until_landing
        );
    }
}

fn load_settings() -> Result<Settings, SettingsError> {
    let mut settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(formula) = std::env::var("PIKA_REWARD")
        .ok()
        .and_then(|s| RewardFormula::from_str(&s))
    {
        settings.reward_formula = formula;
    }
    settings.validate()?;
    Ok(settings.with_env_token())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pika Volley (headless) starting...");

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    let seed = std::env::var("PIKA_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed_u64);

    // skip intro, skip menu animation, player 1 picks "vs computer"
    let mut keyboard = ScriptedKeyboard::new();
    for _ in 0..3 {
        keyboard.press(Side::Player1, PlayerInput::power_hit());
    }

    let client = SubmissionClient::from_settings(&settings);
    let mut game = Game::new(
        &settings,
        DemoPhysics::new(seed),
        NullView,
        LogAudio::new(),
        keyboard,
        client,
    );

    let frame = Duration::from_secs(1) / settings.normal_fps;
    let mut now = Duration::ZERO;
    for _ in 0..MAX_TICKS {
        now += frame;
        game.tick(now);
        if game.dialog().is_open() {
            break;
        }
    }

    let Some(reward) = game.dialog().reward() else {
        log::warn!("Match did not finish within {} ticks", MAX_TICKS);
        return;
    };
    let [p1, p2] = game.session.scores;
    log::info!("Final score {}-{}, player 1 reward {}", p1, p2, reward);

    let user_id = match std::env::var("PIKA_USER_ID") {
        Ok(id) if settings.token.is_some() => id,
        _ => {
            log::info!("Set {} and PIKA_USER_ID to submit", Settings::TOKEN_ENV);
            return;
        }
    };

    if let Err(e) = game.submit_result(&user_id) {
        log::error!("Could not submit: {}", e);
        std::process::exit(1);
    }
    match game.await_submission(SUBMIT_TIMEOUT) {
        Some(true) => log::info!("Result accepted"),
        Some(false) => {
            log::error!("Result rejected: {:?}", game.dialog().status());
            std::process::exit(1);
        }
        None => {
            log::error!("No reply within {:?}", SUBMIT_TIMEOUT);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // the browser host drives `Game::tick` itself
}
