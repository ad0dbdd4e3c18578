//! Audio output port
//!
//! The controller only decides *what* plays and *where* it is panned.
//! Playback itself belongs to the presentation layer.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Menu selection moved
    Pi,
    /// Menu selection committed
    Pikachu,
    /// Player cue: power-hit shout
    PiPikachu,
    /// Player cue: jump
    Pika,
    /// Player cue: dive
    Chu,
    /// Ball struck with a power hit
    PowerHit,
    /// Ball hit the ground
    BallTouchesGround,
}

/// Stereo placement of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pan {
    Left,
    #[default]
    Center,
    Right,
}

impl Pan {
    /// -1 / 0 / +1 as expected by most mixers
    pub fn as_f32(self) -> f32 {
        match self {
            Pan::Left => -1.0,
            Pan::Center => 0.0,
            Pan::Right => 1.0,
        }
    }
}

/// Implemented by whatever actually makes noise
pub trait Audio {
    /// Play a one-shot effect
    fn play(&mut self, _sound: Sound, _pan: Pan) {}

    /// Start background music from the top
    fn start_bgm(&mut self) {}

    fn stop_bgm(&mut self) {}
}

/// Audio sink that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl LogAudio {
    pub fn new() -> Self {
        Self
    }
}

impl Audio for LogAudio {
    fn play(&mut self, sound: Sound, pan: Pan) {
        log::trace!("play {:?} pan={}", sound, pan.as_f32());
    }

    fn start_bgm(&mut self) {
        log::trace!("bgm start");
    }

    fn stop_bgm(&mut self) {
        log::trace!("bgm stop");
    }
}
