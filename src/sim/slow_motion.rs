//! Slow-motion frame-skip scheduler
//!
//! After a scoring rally a fixed number of simulation frames is stretched over
//! more real ticks. Skipped ticks freeze the whole pipeline; live ticks run
//! normally, so physics sees exactly the same discrete frames.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlowMotion {
    frames_left: u32,
    skipped: u32,
    /// Real ticks per slow-motion frame
    ratio: u32,
}

impl SlowMotion {
    pub fn new(ratio: u32) -> Self {
        Self {
            frames_left: 0,
            skipped: 0,
            ratio: ratio.max(1),
        }
    }

    /// Start a window of `frames` slow frames
    pub fn arm(&mut self, frames: u32) {
        self.frames_left = frames;
        self.skipped = 0;
    }

    /// Called once per real tick. Returns true when the tick is live.
    pub fn gate(&mut self) -> bool {
        if self.frames_left == 0 {
            return true;
        }
        self.skipped += 1;
        if self.skipped % self.ratio != 0 {
            return false;
        }
        self.frames_left -= 1;
        self.skipped = 0;
        true
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    pub fn clear(&mut self) {
        self.frames_left = 0;
        self.skipped = 0;
    }
}
