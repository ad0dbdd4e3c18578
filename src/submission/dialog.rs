//! End-of-game result dialog state

use crate::reward::Reward;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogStatus {
    #[default]
    Closed,
    /// Waiting for the player to enter an id
    Prompting,
    Submitting,
    /// Last attempt failed; the player may retry
    Failed(String),
    /// Failed in a way retrying cannot fix; only a restart leaves this
    Unavailable(String),
    /// Server accepted the result
    Confirmed,
}

/// The dialog shown after a game ends
///
/// The reward is fixed when the dialog opens so retries resubmit the same
/// value.
#[derive(Debug, Clone, Default)]
pub struct ResultDialog {
    status: DialogStatus,
    reward: Option<Reward>,
    generation: u64,
}

impl ResultDialog {
    pub fn open(&mut self, reward: Reward, generation: u64) {
        self.status = DialogStatus::Prompting;
        self.reward = Some(reward);
        self.generation = generation;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.status != DialogStatus::Closed
    }

    /// Accepts input only while prompting or after a failure
    pub fn accepts_input(&self) -> bool {
        matches!(self.status, DialogStatus::Prompting | DialogStatus::Failed(_))
    }

    pub fn begin_submit(&mut self) {
        self.status = DialogStatus::Submitting;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DialogStatus::Failed(message.into());
    }

    pub fn abandon(&mut self, message: impl Into<String>) {
        self.status = DialogStatus::Unavailable(message.into());
    }

    pub fn confirm(&mut self) {
        self.status = DialogStatus::Confirmed;
    }

    pub fn status(&self) -> &DialogStatus {
        &self.status
    }

    pub fn reward(&self) -> Option<Reward> {
        self.reward
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
