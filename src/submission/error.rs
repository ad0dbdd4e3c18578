use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(&'static str),

    #[error("No bearer token configured")]
    MissingToken,

    #[error("Server rejected result: HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Submission worker stopped before replying")]
    WorkerGone,

    #[error("A submission is already in progress")]
    Busy,

    #[error("Result dialog is not open")]
    DialogClosed,

    #[error("Result can no longer be submitted; restart to play again")]
    Abandoned,
}

impl SubmitError {
    /// Whether the player can fix this from the dialog by trying again
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::InvalidUserId(_) => true,
            SubmitError::Status(_) => true,
            SubmitError::Network(_) => true,
            SubmitError::WorkerGone => true,
            SubmitError::Busy => true,
            SubmitError::MissingToken => false,
            SubmitError::Encode(_) => false,
            SubmitError::DialogClosed => false,
            SubmitError::Abandoned => false,
        }
    }
}
