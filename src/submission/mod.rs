//! Result dialog and score submission
//!
//! Features:
//! - JSON payload with bearer-token auth
//! - Worker-thread POST so ticks never stall
//! - Retry with a corrected user id, reusing the reward computed at open

pub mod client;
pub mod dialog;
mod error;

pub use client::{
    HttpTransport, PendingSubmission, ScorePayload, ScoreTransport, SubmissionClient,
    validate_user_id,
};
pub use dialog::{DialogStatus, ResultDialog};
pub use error::SubmitError;
