//! Score submission client
//!
//! The POST itself is blocking, so it runs on a worker thread and reports
//! back through a channel. The host polls [`PendingSubmission`] once per tick.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use serde::Serialize;

use super::SubmitError;
use crate::reward::Reward;
use crate::settings::Settings;

/// Longest user id accepted before hitting the network
pub const MAX_USER_ID_LEN: usize = 64;

/// JSON body posted to the result endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePayload {
    pub game_name: String,
    pub user_id: String,
    pub score: Reward,
}

/// Trim and sanity-check a user id typed into the dialog
pub fn validate_user_id(raw: &str) -> Result<String, SubmitError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(SubmitError::InvalidUserId("empty"));
    }
    if id.chars().count() > MAX_USER_ID_LEN {
        return Err(SubmitError::InvalidUserId("too long"));
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SubmitError::InvalidUserId("contains whitespace"));
    }
    Ok(id.to_string())
}

/// Delivers a payload to the scoring service
pub trait ScoreTransport: Send + Sync {
    fn post(&self, payload: &ScorePayload) -> Result<(), SubmitError>;
}

/// HTTPS transport with bearer-token auth
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    token: Option<String>,
}

impl HttpTransport {
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Self::TIMEOUT))
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.endpoint.clone(), settings.token.clone())
    }
}

impl ScoreTransport for HttpTransport {
    fn post(&self, payload: &ScorePayload) -> Result<(), SubmitError> {
        let token = self.token.as_deref().ok_or(SubmitError::MissingToken)?;
        let body = serde_json::to_string(payload)?;

        let result = self
            .agent
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .send(body);

        match result {
            Ok(response) if response.status().is_success() => {
                log::debug!("Score posted for {}", payload.user_id);
                Ok(())
            }
            Ok(response) => Err(SubmitError::Status(response.status().as_u16())),
            Err(ureq::Error::StatusCode(code)) => Err(SubmitError::Status(code)),
            Err(e) => Err(SubmitError::Network(e.to_string())),
        }
    }
}

/// Fires submissions without blocking the caller
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn ScoreTransport>,
    game_name: String,
}

impl SubmissionClient {
    pub fn new(transport: Arc<dyn ScoreTransport>, game_name: impl Into<String>) -> Self {
        Self {
            transport,
            game_name: game_name.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(HttpTransport::from_settings(settings)),
            settings.game_name.clone(),
        )
    }

    /// Start posting `score` for `user_id` on a worker thread
    pub fn submit(
        &self,
        user_id: String,
        score: Reward,
        generation: u64,
    ) -> Result<PendingSubmission, SubmitError> {
        let payload = ScorePayload {
            game_name: self.game_name.clone(),
            user_id,
            score,
        };
        let (tx, rx) = crossbeam_channel::bounded(1);
        let transport = Arc::clone(&self.transport);
        let worker_payload = payload.clone();

        thread::Builder::new()
            .name("score-submit".into())
            .spawn(move || {
                let result = transport.post(&worker_payload);
                // receiver gone means the session moved on
                let _ = tx.send(result);
            })
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        log::debug!("Submitting {} for {}", payload.score, payload.user_id);
        Ok(PendingSubmission {
            rx,
            generation,
            payload,
        })
    }
}

/// A submission in flight
pub struct PendingSubmission {
    rx: Receiver<Result<(), SubmitError>>,
    /// Game generation the submission belongs to
    pub generation: u64,
    pub payload: ScorePayload,
}

impl PendingSubmission {
    /// Non-blocking check for the outcome
    pub fn poll(&self) -> Option<Result<(), SubmitError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SubmitError::WorkerGone)),
        }
    }

    /// Block up to `timeout` for the outcome
    pub fn wait(&self, timeout: Duration) -> Option<Result<(), SubmitError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(SubmitError::WorkerGone)),
        }
    }
}
