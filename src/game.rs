//! Host-facing game facade
//!
//! Owns the session and its collaborators, drains deferred tasks and the
//! in-flight submission before every tick, and exposes the result dialog
//! operations to the UI.

use std::time::Duration;

use crate::audio::Audio;
use crate::reward;
use crate::settings::{RewardFormula, Settings};
use crate::sim::{
    Deferred, GameSession, Keyboard, Physics, Ports, ScheduledTask, TickResult, tick,
};
use crate::submission::{
    DialogStatus, PendingSubmission, ResultDialog, SubmissionClient, SubmitError,
    validate_user_id,
};
use crate::view::View;

pub struct Game<P, V, A, K> {
    pub session: GameSession,
    pub physics: P,
    pub view: V,
    pub audio: A,
    pub keyboard: K,
    reward_formula: RewardFormula,
    restart_delay: Duration,
    client: SubmissionClient,
    dialog: ResultDialog,
    pending: Option<PendingSubmission>,
    now: Duration,
}

impl<P: Physics, V: View, A: Audio, K: Keyboard> Game<P, V, A, K> {
    pub fn new(
        settings: &Settings,
        mut physics: P,
        mut view: V,
        audio: A,
        keyboard: K,
        client: SubmissionClient,
    ) -> Self {
        let session = GameSession::new(settings);
        physics.set_computer_controlled(session.computer);
        view.apply_visibility(&session.visibility);
        Self {
            session,
            physics,
            view,
            audio,
            keyboard,
            reward_formula: settings.reward_formula,
            restart_delay: Duration::from_millis(settings.restart_delay_ms),
            client,
            dialog: ResultDialog::default(),
            pending: None,
            now: Duration::ZERO,
        }
    }

    /// One host clock tick at monotonic time `now`
    pub fn tick(&mut self, now: Duration) -> TickResult {
        self.now = now;
        self.poll_submission();
        self.run_due_tasks(now);

        let mut ports = Ports {
            physics: &mut self.physics,
            view: &mut self.view,
            audio: &mut self.audio,
            keyboard: &mut self.keyboard,
        };
        tick(&mut self.session, &mut ports, now)
    }

    pub fn dialog(&self) -> &ResultDialog {
        &self.dialog
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Submit the dialog's reward for `user_id`
    ///
    /// Returns once the request is in flight; the outcome is applied on a
    /// later tick. Invalid ids leave the dialog in its retry state.
    pub fn submit_result(&mut self, user_id: &str) -> Result<(), SubmitError> {
        if !self.dialog.is_open() {
            return Err(SubmitError::DialogClosed);
        }
        if matches!(self.dialog.status(), DialogStatus::Unavailable(_)) {
            return Err(SubmitError::Abandoned);
        }
        if self.pending.is_some() || !self.dialog.accepts_input() {
            return Err(SubmitError::Busy);
        }
        let Some(score) = self.dialog.reward() else {
            return Err(SubmitError::DialogClosed);
        };

        let user_id = match validate_user_id(user_id) {
            Ok(id) => id,
            Err(e) => {
                self.record_failure(&e);
                return Err(e);
            }
        };

        self.dialog.begin_submit();
        match self
            .client
            .submit(user_id, score, self.dialog.generation())
        {
            Ok(pending) => {
                self.pending = Some(pending);
                Ok(())
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Block up to `timeout` for the in-flight submission (headless hosts)
    ///
    /// Returns `Some(true)` on success, `Some(false)` on failure, `None` if
    /// nothing was applied.
    pub fn await_submission(&mut self, timeout: Duration) -> Option<bool> {
        let result = self.pending.as_ref()?.wait(timeout)?;
        let pending = self.pending.take()?;
        self.apply_submission(pending, result)
    }

    /// Back to the intro, dropping any dialog or in-flight submission
    pub fn restart(&mut self) {
        self.dialog.close();
        self.pending = None;
        self.session.paused = false;
        self.session.restart();
    }

    pub fn set_practice_mode(&mut self, on: bool) {
        self.session.set_practice_mode(on);
        self.view.apply_visibility(&self.session.visibility);
    }

    fn poll_submission(&mut self) {
        let Some(result) = self.pending.as_ref().and_then(|p| p.poll()) else {
            return;
        };
        if let Some(pending) = self.pending.take() {
            self.apply_submission(pending, result);
        }
    }

    fn apply_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<(), SubmitError>,
    ) -> Option<bool> {
        if pending.generation != self.session.generation {
            log::debug!(
                "Dropping submission reply for generation {} (now {})",
                pending.generation,
                self.session.generation
            );
            return None;
        }

        match result {
            Ok(()) => {
                log::info!(
                    "Result {} accepted for {}",
                    pending.payload.score,
                    pending.payload.user_id
                );
                self.session.is_score_submitted = true;
                self.dialog.confirm();
                self.session.schedule.schedule(
                    self.now + self.restart_delay,
                    self.session.generation,
                    Deferred::RestartAfterSubmit,
                );
                Some(true)
            }
            Err(e) => {
                self.record_failure(&e);
                Some(false)
            }
        }
    }

    fn record_failure(&mut self, e: &SubmitError) {
        if e.is_retryable() {
            log::warn!("Score submission failed: {}", e);
            self.dialog.fail(e.to_string());
        } else {
            log::error!("Score submission unavailable: {}", e);
            self.dialog.abandon(e.to_string());
        }
    }

    fn run_due_tasks(&mut self, now: Duration) {
        for task in self.session.schedule.take_due(now) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if task.generation != self.session.generation {
            log::debug!("Skipping stale {:?}", task.action);
            return;
        }
        match task.action {
            Deferred::OpenResultDialog => {
                if self.session.is_score_submitted || self.dialog.is_open() {
                    return;
                }
                self.open_result_dialog();
            }
            Deferred::RestartAfterSubmit => self.restart(),
        }
    }

    fn open_result_dialog(&mut self) {
        let s = &self.session;
        let reward = reward::compute(self.reward_formula, s.scores, s.winning_score, &s.play_style);
        log::info!("Result dialog: player 1 reward {}", reward);
        self.dialog.open(reward, s.generation);
        self.session.paused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use crate::audio::LogAudio;
    use crate::consts::*;
    use crate::reward::Reward;
    use crate::sim::testing::FakePhysics;
    use crate::sim::{GamePhase, PlayerInput, ScriptedKeyboard};
    use crate::submission::{ScorePayload, ScoreTransport};
    use crate::view::NullView;
    use crossbeam_channel::{Receiver, Sender};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<Result<(), SubmitError>>>,
        posted: Mutex<Vec<ScorePayload>>,
    }

    impl FakeTransport {
        fn with(responses: Vec<Result<(), SubmitError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                posted: Mutex::default(),
            })
        }
    }

    impl ScoreTransport for FakeTransport {
        fn post(&self, payload: &ScorePayload) -> Result<(), SubmitError> {
            self.posted.lock().unwrap().push(payload.clone());
            self.responses.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    /// Holds every request until the test releases it
    struct GatedTransport {
        release: Receiver<Result<(), SubmitError>>,
    }

    impl GatedTransport {
        fn new() -> (Arc<Self>, Sender<Result<(), SubmitError>>) {
            let (tx, rx) = crossbeam_channel::unbounded();
            (Arc::new(Self { release: rx }), tx)
        }
    }

    impl ScoreTransport for GatedTransport {
        fn post(&self, _payload: &ScorePayload) -> Result<(), SubmitError> {
            self.release.recv().unwrap_or(Err(SubmitError::WorkerGone))
        }
    }

    type TestGame = Game<FakePhysics, NullView, LogAudio, ScriptedKeyboard>;

    struct Harness {
        game: TestGame,
        now: Duration,
    }

    impl Harness {
        fn new(transport: Arc<dyn ScoreTransport>, settings: Settings) -> Self {
            let client = SubmissionClient::new(transport, "pikachu-volley");
            let game = Game::new(
                &settings,
                FakePhysics::default(),
                NullView,
                LogAudio::new(),
                ScriptedKeyboard::new(),
                client,
            );
            Self {
                game,
                now: Duration::ZERO,
            }
        }

        fn tick(&mut self) -> TickResult {
            self.now += Duration::from_millis(40);
            self.game.tick(self.now)
        }

        fn ticks(&mut self, n: u32) {
            for _ in 0..n {
                self.tick();
            }
        }

        /// Play from the intro until player 1 has won 5-0
        fn win_game(&mut self) {
            for _ in 0..3 {
                self.game.keyboard.press(Side::Player1, PlayerInput::power_hit());
            }
            self.ticks(3 + 15 + 15 + 71);
            assert_eq!(self.game.session.phase, GamePhase::Round);

            self.game.session.scores = [4, 0];
            self.game.physics.land_next(400);
            self.tick();
            assert!(self.game.session.game_ended);
        }

        /// Advance real time past the dialog delay
        fn wait_for_dialog(&mut self) {
            self.ticks((RESULT_DIALOG_DELAY_MS / 40) as u32 + 1);
        }
    }

    fn settings() -> Settings {
        Settings {
            winning_score: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_dialog_opens_after_real_time_delay() {
        let mut h = Harness::new(FakeTransport::with(vec![]), settings());
        h.win_game();
        let ended_at = h.now;

        while h.now + Duration::from_millis(40) < ended_at + Duration::from_millis(RESULT_DIALOG_DELAY_MS) {
            h.tick();
            assert!(!h.game.dialog().is_open());
        }
        h.tick();
        assert!(h.game.dialog().is_open());
        assert!(h.game.session.paused);
        assert_eq!(h.game.dialog().reward(), Some(Reward::Points(8)));

        // paused: frames stop advancing
        let frame = h.game.session.frame_counter;
        assert_eq!(h.tick(), TickResult::Paused);
        assert_eq!(h.game.session.frame_counter, frame);
    }

    #[test]
    fn test_failed_submission_retries_with_same_score() {
        let transport = FakeTransport::with(vec![Err(SubmitError::Status(500)), Ok(())]);
        let mut h = Harness::new(transport.clone(), settings());
        h.win_game();
        h.wait_for_dialog();

        h.game.submit_result("ahs").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(false));
        assert!(!h.game.session.is_score_submitted);
        assert!(matches!(h.game.dialog().status(), DialogStatus::Failed(_)));
        assert!(h.game.session.paused);

        h.game.submit_result("ash").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(true));
        assert!(h.game.session.is_score_submitted);
        assert_eq!(h.game.dialog().status(), &DialogStatus::Confirmed);

        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[0].user_id, "ahs");
        assert_eq!(posted[1].user_id, "ash");
        assert_eq!(posted[0].score, posted[1].score);
    }

    #[test]
    fn test_success_restarts_after_delay() {
        let mut h = Harness::new(FakeTransport::with(vec![Ok(())]), settings());
        h.win_game();
        h.wait_for_dialog();
        let generation = h.game.session.generation;

        h.game.submit_result("ash").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(true));

        h.tick();
        assert!(h.game.dialog().is_open());
        h.ticks((RESTART_AFTER_SUBMIT_MS / 40) as u32);

        assert!(!h.game.dialog().is_open());
        assert!(!h.game.session.paused);
        assert_eq!(h.game.session.phase, GamePhase::Intro);
        assert_eq!(h.game.session.generation, generation + 1);
        assert!(!h.game.session.is_score_submitted);
    }

    #[test]
    fn test_restart_cancels_pending_restart_after_submit() {
        let mut h = Harness::new(FakeTransport::with(vec![Ok(())]), settings());
        h.win_game();
        h.wait_for_dialog();
        h.game.submit_result("ash").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(true));
        assert!(h.game.session.schedule.is_pending(Deferred::RestartAfterSubmit));

        h.game.restart();
        let generation = h.game.session.generation;
        assert!(h.game.session.schedule.is_empty());

        let live = (RESTART_AFTER_SUBMIT_MS / 40) as u32 + 2;
        h.ticks(live);

        // the intro keeps running instead of being reset a second time
        assert_eq!(h.game.session.generation, generation);
        assert_eq!(h.game.session.phase, GamePhase::Intro);
        assert_eq!(h.game.session.frame_counter, live);
    }

    #[test]
    fn test_new_generation_cancels_pending_restart_after_submit() {
        let mut h = Harness::new(FakeTransport::with(vec![Ok(())]), settings());
        h.win_game();
        h.wait_for_dialog();
        h.game.submit_result("ash").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(true));

        h.game.session.next_generation();
        let generation = h.game.session.generation;
        let phase = h.game.session.phase;
        h.ticks((RESTART_AFTER_SUBMIT_MS / 40) as u32 + 2);

        assert_eq!(h.game.session.generation, generation);
        assert_eq!(h.game.session.phase, phase);
        assert!(h.game.dialog().is_open());
        assert!(h.game.session.paused);
    }

    #[test]
    fn test_missing_token_is_not_offered_for_retry() {
        let transport = FakeTransport::with(vec![Err(SubmitError::MissingToken)]);
        let mut h = Harness::new(transport.clone(), settings());
        h.win_game();
        h.wait_for_dialog();

        h.game.submit_result("ash").unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(false));
        assert!(matches!(h.game.dialog().status(), DialogStatus::Unavailable(_)));
        assert!(!h.game.dialog().accepts_input());

        assert!(matches!(h.game.submit_result("ash"), Err(SubmitError::Abandoned)));
        assert_eq!(transport.posted.lock().unwrap().len(), 1);

        h.game.restart();
        assert!(!h.game.dialog().is_open());
    }

    #[test]
    fn test_invalid_user_id_rejected_locally() {
        let transport = FakeTransport::with(vec![]);
        let mut h = Harness::new(transport.clone(), settings());
        h.win_game();
        h.wait_for_dialog();

        let err = h.game.submit_result("   ").unwrap_err();
        assert!(matches!(err, SubmitError::InvalidUserId(_)));
        assert!(h.game.dialog().accepts_input());
        assert!(!h.game.is_submitting());
        assert!(transport.posted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_without_dialog_or_twice() {
        let (transport, release) = GatedTransport::new();
        let mut h = Harness::new(transport, settings());
        assert!(matches!(h.game.submit_result("ash"), Err(SubmitError::DialogClosed)));

        h.win_game();
        h.wait_for_dialog();
        h.game.submit_result("ash").unwrap();
        assert!(matches!(h.game.submit_result("ash"), Err(SubmitError::Busy)));

        release.send(Ok(())).unwrap();
        assert_eq!(h.game.await_submission(WAIT), Some(true));
    }

    #[test]
    fn test_restart_before_delay_cancels_dialog() {
        let mut h = Harness::new(FakeTransport::with(vec![]), settings());
        h.win_game();
        h.game.restart();
        h.wait_for_dialog();

        assert!(!h.game.dialog().is_open());
        assert!(!h.game.session.paused);
        assert!(h.game.session.schedule.is_empty());
    }

    #[test]
    fn test_dialog_rechecks_submitted_flag_when_firing() {
        let mut h = Harness::new(FakeTransport::with(vec![]), settings());
        h.win_game();
        h.game.session.is_score_submitted = true;
        h.wait_for_dialog();
        assert!(!h.game.dialog().is_open());
        assert!(!h.game.session.paused);
    }

    #[test]
    fn test_late_reply_after_new_generation_is_dropped() {
        let (transport, release) = GatedTransport::new();
        let mut h = Harness::new(transport, settings());
        h.win_game();
        h.wait_for_dialog();
        h.game.submit_result("ash").unwrap();

        // the session moved on while the request was in flight
        h.game.session.next_generation();
        release.send(Ok(())).unwrap();

        assert_eq!(h.game.await_submission(WAIT), None);
        assert!(!h.game.session.is_score_submitted);
        assert!(h.game.session.schedule.is_empty());
    }

    #[test]
    fn test_reply_polled_on_tick_without_blocking() {
        let (transport, release) = GatedTransport::new();
        let mut h = Harness::new(transport, settings());
        h.win_game();
        h.wait_for_dialog();
        h.game.submit_result("ash").unwrap();

        // nothing arrives yet; ticks keep returning
        assert_eq!(h.tick(), TickResult::Paused);
        assert!(h.game.is_submitting());

        release.send(Ok(())).unwrap();
        let deadline = std::time::Instant::now() + WAIT;
        while h.game.is_submitting() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            h.tick();
        }
        assert!(h.game.session.is_score_submitted);
    }

    #[test]
    fn test_bonus_formula_uses_play_style() {
        let mut h = Harness::new(
            FakeTransport::with(vec![]),
            Settings {
                winning_score: 5,
                reward_formula: RewardFormula::PlayStyleBonus,
                ..Default::default()
            },
        );
        h.win_game();
        h.game.session.play_style = crate::sim::PlayStyle {
            power_hit_presses: 3,
            spikes: 1,
            slides: 0,
        };
        h.wait_for_dialog();
        assert_eq!(h.game.dialog().reward(), Some(Reward::Rated(41.33)));
    }

    #[test]
    fn test_practice_mode_toggle() {
        let mut h = Harness::new(FakeTransport::with(vec![]), settings());
        h.game.set_practice_mode(true);
        assert!(h.game.session.practice_mode);
        assert!(!h.game.session.visibility.score_boards);
    }
}
