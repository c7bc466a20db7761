//! Attempt orchestration engine.
//!
//! Wires the deterministic flow to the backend service, the local store, and
//! the session timer. A single cooperative task drives everything: player
//! commands and timer ticks are handled one at a time, and the only
//! suspension points are the backend calls themselves, so the flow can never
//! race itself.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::instrument;
use uuid::Uuid;

use crate::flow::{AttemptFlow, Phase, RecordedAnswer, SessionOutcome, Tick};
use crate::model::{Question, QuizSession};
use crate::snapshot;
use crate::timer::SessionTimer;
use crate::traits::{KeyValueStore, QuizService};

/// Configuration for the attempt engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Countdown granularity. One second everywhere outside tests.
    pub tick_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }
}

/// Player input driving the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Record an answer by explicit ids.
    Answer { question_id: Uuid, option_id: Uuid },
    /// Record an answer by option position on the current question.
    Choose(usize),
    /// Move to the next question.
    Next,
    /// Move to the previous question.
    Prev,
    /// Complete the active session now.
    Complete,
    /// Leave the attempt; progress stays saved.
    Quit,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowConclusion {
    /// Every session completed; results can be fetched for the attempt.
    Completed { attempt_id: Uuid },
    /// The player quit; the saved snapshot allows resumption.
    Aborted,
    /// The sessions ran out but the server never marked the quiz complete.
    Inconsistent,
}

/// A successful completion submission plus the transition it caused.
#[derive(Debug, Clone)]
pub struct CompletionAdvance {
    /// Server message, e.g. "Session completed successfully".
    pub message: String,
    pub outcome: SessionOutcome,
}

/// Callbacks for a thin frontend driven by flow state changes.
pub trait FlowObserver: Send + Sync {
    fn on_session_started(&self, session: &QuizSession, question_index: usize, time_left: u64);
    fn on_question_changed(
        &self,
        question: Option<&Question>,
        index: usize,
        total: usize,
        chosen: Option<Uuid>,
    );
    fn on_tick(&self, time_left: u64);
    fn on_answer_recorded(&self, question_id: Uuid, option_id: Uuid);
    fn on_session_expired(&self);
    fn on_session_completed(&self, message: &str);
    fn on_completion_failed(&self, error: &str);
    fn on_quiz_completed(&self, attempt_id: Uuid);
    fn on_inconsistency(&self, detail: &str);
}

/// No-op observer.
pub struct NoopObserver;

impl FlowObserver for NoopObserver {
    fn on_session_started(&self, _: &QuizSession, _: usize, _: u64) {}
    fn on_question_changed(&self, _: Option<&Question>, _: usize, _: usize, _: Option<Uuid>) {}
    fn on_tick(&self, _: u64) {}
    fn on_answer_recorded(&self, _: Uuid, _: Uuid) {}
    fn on_session_expired(&self) {}
    fn on_session_completed(&self, _: &str) {}
    fn on_completion_failed(&self, _: &str) {}
    fn on_quiz_completed(&self, _: Uuid) {}
    fn on_inconsistency(&self, _: &str) {}
}

/// The attempt engine.
pub struct AttemptEngine {
    service: Arc<dyn QuizService>,
    store: Arc<dyn KeyValueStore>,
    config: EngineConfig,
}

impl AttemptEngine {
    pub fn new(
        service: Arc<dyn QuizService>,
        store: Arc<dyn KeyValueStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            service,
            store,
            config,
        }
    }

    /// Load everything needed to take a quiz.
    ///
    /// Fetches the quiz, starts (or resumes) the attempt server-side, and
    /// restores the local snapshot when it names a session of this quiz.
    /// Every failure here is blocking: the caller gets the error and may
    /// retry, and no partial state escapes.
    #[instrument(skip(self))]
    pub async fn load(&self, quiz_id: Uuid) -> Result<AttemptFlow> {
        let quiz = self
            .service
            .fetch_quiz(quiz_id)
            .await
            .with_context(|| format!("failed to load quiz {quiz_id}"))?
            .sorted();
        let attempt = self
            .service
            .start_attempt(quiz_id)
            .await
            .with_context(|| format!("failed to start attempt for quiz {quiz_id}"))?;

        let flow = match snapshot::load(self.store.as_ref(), quiz_id) {
            Some(saved) => {
                if let Some(saved_attempt) = saved.attempt_id {
                    if saved_attempt != attempt.id {
                        tracing::debug!(
                            "saved progress was written under attempt {saved_attempt}, \
                             server resumed {}",
                            attempt.id
                        );
                    }
                }
                AttemptFlow::resume(quiz, attempt.id, &saved)?
            }
            None => AttemptFlow::new(quiz, attempt.id)?,
        };
        tracing::info!(
            attempt_id = %attempt.id,
            session = %flow.current_session().name,
            time_left = flow.time_left(),
            "attempt ready"
        );
        Ok(flow)
    }

    /// Record an answer locally, then persist it best-effort.
    pub async fn record_answer(
        &self,
        flow: &mut AttemptFlow,
        question_id: Uuid,
        option_id: Uuid,
    ) -> Option<RecordedAnswer> {
        let recorded = flow.record_answer(question_id, option_id)?;
        self.persist_answer(flow, recorded).await;
        Some(recorded)
    }

    /// Record by option position on the question under the cursor.
    pub async fn choose(&self, flow: &mut AttemptFlow, option_idx: usize) -> Option<RecordedAnswer> {
        let recorded = flow.choose(option_idx)?;
        self.persist_answer(flow, recorded).await;
        Some(recorded)
    }

    async fn persist_answer(&self, flow: &AttemptFlow, recorded: RecordedAnswer) {
        // The local choice is authoritative for display. A failed persist is
        // logged and dropped, never surfaced to the player or retried.
        if let Err(e) = self
            .service
            .submit_answer(
                flow.attempt_id(),
                recorded.session_id,
                recorded.question_id,
                recorded.option_id,
            )
            .await
        {
            tracing::warn!(
                question = %recorded.question_id,
                "failed to persist answer, keeping local state: {e:#}"
            );
        }
        self.save_progress(flow);
    }

    /// Write the current snapshot. Failures are logged and dropped.
    pub fn save_progress(&self, flow: &AttemptFlow) {
        if let Err(e) = snapshot::save(self.store.as_ref(), flow.quiz().id, &flow.snapshot()) {
            tracing::warn!("{e:#}");
        }
    }

    /// Submit completion of the active session and apply the server verdict.
    ///
    /// Returns `Ok(None)` when the attempt is already finished: the duplicate
    /// request is absorbed without a second POST. A failed POST reverts the
    /// flow to the active session and returns the error; whether to retry is
    /// the player's call, nothing here retries.
    #[instrument(skip(self, flow), fields(attempt_id = %flow.attempt_id()))]
    pub async fn complete_session(
        &self,
        flow: &mut AttemptFlow,
    ) -> Result<Option<CompletionAdvance>> {
        match flow.phase() {
            Phase::Finished => return Ok(None),
            Phase::SessionActive => {
                flow.begin_completion();
            }
            // A timer expiry already moved the flow here; this call is the
            // one processing it.
            Phase::SessionCompleting => {}
        }

        let session_id = flow.current_session().id;
        let outcome = match self
            .service
            .complete_session(flow.attempt_id(), session_id)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                flow.abort_completion();
                return Err(e).with_context(|| format!("failed to complete session {session_id}"));
            }
        };

        let transition = flow.finish_completion(outcome.is_quiz_completed);
        match &transition {
            SessionOutcome::QuizComplete => {
                if let Err(e) = snapshot::clear(self.store.as_ref(), flow.quiz().id) {
                    tracing::warn!("{e:#}");
                }
            }
            SessionOutcome::NextSession { session_id, .. } => {
                tracing::info!(next_session = %session_id, "advanced to next session");
                self.save_progress(flow);
            }
            SessionOutcome::OutOfSessions => {
                tracing::error!("quiz not marked complete but there is no next session");
            }
        }
        Ok(Some(CompletionAdvance {
            message: outcome.message,
            outcome: transition,
        }))
    }

    /// Drive a full attempt interactively.
    ///
    /// Selects over player commands and the session timer, commands first.
    /// The timer is replaced whenever the active session changes and
    /// cancelled on every exit from the active state.
    pub async fn run(
        &self,
        quiz_id: Uuid,
        commands: &mut mpsc::Receiver<PlayerCommand>,
        observer: &dyn FlowObserver,
    ) -> Result<FlowConclusion> {
        let mut flow = self.load(quiz_id).await?;
        let mut timer = SessionTimer::start(self.config.tick_period);
        observer.on_session_started(
            flow.current_session(),
            flow.question_index(),
            flow.time_left(),
        );
        self.emit_question(&flow, observer);

        let mut inconsistent = false;
        while !flow.is_finished() {
            tokio::select! {
                biased;
                command = commands.recv() => {
                    let Some(command) = command else {
                        timer.cancel();
                        self.save_progress(&flow);
                        return Ok(FlowConclusion::Aborted);
                    };
                    match command {
                        PlayerCommand::Quit => {
                            timer.cancel();
                            self.save_progress(&flow);
                            return Ok(FlowConclusion::Aborted);
                        }
                        PlayerCommand::Answer { question_id, option_id } => {
                            if let Some(rec) =
                                self.record_answer(&mut flow, question_id, option_id).await
                            {
                                observer.on_answer_recorded(rec.question_id, rec.option_id);
                            }
                        }
                        PlayerCommand::Choose(option_idx) => {
                            if let Some(rec) = self.choose(&mut flow, option_idx).await {
                                observer.on_answer_recorded(rec.question_id, rec.option_id);
                            }
                        }
                        PlayerCommand::Next => {
                            flow.next_question();
                            self.save_progress(&flow);
                            self.emit_question(&flow, observer);
                        }
                        PlayerCommand::Prev => {
                            flow.prev_question();
                            self.save_progress(&flow);
                            self.emit_question(&flow, observer);
                        }
                        PlayerCommand::Complete => {
                            if let Some(SessionOutcome::OutOfSessions) =
                                self.submit_completion(&mut flow, &mut timer, observer).await
                            {
                                inconsistent = true;
                            }
                        }
                    }
                }
                Some(_) = timer.tick() => {
                    match flow.tick() {
                        Tick::Counting(left) => {
                            observer.on_tick(left);
                            self.save_progress(&flow);
                        }
                        Tick::Expired => {
                            observer.on_session_expired();
                            if let Some(SessionOutcome::OutOfSessions) =
                                self.submit_completion(&mut flow, &mut timer, observer).await
                            {
                                inconsistent = true;
                            }
                        }
                        Tick::Idle => {}
                    }
                }
            }
        }

        timer.cancel();
        if inconsistent {
            Ok(FlowConclusion::Inconsistent)
        } else {
            Ok(FlowConclusion::Completed {
                attempt_id: flow.attempt_id(),
            })
        }
    }

    async fn submit_completion(
        &self,
        flow: &mut AttemptFlow,
        timer: &mut SessionTimer,
        observer: &dyn FlowObserver,
    ) -> Option<SessionOutcome> {
        match self.complete_session(flow).await {
            Ok(Some(advance)) => {
                match &advance.outcome {
                    SessionOutcome::QuizComplete => {
                        timer.cancel();
                        observer.on_session_completed(&advance.message);
                        observer.on_quiz_completed(flow.attempt_id());
                    }
                    SessionOutcome::NextSession { .. } => {
                        *timer = SessionTimer::start(self.config.tick_period);
                        observer.on_session_completed(&advance.message);
                        observer.on_session_started(
                            flow.current_session(),
                            flow.question_index(),
                            flow.time_left(),
                        );
                        self.emit_question(flow, observer);
                    }
                    SessionOutcome::OutOfSessions => {
                        timer.cancel();
                        observer.on_inconsistency(
                            "the server did not mark the quiz complete, \
                             but there is no next session",
                        );
                    }
                }
                Some(advance.outcome)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("session completion failed: {e:#}");
                observer.on_completion_failed(&format!("{e:#}"));
                None
            }
        }
    }

    fn emit_question(&self, flow: &AttemptFlow, observer: &dyn FlowObserver) {
        let total = flow.current_session().questions.len();
        let chosen = flow.current_question().and_then(|q| flow.answer_for(q.id));
        observer.on_question_changed(
            flow.current_question(),
            flow.question_index(),
            total,
            chosen,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::ApiError;
    use crate::model::{
        AnswerOption, AttemptDetail, AttemptHandle, CompletionOutcome, Quiz, QuizSession,
    };
    use crate::snapshot::ProgressSnapshot;

    fn make_quiz(sessions: &[(u32, usize)]) -> Quiz {
        let sessions = sessions
            .iter()
            .enumerate()
            .map(|(s, &(duration, questions))| QuizSession {
                id: Uuid::new_v4(),
                name: format!("Session {}", s + 1),
                duration,
                order: s as u32,
                questions: (0..questions)
                    .map(|q| Question {
                        id: Uuid::new_v4(),
                        text: format!("Question {}", q + 1),
                        order: q as u32,
                        options: (0..3)
                            .map(|o| AnswerOption {
                                id: Uuid::new_v4(),
                                text: format!("Option {}", o + 1),
                                is_correct: o == 0,
                                order: o as u32,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Quiz {
            id: Uuid::new_v4(),
            title: "Engine Quiz".into(),
            description: String::new(),
            is_published: true,
            randomize_questions: false,
            show_result: true,
            show_answers: true,
            start_date: None,
            end_date: None,
            sessions,
            total_questions: 0,
            total_duration: 0,
        }
    }

    struct MemStore(Mutex<HashMap<String, String>>);

    impl MemStore {
        fn new() -> Self {
            Self(Mutex::new(HashMap::new()))
        }
    }

    impl KeyValueStore for MemStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct StubService {
        quiz: Quiz,
        attempt_id: Uuid,
        /// Scripted `is_quiz_completed` verdicts, consumed per call.
        verdicts: Mutex<VecDeque<bool>>,
        fail_submit: AtomicBool,
        fail_complete: AtomicBool,
        submit_calls: AtomicU32,
        complete_calls: AtomicU32,
    }

    impl StubService {
        fn new(quiz: Quiz, verdicts: &[bool]) -> Self {
            Self {
                quiz,
                attempt_id: Uuid::new_v4(),
                verdicts: Mutex::new(verdicts.iter().copied().collect()),
                fail_submit: AtomicBool::new(false),
                fail_complete: AtomicBool::new(false),
                submit_calls: AtomicU32::new(0),
                complete_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl QuizService for StubService {
        async fn fetch_quiz(&self, _quiz_id: Uuid) -> Result<Quiz> {
            Ok(self.quiz.clone())
        }

        async fn start_attempt(&self, _quiz_id: Uuid) -> Result<AttemptHandle> {
            Ok(AttemptHandle {
                id: self.attempt_id,
                started_at: Utc::now(),
            })
        }

        async fn submit_answer(&self, _: Uuid, _: Uuid, _: Uuid, _: Uuid) -> Result<()> {
            self.submit_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_submit.load(Ordering::Relaxed) {
                return Err(ApiError::Network("connection refused".into()).into());
            }
            Ok(())
        }

        async fn complete_session(&self, _: Uuid, _: Uuid) -> Result<CompletionOutcome> {
            self.complete_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_complete.load(Ordering::Relaxed) {
                return Err(ApiError::Api {
                    status: 500,
                    message: "boom".into(),
                }
                .into());
            }
            let verdict = self
                .verdicts
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected completion call");
            Ok(CompletionOutcome {
                message: "Session completed successfully".into(),
                is_quiz_completed: verdict,
            })
        }

        async fn fetch_attempt(&self, attempt_id: Uuid) -> Result<AttemptDetail> {
            Ok(AttemptDetail {
                id: attempt_id,
                quiz: self.quiz.id,
                student_name: None,
                student_email: None,
                started_at: Utc::now(),
                completed_at: None,
                score: None,
                session_attempts: vec![],
            })
        }
    }

    fn engine_for(service: &Arc<StubService>, store: &Arc<MemStore>) -> AttemptEngine {
        AttemptEngine::new(
            Arc::clone(service) as Arc<dyn QuizService>,
            Arc::clone(store) as Arc<dyn KeyValueStore>,
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn load_fails_when_quiz_has_no_sessions() {
        let service = Arc::new(StubService::new(make_quiz(&[]), &[]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let err = engine.load(service.quiz.id).await.unwrap_err();
        assert!(format!("{err:#}").contains("no sessions"));
    }

    #[tokio::test]
    async fn load_restores_saved_progress() {
        let quiz = make_quiz(&[(10, 3)]);
        let session_id = quiz.sessions[0].id;
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let saved = ProgressSnapshot {
            current_question_index: 2,
            current_session: Some(session_id),
            time_left: Some(123),
            ..Default::default()
        };
        snapshot::save(store.as_ref(), quiz_id, &saved).unwrap();

        let flow = engine.load(quiz_id).await.unwrap();
        assert_eq!(flow.question_index(), 2);
        assert_eq!(flow.time_left(), 123);
    }

    #[tokio::test]
    async fn completion_advances_and_saves_the_next_snapshot() {
        let quiz = make_quiz(&[(5, 1), (2, 1)]);
        let quiz_id = quiz.id;
        let second_session = quiz.sessions[1].id;
        let service = Arc::new(StubService::new(quiz, &[false]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        let advance = engine.complete_session(&mut flow).await.unwrap().unwrap();
        assert_eq!(
            advance.outcome,
            SessionOutcome::NextSession {
                session_id: second_session,
                time_left: 120
            }
        );

        let saved = snapshot::load(store.as_ref(), quiz_id).unwrap();
        assert_eq!(saved.current_session, Some(second_session));
        assert_eq!(saved.time_left, Some(120));
        assert_eq!(saved.current_question_index, 0);
        assert!(saved.answers.is_empty());
    }

    #[tokio::test]
    async fn completing_the_quiz_clears_the_snapshot() {
        let quiz = make_quiz(&[(5, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[true]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        engine.save_progress(&flow);
        assert!(snapshot::load(store.as_ref(), quiz_id).is_some());

        let advance = engine.complete_session(&mut flow).await.unwrap().unwrap();
        assert_eq!(advance.outcome, SessionOutcome::QuizComplete);
        assert!(flow.is_finished());
        assert!(snapshot::load(store.as_ref(), quiz_id).is_none());
    }

    #[tokio::test]
    async fn finished_flow_absorbs_duplicate_completion() {
        let quiz = make_quiz(&[(5, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[true]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        engine.complete_session(&mut flow).await.unwrap();
        let second = engine.complete_session(&mut flow).await.unwrap();
        assert!(second.is_none());
        assert_eq!(service.complete_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn failed_completion_reverts_and_allows_retry() {
        let quiz = make_quiz(&[(5, 1), (5, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[false]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        service.fail_complete.store(true, Ordering::Relaxed);
        let err = engine.complete_session(&mut flow).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to complete session"));
        assert_eq!(flow.phase(), Phase::SessionActive);

        service.fail_complete.store(false, Ordering::Relaxed);
        let advance = engine.complete_session(&mut flow).await.unwrap().unwrap();
        assert!(matches!(
            advance.outcome,
            SessionOutcome::NextSession { .. }
        ));
        assert_eq!(service.complete_calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn expired_flow_posts_completion_once() {
        let quiz = make_quiz(&[(1, 1), (1, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[false]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        for _ in 0..60 {
            flow.tick();
        }
        assert_eq!(flow.phase(), Phase::SessionCompleting);

        let advance = engine.complete_session(&mut flow).await.unwrap().unwrap();
        assert!(matches!(
            advance.outcome,
            SessionOutcome::NextSession { .. }
        ));
        assert_eq!(service.complete_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn submit_failure_keeps_the_local_answer() {
        let quiz = make_quiz(&[(5, 2)]);
        let quiz_id = quiz.id;
        let question = quiz.sessions[0].questions[0].clone();
        let service = Arc::new(StubService::new(quiz, &[]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        service.fail_submit.store(true, Ordering::Relaxed);
        let recorded = engine
            .record_answer(&mut flow, question.id, question.options[1].id)
            .await;
        assert!(recorded.is_some());
        assert_eq!(flow.answer_for(question.id), Some(question.options[1].id));
        assert_eq!(service.submit_calls.load(Ordering::Relaxed), 1);

        // The snapshot written after the failed persist carries the answer.
        let saved = snapshot::load(store.as_ref(), quiz_id).unwrap();
        assert_eq!(saved.answers.get(&question.id), Some(&question.options[1].id));
    }

    #[tokio::test]
    async fn out_of_sessions_is_reported() {
        let quiz = make_quiz(&[(5, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[false]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let mut flow = engine.load(quiz_id).await.unwrap();
        let advance = engine.complete_session(&mut flow).await.unwrap().unwrap();
        assert_eq!(advance.outcome, SessionOutcome::OutOfSessions);
        assert!(flow.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn run_auto_completes_expired_sessions() {
        let quiz = make_quiz(&[(1, 1), (1, 1)]);
        let quiz_id = quiz.id;
        let service = Arc::new(StubService::new(quiz, &[false, true]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let (_tx, mut rx) = mpsc::channel(8);
        let conclusion = engine.run(quiz_id, &mut rx, &NoopObserver).await.unwrap();
        assert_eq!(
            conclusion,
            FlowConclusion::Completed {
                attempt_id: service.attempt_id
            }
        );
        assert_eq!(service.complete_calls.load(Ordering::Relaxed), 2);
        assert!(snapshot::load(store.as_ref(), quiz_id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_quit_saves_progress_for_resumption() {
        let quiz = make_quiz(&[(10, 2)]);
        let quiz_id = quiz.id;
        let question = quiz.sessions[0].questions[0].clone();
        let service = Arc::new(StubService::new(quiz, &[]));
        let store = Arc::new(MemStore::new());
        let engine = engine_for(&service, &store);

        let (tx, mut rx) = mpsc::channel(8);
        tx.send(PlayerCommand::Choose(1)).await.unwrap();
        tx.send(PlayerCommand::Quit).await.unwrap();

        let conclusion = engine.run(quiz_id, &mut rx, &NoopObserver).await.unwrap();
        assert_eq!(conclusion, FlowConclusion::Aborted);

        let saved = snapshot::load(store.as_ref(), quiz_id).unwrap();
        assert_eq!(saved.answers.get(&question.id), Some(&question.options[1].id));
        assert_eq!(service.submit_calls.load(Ordering::Relaxed), 1);
    }
}
