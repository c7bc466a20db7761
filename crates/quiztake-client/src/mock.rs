//! Mock service for testing without a backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quiztake_core::error::ApiError;
use quiztake_core::model::{
    AnswerOption, AttemptDetail, AttemptHandle, CompletionOutcome, Question, Quiz, QuizSession,
};
use quiztake_core::traits::QuizService;

/// An answer submission captured by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub attempt_id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub option_id: Uuid,
}

/// A mock quiz service for testing the attempt engine without a backend.
///
/// By default `complete_session` behaves like the real backend: it counts
/// completion calls and marks the quiz completed once every session has
/// been completed. A script of verdicts can override that, which is how
/// the no-next-session inconsistency is provoked in tests.
pub struct MockQuizService {
    quiz: Quiz,
    attempt: AttemptHandle,
    /// Scripted `is_quiz_completed` verdicts, consumed per call.
    verdicts: Mutex<VecDeque<bool>>,
    attempt_detail: Mutex<Option<AttemptDetail>>,
    submitted: Mutex<Vec<SubmittedAnswer>>,
    fail_submits: AtomicBool,
    fail_completions: AtomicBool,
    submit_calls: AtomicU32,
    completion_calls: AtomicU32,
    /// Successful completions only; drives the derived verdict.
    completed_sessions: AtomicU32,
}

impl MockQuizService {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            attempt: AttemptHandle {
                id: Uuid::new_v4(),
                started_at: Utc::now(),
            },
            verdicts: Mutex::new(VecDeque::new()),
            attempt_detail: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            fail_submits: AtomicBool::new(false),
            fail_completions: AtomicBool::new(false),
            submit_calls: AtomicU32::new(0),
            completion_calls: AtomicU32::new(0),
            completed_sessions: AtomicU32::new(0),
        }
    }

    /// Override the derived completion verdicts with a fixed script.
    pub fn with_verdicts(self, verdicts: &[bool]) -> Self {
        *self.verdicts.lock().unwrap() = verdicts.iter().copied().collect();
        self
    }

    /// Make every `submit_answer` call fail until turned off again.
    pub fn set_fail_submits(&self, enabled: bool) {
        self.fail_submits.store(enabled, Ordering::Relaxed);
    }

    /// Make every `complete_session` call fail until turned off again.
    pub fn set_fail_completions(&self, enabled: bool) {
        self.fail_completions.store(enabled, Ordering::Relaxed);
    }

    /// Fix the payload returned by `fetch_attempt`.
    pub fn set_attempt_detail(&self, detail: AttemptDetail) {
        *self.attempt_detail.lock().unwrap() = Some(detail);
    }

    /// The handle every `start_attempt` call returns.
    pub fn attempt_handle(&self) -> AttemptHandle {
        self.attempt.clone()
    }

    /// All answers captured so far, in submission order.
    pub fn submitted(&self) -> Vec<SubmittedAnswer> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::Relaxed)
    }

    pub fn completion_calls(&self) -> u32 {
        self.completion_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuizService for MockQuizService {
    async fn fetch_quiz(&self, _quiz_id: Uuid) -> Result<Quiz> {
        Ok(self.quiz.clone())
    }

    async fn start_attempt(&self, _quiz_id: Uuid) -> Result<AttemptHandle> {
        Ok(self.attempt.clone())
    }

    async fn submit_answer(
        &self,
        attempt_id: Uuid,
        session_id: Uuid,
        question_id: Uuid,
        option_id: Uuid,
    ) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_submits.load(Ordering::Relaxed) {
            return Err(ApiError::Network("connection refused".to_string()).into());
        }
        self.submitted.lock().unwrap().push(SubmittedAnswer {
            attempt_id,
            session_id,
            question_id,
            option_id,
        });
        Ok(())
    }

    async fn complete_session(&self, _attempt_id: Uuid, _session_id: Uuid) -> Result<CompletionOutcome> {
        self.completion_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_completions.load(Ordering::Relaxed) {
            return Err(ApiError::Api {
                status: 500,
                message: "internal error".to_string(),
            }
            .into());
        }
        let completed = self.completed_sessions.fetch_add(1, Ordering::Relaxed) + 1;
        let is_quiz_completed = match self.verdicts.lock().unwrap().pop_front() {
            Some(verdict) => verdict,
            None => completed as usize >= self.quiz.sessions.len(),
        };
        Ok(CompletionOutcome {
            message: "Session completed successfully".to_string(),
            is_quiz_completed,
        })
    }

    async fn fetch_attempt(&self, attempt_id: Uuid) -> Result<AttemptDetail> {
        if let Some(detail) = self.attempt_detail.lock().unwrap().clone() {
            return Ok(detail);
        }
        let done = self.completed_sessions.load(Ordering::Relaxed) as usize
            >= self.quiz.sessions.len();
        Ok(AttemptDetail {
            id: attempt_id,
            quiz: self.quiz.id,
            student_name: None,
            student_email: None,
            started_at: self.attempt.started_at,
            completed_at: done.then(Utc::now),
            score: None,
            session_attempts: Vec::new(),
        })
    }
}

/// Deterministic quiz for tests: one entry per session as
/// `(duration_minutes, question_count)`, three options per question with
/// the first one correct.
pub fn sample_quiz(sessions: &[(u32, usize)]) -> Quiz {
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
        title: "Sample Quiz".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn derived_verdict_completes_on_the_last_session() {
        let service = MockQuizService::new(sample_quiz(&[(5, 1), (5, 1)]));

        let first = service
            .complete_session(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(!first.is_quiz_completed);

        let second = service
            .complete_session(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(second.is_quiz_completed);
        assert_eq!(service.completion_calls(), 2);
    }

    #[tokio::test]
    async fn scripted_verdicts_override_the_derived_ones() {
        let service = MockQuizService::new(sample_quiz(&[(5, 1)])).with_verdicts(&[false]);

        let outcome = service
            .complete_session(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(!outcome.is_quiz_completed);
    }

    #[tokio::test]
    async fn submissions_are_captured_in_order() {
        let quiz = sample_quiz(&[(5, 2)]);
        let session = &quiz.sessions[0];
        let (q1, q2) = (session.questions[0].clone(), session.questions[1].clone());
        let session_id = session.id;
        let service = MockQuizService::new(quiz);
        let attempt_id = service.attempt_handle().id;

        service
            .submit_answer(attempt_id, session_id, q1.id, q1.options[0].id)
            .await
            .unwrap();
        service
            .submit_answer(attempt_id, session_id, q2.id, q2.options[2].id)
            .await
            .unwrap();

        let submitted = service.submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].question_id, q1.id);
        assert_eq!(submitted[1].option_id, q2.options[2].id);
    }

    #[tokio::test]
    async fn failed_submissions_are_counted_but_not_captured() {
        let service = MockQuizService::new(sample_quiz(&[(5, 1)]));
        service.set_fail_submits(true);

        let err = service
            .submit_answer(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_some());
        assert_eq!(service.submit_calls(), 1);
        assert!(service.submitted().is_empty());
    }

    #[tokio::test]
    async fn fetch_attempt_reflects_completion_state() {
        let service = MockQuizService::new(sample_quiz(&[(5, 1)]));
        let attempt_id = service.attempt_handle().id;

        let before = service.fetch_attempt(attempt_id).await.unwrap();
        assert!(before.completed_at.is_none());

        service
            .complete_session(attempt_id, Uuid::new_v4())
            .await
            .unwrap();
        let after = service.fetch_attempt(attempt_id).await.unwrap();
        assert!(after.completed_at.is_some());
    }

    #[tokio::test]
    async fn failed_completions_do_not_mark_the_attempt_done() {
        let service = MockQuizService::new(sample_quiz(&[(5, 1)]));
        let attempt_id = service.attempt_handle().id;
        service.set_fail_completions(true);

        service
            .complete_session(attempt_id, Uuid::new_v4())
            .await
            .unwrap_err();
        let detail = service.fetch_attempt(attempt_id).await.unwrap();
        assert!(detail.completed_at.is_none());
        assert_eq!(service.completion_calls(), 1);

        service.set_fail_completions(false);
        service
            .complete_session(attempt_id, Uuid::new_v4())
            .await
            .unwrap();
        let detail = service.fetch_attempt(attempt_id).await.unwrap();
        assert!(detail.completed_at.is_some());
    }
}
