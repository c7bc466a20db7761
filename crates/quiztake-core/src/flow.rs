//! Deterministic attempt flow state machine.
//!
//! `AttemptFlow` holds everything about one attempt in progress: the loaded
//! quiz, the active session and question cursor, the session-local answer
//! map, and the countdown. It advances only through its methods and performs
//! no IO; the network, storage, and the actual timer task live in the engine.
//! That keeps the session rules testable tick by tick.

use std::collections::HashMap;

use anyhow::{bail, Result};
use uuid::Uuid;

use crate::model::{Question, Quiz, QuizSession};
use crate::snapshot::ProgressSnapshot;

/// Where the flow currently is.
///
/// Only `SessionActive` runs the timer and accepts answers. Completion
/// submission happens in `SessionCompleting`; the flow either re-enters
/// `SessionActive` with the next session or ends in `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SessionActive,
    SessionCompleting,
    Finished,
}

/// Result of one timer second applied to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; remaining seconds after the decrement.
    Counting(u64),
    /// The countdown just reached zero. Yielded exactly once per session;
    /// the flow is now in `SessionCompleting`.
    Expired,
    /// Nothing to do: not in an active session, or the expiry already fired.
    Idle,
}

/// What a successful completion submission led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every session is done; the attempt is over.
    QuizComplete,
    /// Advanced to the next session, cursor and countdown reset.
    NextSession { session_id: Uuid, time_left: u64 },
    /// The server did not mark the quiz complete, yet there is no next
    /// session to advance to. An inconsistency with no recovery path.
    OutOfSessions,
}

/// An answer accepted into the flow, ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub option_id: Uuid,
}

/// State machine for one quiz attempt.
#[derive(Debug, Clone)]
pub struct AttemptFlow {
    quiz: Quiz,
    attempt_id: Uuid,
    session_idx: usize,
    question_idx: usize,
    answers: HashMap<Uuid, Uuid>,
    time_left: u64,
    phase: Phase,
    expiry_fired: bool,
}

impl AttemptFlow {
    /// Start a fresh flow on the first session of `quiz`.
    ///
    /// The quiz must already be `sorted()`. Fails when it has no sessions;
    /// a quiz with nothing to take must not reach the active state.
    pub fn new(quiz: Quiz, attempt_id: Uuid) -> Result<Self> {
        let Some(first) = quiz.sessions.first() else {
            bail!("quiz '{}' has no sessions", quiz.title);
        };
        let time_left = first.duration_secs();
        Ok(Self {
            quiz,
            attempt_id,
            session_idx: 0,
            question_idx: 0,
            answers: HashMap::new(),
            time_left,
            phase: Phase::SessionActive,
            expiry_fired: false,
        })
    }

    /// Start a flow and restore saved progress on top of it.
    ///
    /// The snapshot applies only when the session it names still exists in
    /// the quiz; otherwise the attempt starts fresh. A question index outside
    /// the session's range is clamped.
    pub fn resume(quiz: Quiz, attempt_id: Uuid, snapshot: &ProgressSnapshot) -> Result<Self> {
        let mut flow = Self::new(quiz, attempt_id)?;
        let Some(session_id) = snapshot.current_session else {
            return Ok(flow);
        };
        let Some(session_idx) = flow.quiz.session_index(session_id) else {
            tracing::warn!("saved progress names unknown session {session_id}, starting fresh");
            return Ok(flow);
        };

        flow.session_idx = session_idx;
        flow.answers = snapshot.answers.clone();
        flow.time_left = snapshot
            .time_left
            .unwrap_or_else(|| flow.quiz.sessions[session_idx].duration_secs());

        let question_count = flow.quiz.sessions[session_idx].questions.len();
        let max_idx = question_count.saturating_sub(1);
        if snapshot.current_question_index > max_idx {
            tracing::warn!(
                "saved question index {} out of range, clamping to {max_idx}",
                snapshot.current_question_index
            );
            flow.question_idx = max_idx;
        } else {
            flow.question_idx = snapshot.current_question_index;
        }
        Ok(flow)
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Remaining seconds on the active session's countdown.
    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn session_index(&self) -> usize {
        self.session_idx
    }

    pub fn current_session(&self) -> &QuizSession {
        &self.quiz.sessions[self.session_idx]
    }

    pub fn question_index(&self) -> usize {
        self.question_idx
    }

    /// The question under the cursor, or `None` for a session without
    /// questions.
    pub fn current_question(&self) -> Option<&Question> {
        self.current_session().questions.get(self.question_idx)
    }

    /// Chosen option for a question, if any.
    pub fn answer_for(&self, question_id: Uuid) -> Option<Uuid> {
        self.answers.get(&question_id).copied()
    }

    pub fn answers(&self) -> &HashMap<Uuid, Uuid> {
        &self.answers
    }

    /// Record an answer for a question of the active session.
    ///
    /// Overwrites any earlier choice for that question and no other. Returns
    /// `None` when the flow is not in an active session or the question does
    /// not belong to it; such inputs change nothing.
    pub fn record_answer(&mut self, question_id: Uuid, option_id: Uuid) -> Option<RecordedAnswer> {
        if self.phase != Phase::SessionActive {
            return None;
        }
        let session = self.current_session();
        if !session.questions.iter().any(|q| q.id == question_id) {
            return None;
        }
        let session_id = session.id;
        self.answers.insert(question_id, option_id);
        Some(RecordedAnswer {
            session_id,
            question_id,
            option_id,
        })
    }

    /// Record an answer by option position on the question under the cursor.
    pub fn choose(&mut self, option_idx: usize) -> Option<RecordedAnswer> {
        let question = self.current_question()?;
        let question_id = question.id;
        let option_id = question.options.get(option_idx)?.id;
        self.record_answer(question_id, option_id)
    }

    /// Move the cursor to the next question, saturating at the end.
    pub fn next_question(&mut self) -> usize {
        let last = self.current_session().questions.len().saturating_sub(1);
        if self.question_idx < last {
            self.question_idx += 1;
        }
        self.question_idx
    }

    /// Move the cursor to the previous question, saturating at the start.
    pub fn prev_question(&mut self) -> usize {
        self.question_idx = self.question_idx.saturating_sub(1);
        self.question_idx
    }

    /// Apply one second of elapsed time.
    ///
    /// The countdown never goes below zero, and reaching zero yields
    /// `Tick::Expired` exactly once per session, moving the flow into
    /// `SessionCompleting`. Every other situation is `Tick::Idle`.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::SessionActive || self.expiry_fired {
            return Tick::Idle;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.expiry_fired = true;
            self.phase = Phase::SessionCompleting;
            Tick::Expired
        } else {
            Tick::Counting(self.time_left)
        }
    }

    /// Enter `SessionCompleting` from an active session.
    ///
    /// Returns `false` when completion is already underway or the attempt is
    /// finished, so a manual request and a timer expiry landing together
    /// produce exactly one transition.
    pub fn begin_completion(&mut self) -> bool {
        if self.phase != Phase::SessionActive {
            return false;
        }
        self.phase = Phase::SessionCompleting;
        true
    }

    /// Return to the active session after a failed completion submission.
    ///
    /// The player may retry manually. An expiry that already fired does not
    /// fire again, so an expired session waits on the player rather than
    /// looping the submission.
    pub fn abort_completion(&mut self) {
        if self.phase == Phase::SessionCompleting {
            self.phase = Phase::SessionActive;
        }
    }

    /// Apply the server's verdict after a completion submission succeeded.
    ///
    /// Advancing resets the question cursor, clears the answer map, and
    /// re-arms the countdown with the next session's full duration.
    pub fn finish_completion(&mut self, quiz_completed: bool) -> SessionOutcome {
        if quiz_completed {
            self.phase = Phase::Finished;
            return SessionOutcome::QuizComplete;
        }
        match self.quiz.sessions.get(self.session_idx + 1) {
            Some(next) => {
                let session_id = next.id;
                let time_left = next.duration_secs();
                self.session_idx += 1;
                self.question_idx = 0;
                self.answers.clear();
                self.time_left = time_left;
                self.expiry_fired = false;
                self.phase = Phase::SessionActive;
                SessionOutcome::NextSession {
                    session_id,
                    time_left,
                }
            }
            None => {
                self.phase = Phase::Finished;
                SessionOutcome::OutOfSessions
            }
        }
    }

    /// Export the whole current state as a snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            answers: self.answers.clone(),
            current_question_index: self.question_idx,
            current_session: Some(self.current_session().id),
            attempt_id: Some(self.attempt_id),
            time_left: Some(self.time_left),
        }
    }
}
