//! Core data model types for quiztake.
//!
//! These mirror the REST payloads of the learning-management backend. Field
//! names are the wire names; unknown fields in responses are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz as delivered by the quiz list and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Whether the quiz is visible to students at all.
    #[serde(default)]
    pub is_published: bool,
    /// Whether the server shuffles question order per attempt.
    #[serde(default)]
    pub randomize_questions: bool,
    /// Whether students may see their score after finishing.
    #[serde(default)]
    pub show_result: bool,
    /// Whether students may see the correct answers after finishing.
    #[serde(default)]
    pub show_answers: bool,
    /// Start of the publish window, if bounded.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the publish window, if bounded.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// The timed sections of this quiz, taken strictly in order.
    #[serde(default)]
    pub sessions: Vec<QuizSession>,
    /// Server-computed question count across all sessions.
    #[serde(default)]
    pub total_questions: u32,
    /// Server-computed total duration in minutes.
    #[serde(default)]
    pub total_duration: u32,
}

impl Quiz {
    /// Normalize session, question, and option ordering by their `order`
    /// fields.
    ///
    /// The backend declares this ordering in its serializers, but the flow
    /// depends on it, so it is enforced here instead of assumed.
    pub fn sorted(mut self) -> Self {
        self.sessions.sort_by_key(|s| s.order);
        for session in &mut self.sessions {
            session.questions.sort_by_key(|q| q.order);
            for question in &mut session.questions {
                question.options.sort_by_key(|o| o.order);
            }
        }
        self
    }

    /// Index of a session within the ordered session list.
    pub fn session_index(&self, session_id: Uuid) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == session_id)
    }
}

/// One timed section of a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub name: String,
    /// Time limit in minutes.
    pub duration: u32,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuizSession {
    /// Time limit in seconds, as counted down by the session timer.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration) * 60
    }
}

/// A single question within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// One selectable option of a question.
///
/// The backend serializes `is_correct` to students before submission; that is
/// part of the existing wire contract and is carried here unchanged. The
/// results view relies on it to mark correct answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub order: u32,
}

/// Response of the start-attempt endpoint.
///
/// The server returns the existing incomplete attempt for this student and
/// quiz if there is one, so starting twice yields the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptHandle {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

/// Response of the complete-session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    #[serde(default)]
    pub message: String,
    /// True once every session of the quiz has a completed sub-attempt.
    pub is_quiz_completed: bool,
}

/// A nested `{"id": ...}` object reference inside attempt payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Uuid,
}

/// Full attempt record as returned by the attempt-detail endpoint.
///
/// `session_attempts` and the student fields are optional because older
/// backend revisions serialize the attempt without them; the results renderer
/// degrades gracefully when they are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptDetail {
    pub id: Uuid,
    /// The quiz this attempt belongs to.
    pub quiz: Uuid,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    pub started_at: DateTime<Utc>,
    /// Set once the last session is completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Final score percentage, graded server-side on completion.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub session_attempts: Vec<SessionAttemptDetail>,
}

impl AttemptDetail {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Answers recorded for one session, if the payload carries them.
    pub fn session_answers(&self, session_id: Uuid) -> Option<&[AnswerDetail]> {
        self.session_attempts
            .iter()
            .find(|sa| sa.session.id == session_id)
            .map(|sa| sa.answers.as_slice())
    }
}

/// Per-session sub-attempt inside an attempt-detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAttemptDetail {
    pub session: EntityRef,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub answers: Vec<AnswerDetail>,
}

/// One recorded answer inside a sub-attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub question: EntityRef,
    /// None when the student never picked an option for this question.
    #[serde(default)]
    pub selected_option: Option<EntityRef>,
}

/// An enrolled class as returned by the enrolled-classes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRoom {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    /// Six-character join code.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub teacher: Option<UserProfile>,
}

/// Account fields shared by the login and current-user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id. Accounts use sequential ids, unlike quiz entities.
    pub id: i64,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
}

impl UserProfile {
    /// Display name, falling back through the available fields.
    pub fn display_name(&self) -> &str {
        if !self.full_name.is_empty() {
            &self.full_name
        } else if !self.username.is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}
