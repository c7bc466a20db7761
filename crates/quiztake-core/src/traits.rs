//! Core trait definitions for the quiz backend and local storage.
//!
//! These traits are implemented by the `quiztake-client` and `quiztake-store`
//! crates respectively. The engine only ever sees the trait objects, so tests
//! can substitute scripted fakes for both.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{AttemptDetail, AttemptHandle, CompletionOutcome, Quiz};

/// Storage key holding the bearer token attached to API requests.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key holding the refresh token sent on logout.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Local key-value storage for tokens and per-quiz progress snapshots.
///
/// Values are opaque strings; snapshot helpers layer JSON on top. Writes
/// replace the whole value for a key, there is no partial update.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Trait for the quiz backend the attempt flow talks to.
#[async_trait]
pub trait QuizService: Send + Sync {
    /// Fetch a full quiz with its sessions, questions, and options.
    async fn fetch_quiz(&self, quiz_id: Uuid) -> anyhow::Result<Quiz>;

    /// Start an attempt, or resume the existing incomplete one server-side.
    async fn start_attempt(&self, quiz_id: Uuid) -> anyhow::Result<AttemptHandle>;

    /// Persist one answer choice. Local flow state stays authoritative for
    /// display; callers decide how to treat a failure here.
    async fn submit_answer(
        &self,
        attempt_id: Uuid,
        session_id: Uuid,
        question_id: Uuid,
        option_id: Uuid,
    ) -> anyhow::Result<()>;

    /// Mark a session's sub-attempt complete and learn whether the whole
    /// quiz is now done.
    async fn complete_session(
        &self,
        attempt_id: Uuid,
        session_id: Uuid,
    ) -> anyhow::Result<CompletionOutcome>;

    /// Fetch the attempt record, including per-session answers when the
    /// backend serializes them.
    async fn fetch_attempt(&self, attempt_id: Uuid) -> anyhow::Result<AttemptDetail>;
}
