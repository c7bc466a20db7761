//! Per-quiz progress snapshots.
//!
//! The snapshot is the crash-recovery record of an attempt in progress. It is
//! written wholesale after every mutation (answer, navigation, timer tick)
//! and read back once at load time. The JSON layout keeps the camelCase keys
//! of the previous web client, so snapshots written by it parse unchanged.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::traits::KeyValueStore;

/// Saved progress of one attempt, keyed by quiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSnapshot {
    /// Chosen option per question, for the session in progress only.
    pub answers: HashMap<Uuid, Uuid>,
    /// Index of the question the student was looking at.
    pub current_question_index: usize,
    /// Id of the session in progress.
    pub current_session: Option<Uuid>,
    /// Attempt id at save time. The server-resumed attempt wins on conflict.
    pub attempt_id: Option<Uuid>,
    /// Remaining seconds on the session timer.
    pub time_left: Option<u64>,
}

/// Storage key for a quiz's snapshot.
pub fn progress_key(quiz_id: Uuid) -> String {
    format!("quiz_{quiz_id}_progress")
}

/// Load the snapshot for a quiz, if a readable one exists.
///
/// Storage failures and corrupt JSON are logged and treated as no snapshot;
/// they must never block loading the quiz itself.
pub fn load(store: &dyn KeyValueStore, quiz_id: Uuid) -> Option<ProgressSnapshot> {
    let key = progress_key(quiz_id);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("failed to read progress for quiz {quiz_id}: {e:#}");
            return None;
        }
    };
    match serde_json::from_str::<ProgressSnapshot>(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("discarding corrupt progress for quiz {quiz_id}: {e}");
            None
        }
    }
}

/// Save a snapshot, replacing any previous one for the quiz.
pub fn save(store: &dyn KeyValueStore, quiz_id: Uuid, snapshot: &ProgressSnapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot).context("failed to serialize progress")?;
    store
        .set(&progress_key(quiz_id), &json)
        .with_context(|| format!("failed to save progress for quiz {quiz_id}"))
}

/// Remove the snapshot for a quiz. Called once the quiz is completed.
pub fn clear(store: &dyn KeyValueStore, quiz_id: Uuid) -> Result<()> {
    store
        .remove(&progress_key(quiz_id))
        .with_context(|| format!("failed to clear progress for quiz {quiz_id}"))
}
