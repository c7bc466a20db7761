//! quiztake-report — Attempt result summaries.
//!
//! Builds a view model from a quiz and its attempt, then renders it as
//! terminal text or markdown.

pub mod markdown;
pub mod summary;
pub mod text;

pub use markdown::render_markdown;
pub use summary::{
    Headline, OptionMark, OptionReview, QuestionReview, ResultSummary, SessionReview,
};
pub use text::render_text;
