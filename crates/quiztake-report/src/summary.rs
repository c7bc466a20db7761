//! Result view model.
//!
//! Joins an attempt against its quiz structure into plain rows the
//! renderers can walk without touching the data model again.

use chrono::{DateTime, Utc};

use quiztake_core::model::{AttemptDetail, Quiz};

/// What the result page leads with, driven by the quiz flags.
#[derive(Debug, Clone, PartialEq)]
pub enum Headline {
    /// `show_result` is off; nothing beyond the review is disclosed.
    Withheld,
    /// `show_result` and `show_answers` are both on; percentage score.
    Score(f64),
    /// `show_result` without `show_answers`; confirmation without a score.
    SubmittedOnly,
}

/// How one answer option is marked in the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// The student picked this option and it is correct.
    SelectedCorrect,
    /// The student picked this option and it is wrong.
    SelectedWrong,
    /// The correct option the student did not pick.
    CorrectUnselected,
    Unmarked,
}

#[derive(Debug, Clone)]
pub struct OptionReview {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone)]
pub struct QuestionReview {
    pub text: String,
    pub options: Vec<OptionReview>,
}

#[derive(Debug, Clone)]
pub struct SessionReview {
    pub name: String,
    pub questions: Vec<QuestionReview>,
}

/// Everything the renderers need for one attempt.
#[derive(Debug, Clone)]
pub struct ResultSummary {
    pub quiz_title: String,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub headline: Headline,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sessions: Vec<SessionReview>,
}

impl ResultSummary {
    /// Build the summary for an attempt.
    ///
    /// The review rows are always built, whatever the headline says; a
    /// missing score renders as zero. Attempts that carry no per-session
    /// answers produce rows with only the correct options marked.
    pub fn build(quiz: &Quiz, attempt: &AttemptDetail) -> Self {
        let headline = if !quiz.show_result {
            Headline::Withheld
        } else if quiz.show_answers {
            Headline::Score(attempt.score.unwrap_or(0.0))
        } else {
            Headline::SubmittedOnly
        };

        let sessions = quiz
            .sessions
            .iter()
            .map(|session| {
                let answers = attempt.session_answers(session.id).unwrap_or(&[]);
                let questions = session
                    .questions
                    .iter()
                    .map(|question| {
                        let selected = answers
                            .iter()
                            .find(|a| a.question.id == question.id)
                            .and_then(|a| a.selected_option.as_ref())
                            .map(|o| o.id);
                        let options = question
                            .options
                            .iter()
                            .map(|option| {
                                let picked = selected == Some(option.id);
                                let mark = match (picked, option.is_correct) {
                                    (true, true) => OptionMark::SelectedCorrect,
                                    (true, false) => OptionMark::SelectedWrong,
                                    (false, true) => OptionMark::CorrectUnselected,
                                    (false, false) => OptionMark::Unmarked,
                                };
                                OptionReview {
                                    text: option.text.clone(),
                                    mark,
                                }
                            })
                            .collect();
                        QuestionReview {
                            text: question.text.clone(),
                            options,
                        }
                    })
                    .collect();
                SessionReview {
                    name: session.name.clone(),
                    questions,
                }
            })
            .collect();

        Self {
            quiz_title: quiz.title.clone(),
            student_name: attempt.student_name.clone(),
            student_email: attempt.student_email.clone(),
            headline,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
            sessions,
        }
    }
}
