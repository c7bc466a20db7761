//! Markdown renderer, for sharing results outside the terminal.

use crate::summary::{Headline, OptionMark, ResultSummary};

/// Render a result summary as markdown.
pub fn render_markdown(summary: &ResultSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", summary.quiz_title));
    out.push_str(&format!(
        "- **Student Name:** {}\n",
        summary.student_name.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!(
        "- **Student Email:** {}\n",
        summary.student_email.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!(
        "- **Started:** {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(completed) = summary.completed_at {
        out.push_str(&format!(
            "- **Completed:** {}\n",
            completed.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    out.push('\n');

    match &summary.headline {
        Headline::Withheld => out.push_str("*Results are not yet available.*\n"),
        Headline::Score(score) => out.push_str(&format!("**Final Score: {score}%**\n")),
        Headline::SubmittedOnly => {
            out.push_str("Result: Your answers have been submitted successfully.\n")
        }
    }

    for session in &summary.sessions {
        out.push_str(&format!("\n## {}\n\n", session.name));
        for (index, question) in session.questions.iter().enumerate() {
            out.push_str(&format!("**Q{}. {}**\n\n", index + 1, question.text));
            for option in &question.options {
                match option.mark {
                    OptionMark::SelectedCorrect => {
                        out.push_str(&format!("- \u{2705} {}\n", option.text))
                    }
                    OptionMark::SelectedWrong => {
                        out.push_str(&format!("- \u{274c} {}\n", option.text))
                    }
                    OptionMark::CorrectUnselected => {
                        out.push_str(&format!("- {} *(correct answer)*\n", option.text))
                    }
                    OptionMark::Unmarked => out.push_str(&format!("- {}\n", option.text)),
                }
            }
            out.push('\n');
        }
    }

    out
}
