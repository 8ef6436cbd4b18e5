// ============================================================
// Layer 3 — Chat Reply
// ============================================================
// Every request ends in exactly one of three user-facing strings.
// The strings are Markdown; the web layer renders them.

use std::fmt;

use crate::domain::question::Question;

/// Shown when the question box is empty or whitespace-only
pub const EMPTY_QUESTION_PROMPT: &str = "Please enter a question about menstrual health.";

/// The outcome of one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Blank input, answered locally
    EmptyQuestion,

    /// The model produced an answer.
    /// `question` is the original, untrimmed text.
    Answer { question: String, answer: String },

    /// Tokenisation or generation failed; holds the error's display text
    Failure { message: String },
}

impl ChatReply {
    pub fn answer(question: &Question, answer: impl Into<String>) -> Self {
        Self::Answer {
            question: question.raw().to_string(),
            answer:   answer.into(),
        }
    }

    pub fn failure(err: impl fmt::Display) -> Self {
        Self::Failure { message: err.to_string() }
    }
}

impl fmt::Display for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuestion => f.write_str(EMPTY_QUESTION_PROMPT),
            Self::Answer { question, answer } => {
                write!(f, "**Question:** {question}\n\n**Answer:** {answer}")
            }
            Self::Failure { message } => {
                write!(f, "Sorry, I encountered an error: {message}. Please try again.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_format() {
        let reply = ChatReply::answer(&Question::new(" What is PMS? "), "premenstrual syndrome");
        assert_eq!(
            reply.to_string(),
            "**Question:**  What is PMS? \n\n**Answer:** premenstrual syndrome"
        );
    }

    #[test]
    fn test_failure_format() {
        let reply = ChatReply::failure("tensor shape mismatch");
        assert_eq!(
            reply.to_string(),
            "Sorry, I encountered an error: tensor shape mismatch. Please try again."
        );
    }

    #[test]
    fn test_empty_prompt() {
        assert_eq!(ChatReply::EmptyQuestion.to_string(), EMPTY_QUESTION_PROMPT);
    }
}
