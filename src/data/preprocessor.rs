// ============================================================
// Layer 4 — Question Preprocessor
// ============================================================
// Turns the user's raw question into the exact string the
// model was fine-tuned on.
//
// Steps (applied in order):
//   1. Trim leading/trailing whitespace
//   2. Lower-case the whole question
//   3. Prepend the task marker "question: "
//
// Example:
//   "  What Is PCOS? "  →  "question: what is pcos?"
//
// The training data was prepared the same way, so any change
// here silently degrades answer quality.

use crate::domain::question::Question;

/// Task marker prepended to every model input
pub const TASK_PREFIX: &str = "question: ";

pub struct Preprocessor {
    prefix: String,
}

impl Preprocessor {
    /// Create a Preprocessor using the standard task marker
    pub fn new() -> Self {
        Self::with_prefix(TASK_PREFIX)
    }

    /// Create a Preprocessor with a custom task marker.
    /// Only useful for models fine-tuned with a different prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Build the model input for a question.
    pub fn prepare(&self, question: &Question) -> String {
        let normalised = question.raw().trim().to_lowercase();
        let mut out = String::with_capacity(self.prefix.len() + normalised.len());
        out.push_str(&self.prefix);
        out.push_str(&normalised);
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        let p = Preprocessor::new();
        assert_eq!(
            p.prepare(&Question::new("  What Is PCOS?  ")),
            "question: what is pcos?"
        );
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let p = Preprocessor::new();
        assert_eq!(
            p.prepare(&Question::new("how  long\nis a cycle")),
            "question: how  long\nis a cycle"
        );
    }

    #[test]
    fn test_unicode_lowercase() {
        let p = Preprocessor::new();
        assert_eq!(p.prepare(&Question::new("ÉNDOMÉTRIOSE")), "question: éndométriose");
    }

    #[test]
    fn test_custom_prefix() {
        let p = Preprocessor::with_prefix("q: ");
        assert_eq!(p.prepare(&Question::new("Hi")), "q: hi");
    }
}
