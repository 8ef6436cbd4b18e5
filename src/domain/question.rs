// ============================================================
// Layer 3 — Question Domain Type
// ============================================================
// The one value that flows through the whole pipeline:
// the free-text question typed by the user.
//
// The raw text is kept exactly as typed — the reply echoes it
// back untrimmed. Normalisation for the model happens in the
// data layer (see data::preprocessor).

/// A question as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    raw: String,
}

impl Question {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The text exactly as submitted, surrounding whitespace included
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True when nothing is left after trimming.
    /// Blank questions are answered locally and never reach the model.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl From<&str> for Question {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Question {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
