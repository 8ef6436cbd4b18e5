// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Two seams keep the neural network out of everything else:
//
//   AnswerGenerator — prepared model input in, answer text out.
//                     The application layer only ever talks to
//                     this trait, so the chat flow is testable
//                     without model weights.
//
//   StepScorer      — one decoder step: given the tokens decoded
//                     so far, score every vocabulary entry.
//                     Beam search drives this trait, so the search
//                     itself is testable with a fake scorer.

use anyhow::Result;

// ─── AnswerGenerator ──────────────────────────────────────────────────────────
/// Any component that turns a prepared model input into an answer.
///
/// Implementations:
///   - Inferencer → tokenizer + T5 + beam search
///   - test doubles in the application and web tests
pub trait AnswerGenerator: Send + Sync {
    /// `model_input` has already been normalised and prefixed
    /// (see data::preprocessor::Preprocessor::prepare).
    fn generate(&self, model_input: &str) -> Result<String>;
}

// ─── StepScorer ───────────────────────────────────────────────────────────────
/// Scores the next token of a partially decoded sequence.
pub trait StepScorer {
    /// Raw (unnormalised) logits over the whole vocabulary for the
    /// token that follows `prefix`. `prefix` always starts with the
    /// decoder start token.
    fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>>;
}
