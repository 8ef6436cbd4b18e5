// ============================================================
// Layer 4 — Data Preparation
// ============================================================
// Everything that happens to the question text before it
// reaches the tokenizer:
//
//   raw question
//       │
//       ▼
//   Preprocessor      → trim, lower-case, add task marker
//       │
//       ▼
//   Tokenizer         → token IDs (Layer 6 loads it, Layer 5 uses it)

/// Normalises the question and adds the task marker
pub mod preprocessor;
