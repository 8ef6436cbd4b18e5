// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish a
// specific goal (answering a question, fixing a notebook).
//
// Rules for this layer:
//   - No tensor code here
//   - No HTML or printing here (that's Layer 1)
//   - No direct file access (that's Layer 6)
//   - Only workflow coordination

// The question-answering workflow
pub mod chat_use_case;

// The notebook widget-metadata cleanup
pub mod fix_notebook_use_case;
