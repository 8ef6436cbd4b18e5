// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem:
//
//   checkpoint.rs      — Model directory layout
//                        Finds config.json and the weight files
//                        (single or sharded safetensors, or a
//                        legacy PyTorch pickle).
//
//   tokenizer_store.rs — Tokenizer loading
//                        Loads the tokenizer.json saved next to
//                        the model, with a hint when only a
//                        SentencePiece model is present.
//
//   notebook_store.rs  — Notebook files
//                        Reads an .ipynb as untyped JSON and
//                        writes it back with 2-space indentation.

/// Model directory layout and config loading
pub mod checkpoint;

/// Tokenizer loading
pub mod tokenizer_store;

/// Notebook JSON read/write
pub mod notebook_store;
