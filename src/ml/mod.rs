// ============================================================
// Layer 5 — ML / Model Layer (candle)
// ============================================================
// This layer contains ALL candle specific code.
// No other layer imports from candle directly — only this one.
//
// What's in this layer:
//
//   model.rs       — The pretrained T5 encoder-decoder
//                    Loads config.json + weights and exposes
//                    one encoder pass and one decoder step
//
//   beam_search.rs — Decoding strategy
//                    Framework-free: drives any StepScorer,
//                    so it is unit-tested without weights
//
//   inferencer.rs  — The inference engine
//                    Tokenises input, runs the encoder once,
//                    beam-searches the decoder, decodes text

/// Pretrained T5 wrapper
pub mod model;

/// Beam search over a StepScorer
pub mod beam_search;

/// Inference engine — tokenizer + model + beam search
pub mod inferencer;
