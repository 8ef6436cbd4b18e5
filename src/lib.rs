//! Menstrual health question answering over a fine-tuned T5 model,
//! plus the `fix-notebook` widget-metadata cleanup tool.
//!
//! Layers, outermost first:
//! - `cli`, `web`  — presentation
//! - `application` — use cases
//! - `domain`      — plain types and traits
//! - `data`        — question preprocessing
//! - `ml`          — model, beam search, inference (all candle code)
//! - `infra`       — filesystem access

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
pub mod web;
