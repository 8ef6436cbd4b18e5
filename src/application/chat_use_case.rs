// ============================================================
// Layer 2 — Chat Use Case
// ============================================================
// One question in, one Markdown string out:
//
//   blank question   → fixed prompt (model never called)
//   model answers    → "**Question:** … **Answer:** …"
//   anything fails   → "Sorry, I encountered an error: …"
//
// There is no retry. Each call is independent; the only shared
// state is the read-only model behind the AnswerGenerator.

use anyhow::Result;
use std::{path::PathBuf, sync::Arc};

use crate::data::preprocessor::Preprocessor;
use crate::domain::question::Question;
use crate::domain::reply::ChatReply;
use crate::domain::traits::AnswerGenerator;
use crate::infra::{checkpoint::CheckpointDir, tokenizer_store::TokenizerStore};
use crate::ml::{beam_search::GenerationConfig, inferencer::Inferencer};

// ─── Model Settings ──────────────────────────────────────────────────────────
// Everything needed to load the model once at startup.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Directory produced by save_pretrained after fine-tuning
    pub model_dir:  PathBuf,
    /// tokenizer.json outside the model directory, if any
    pub tokenizer:  Option<PathBuf>,
    pub cpu_only:   bool,
    pub generation: GenerationConfig,
}

pub struct ChatUseCase {
    generator:    Arc<dyn AnswerGenerator>,
    preprocessor: Preprocessor,
}

impl ChatUseCase {
    pub fn new(generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { generator, preprocessor: Preprocessor::new() }
    }

    /// Load tokenizer and model, then wrap them in a use case.
    pub fn load(settings: &ModelSettings) -> Result<Self> {
        let ckpt = CheckpointDir::open(&settings.model_dir)?;
        let tokenizer_path = settings
            .tokenizer
            .clone()
            .unwrap_or_else(|| ckpt.tokenizer_path());
        let tokenizer  = TokenizerStore::new(tokenizer_path).load()?;
        let inferencer = Inferencer::from_checkpoint(
            &ckpt,
            tokenizer,
            settings.generation.clone(),
            settings.cpu_only,
        )?;
        tracing::info!(
            "Generation: num_beams={} max_length={} early_stopping={}",
            inferencer.generation().num_beams,
            inferencer.generation().max_length,
            inferencer.generation().early_stopping
        );
        Ok(Self::new(Arc::new(inferencer)))
    }

    /// Answer a question, never failing: errors become a reply.
    pub fn respond(&self, question: &str) -> String {
        self.reply(&Question::new(question)).to_string()
    }

    pub fn reply(&self, question: &Question) -> ChatReply {
        if question.is_blank() {
            return ChatReply::EmptyQuestion;
        }

        let model_input = self.preprocessor.prepare(question);
        match self.generator.generate(&model_input) {
            Ok(answer) => ChatReply::answer(question, answer),
            Err(e) => {
                tracing::warn!("Generation failed: {e:#}");
                ChatReply::failure(e)
            }
        }
    }
}
