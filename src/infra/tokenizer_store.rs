// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the tokenizer that was saved next to the fine-tuned
// model. The same vocabulary must be used at inference time as
// during fine-tuning, so there is no fallback to a stock one.
//
// Only the HuggingFace fast-tokenizer format (tokenizer.json) is
// readable here. A directory saved from the slow SentencePiece
// tokenizer contains `spiece.model` instead; convert it once with
//   T5TokenizerFast.from_pretrained(dir).save_pretrained(dir)
// or pass an explicit path with --tokenizer.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

const SENTENCEPIECE_FILE: &str = "spiece.model";

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the tokenizer from its JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        if !self.path.is_file() {
            return Err(self.missing_error());
        }
        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow!("Cannot load tokenizer from '{}': {}", self.path.display(), e)
        })?;
        tracing::info!(
            "Tokenizer loaded from '{}' ({} entries)",
            self.path.display(),
            tokenizer.get_vocab_size(true)
        );
        Ok(tokenizer)
    }

    fn missing_error(&self) -> anyhow::Error {
        let has_spiece = self
            .path
            .parent()
            .is_some_and(|dir| dir.join(SENTENCEPIECE_FILE).is_file());
        if has_spiece {
            anyhow!(
                "Tokenizer '{}' not found, but '{}' is present. \
                 Convert it to tokenizer.json or pass --tokenizer.",
                self.path.display(),
                SENTENCEPIECE_FILE
            )
        } else {
            anyhow!("Tokenizer '{}' not found", self.path.display())
        }
    }
}
