// ============================================================
// Layer 5 — Inferencer
// ============================================================
// prepared input → token IDs → encoder → beam search → text
use anyhow::{anyhow, bail, Result};
use std::sync::Mutex;
use tokenizers::Tokenizer;

use crate::domain::traits::AnswerGenerator;
use crate::infra::checkpoint::CheckpointDir;
use crate::ml::beam_search::{beam_search, GenerationConfig};
use crate::ml::model::{select_device, T5Model};

pub struct Inferencer {
    // Generation is serialised: one question at a time
    model:      Mutex<T5Model>,
    tokenizer:  Tokenizer,
    generation: GenerationConfig,
}

impl Inferencer {
    pub fn from_checkpoint(
        ckpt:       &CheckpointDir,
        tokenizer:  Tokenizer,
        generation: GenerationConfig,
        cpu_only:   bool,
    ) -> Result<Self> {
        // Fail before the weights are read
        generation.validate()?;
        let device = select_device(cpu_only)?;
        let model  = T5Model::load(ckpt, &device)?;
        tracing::info!("Model loaded from '{}'", ckpt.path().display());
        Self::new(model, tokenizer, generation)
    }

    pub fn new(model: T5Model, tokenizer: Tokenizer, generation: GenerationConfig) -> Result<Self> {
        generation.validate()?;
        Ok(Self { model: Mutex::new(model), tokenizer, generation })
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn predict(&self, model_input: &str) -> Result<String> {
        // Special tokens on: the T5 post-processor appends </s>
        let encoding = self
            .tokenizer
            .encode(model_input, true)
            .map_err(|e| anyhow!("Tokenisation failed: {e}"))?;
        let input_ids = encoding.get_ids();
        if input_ids.is_empty() {
            bail!("Tokenizer produced no tokens");
        }

        let output_ids = {
            let mut model = self
                .model
                .lock()
                .map_err(|_| anyhow!("Model is unavailable after an earlier failure"))?;
            let tokens         = model.search_tokens();
            let encoder_output = model.encode(input_ids)?;
            let mut scorer     = model.decoder_step(&encoder_output);
            beam_search(&mut scorer, tokens, &self.generation)?
        };

        let answer = self
            .tokenizer
            .decode(&output_ids, true)
            .map_err(|e| anyhow!("Decode failed: {e}"))?;

        tracing::debug!(
            "input_tokens={} output_tokens={} answer='{}'",
            input_ids.len(),
            output_ids.len(),
            answer
        );

        Ok(answer)
    }
}

impl AnswerGenerator for Inferencer {
    fn generate(&self, model_input: &str) -> Result<String> {
        self.predict(model_input)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::tests::{tiny_config, zero_model};

    /// Eight-entry WordLevel tokenizer with a T5-style `</s>` suffix.
    /// `first` is the entry at id 0, the id a zero-weight model always picks.
    fn tokenizer(first: &str, first_is_special: bool) -> Tokenizer {
        let json = format!(
            r#"{{
                "version": "1.0",
                "truncation": null,
                "padding": null,
                "added_tokens": [
                    {{"id": 0, "content": "{first}", "single_word": false, "lstrip": false,
                      "rstrip": false, "normalized": false, "special": {first_is_special}}},
                    {{"id": 1, "content": "</s>", "single_word": false, "lstrip": false,
                      "rstrip": false, "normalized": false, "special": true}}
                ],
                "normalizer": null,
                "pre_tokenizer": {{"type": "Whitespace"}},
                "post_processor": {{
                    "type": "TemplateProcessing",
                    "single": [{{"Sequence": {{"id": "A", "type_id": 0}}}},
                               {{"SpecialToken": {{"id": "</s>", "type_id": 0}}}}],
                    "pair": [{{"Sequence": {{"id": "A", "type_id": 0}}}},
                             {{"Sequence": {{"id": "B", "type_id": 0}}}},
                             {{"SpecialToken": {{"id": "</s>", "type_id": 0}}}}],
                    "special_tokens": {{"</s>": {{"id": "</s>", "ids": [1], "tokens": ["</s>"]}}}}
                }},
                "decoder": null,
                "model": {{
                    "type": "WordLevel",
                    "vocab": {{"{first}": 0, "</s>": 1, "<unk>": 2, "question": 3,
                              ":": 4, "what": 5, "is": 6, "?": 7}},
                    "unk_token": "<unk>"
                }}
            }}"#
        );
        json.parse().unwrap()
    }

    fn short_generation() -> GenerationConfig {
        GenerationConfig { num_beams: 1, max_length: 4, ..Default::default() }
    }

    #[test]
    fn test_input_gets_closing_eos() {
        let tok = tokenizer("<pad>", true);
        let enc = tok.encode("question: what is pms?", true).unwrap();
        assert_eq!(enc.get_ids(), &[3, 4, 5, 6, 2, 7, 1]);
    }

    #[test]
    fn test_special_tokens_are_skipped_on_decode() {
        let inferencer = Inferencer::new(
            zero_model(tiny_config(None)),
            tokenizer("<pad>", true),
            short_generation(),
        )
        .unwrap();

        // The model only ever emits <pad>, which is special
        assert_eq!(inferencer.predict("question: what is pms?").unwrap(), "");
    }

    #[test]
    fn test_plain_tokens_are_decoded() {
        let inferencer = Inferencer::new(
            zero_model(tiny_config(None)),
            tokenizer("period", false),
            short_generation(),
        )
        .unwrap();

        let answer = inferencer.generate("question: what is pms?").unwrap();
        assert_eq!(answer, "period period period");
    }

    #[test]
    fn test_decoded_text_is_returned_verbatim() {
        let inferencer = Inferencer::new(
            zero_model(tiny_config(None)),
            tokenizer("cramp ", false),
            short_generation(),
        )
        .unwrap();

        let answer = inferencer.predict("question: what is pms?").unwrap();
        assert_eq!(answer, "cramp  cramp  cramp ");
    }

    #[test]
    fn test_rejects_invalid_generation_config() {
        let config = GenerationConfig { num_beams: 0, ..Default::default() };
        let result = Inferencer::new(
            zero_model(tiny_config(None)),
            tokenizer("<pad>", true),
            config,
        );
        assert!(result.is_err());
    }
}
