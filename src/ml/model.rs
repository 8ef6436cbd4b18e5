// ============================================================
// Layer 5 — T5 Model
// ============================================================
// Wraps candle-transformers' T5ForConditionalGeneration.
//
// The encoder runs once per question. The decoder runs once per
// beam per step, each time over the full decoded prefix: the
// candle KV cache belongs to a single sequence and cannot follow
// beams as they are reordered, so it is switched off.

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};

use crate::domain::traits::StepScorer;
use crate::infra::checkpoint::{CheckpointDir, WeightFiles};
use crate::ml::beam_search::SearchTokens;

pub struct T5Model {
    inner:  T5ForConditionalGeneration,
    device: Device,
    tokens: SearchTokens,
}

impl T5Model {
    /// Build the network from `config.json` and load its weights.
    pub fn load(ckpt: &CheckpointDir, device: &Device) -> Result<Self> {
        let config: T5Config = ckpt.load_config()?;

        let vb = match ckpt.weight_files()? {
            WeightFiles::Safetensors(paths) => {
                tracing::info!("Loading {} safetensors file(s)", paths.len());
                // SAFETY: the weight files are opened read-only and must not be
                // modified while the process is running.
                unsafe { VarBuilder::from_mmaped_safetensors(&paths, DType::F32, device) }
                    .context("Cannot memory-map safetensors weights")?
            }
            WeightFiles::Pytorch(path) => {
                tracing::info!("Loading PyTorch weights from '{}'", path.display());
                VarBuilder::from_pth(&path, DType::F32, device)
                    .with_context(|| format!("Cannot read '{}'", path.display()))?
            }
        };

        Self::from_var_builder(config, vb, device)
    }

    /// Build the network from an already opened set of weights.
    pub fn from_var_builder(mut config: T5Config, vb: VarBuilder, device: &Device) -> Result<Self> {
        config.use_cache = false;
        let tokens = search_tokens_for(&config);

        let inner = T5ForConditionalGeneration::load(vb, &config)
            .context("Weights do not match the architecture in config.json")?;

        tracing::info!(
            "T5 ready: d_model={}, layers={}, vocab={}",
            config.d_model,
            config.num_layers,
            config.vocab_size
        );

        Ok(Self { inner, device: device.clone(), tokens })
    }

    pub fn search_tokens(&self) -> SearchTokens {
        self.tokens
    }

    /// Run the encoder over one tokenised input.
    /// Returns hidden states of shape [1, seq_len, d_model].
    pub fn encode(&mut self, input_ids: &[u32]) -> Result<Tensor> {
        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        Ok(self.inner.encode(&input)?)
    }

    /// A StepScorer that decodes against `encoder_output`.
    pub fn decoder_step<'a>(&'a mut self, encoder_output: &'a Tensor) -> DecoderStep<'a> {
        DecoderStep {
            model: &mut self.inner,
            device: &self.device,
            encoder_output,
        }
    }
}

/// One decoder invocation per call; borrows the model for the
/// duration of a single search.
pub struct DecoderStep<'a> {
    model:          &'a mut T5ForConditionalGeneration,
    device:         &'a Device,
    encoder_output: &'a Tensor,
}

impl StepScorer for DecoderStep<'_> {
    fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>> {
        let decoder_input = Tensor::new(prefix, self.device)?.unsqueeze(0)?;
        // [1, vocab] → [vocab]
        let logits = self
            .model
            .decode(&decoder_input, self.encoder_output)?
            .squeeze(0)?
            .to_dtype(DType::F32)?;
        Ok(logits.to_vec1::<f32>()?)
    }
}

/// Decoding starts from `decoder_start_token_id`, or the pad token
/// when the config leaves it unset.
fn search_tokens_for(config: &T5Config) -> SearchTokens {
    SearchTokens {
        decoder_start: config.decoder_start_token_id.unwrap_or(config.pad_token_id) as u32,
        eos:           config.eos_token_id as u32,
    }
}

/// First CUDA device when one is available, CPU otherwise
pub fn select_device(cpu_only: bool) -> Result<Device> {
    if cpu_only {
        return Ok(Device::Cpu);
    }
    let device = Device::cuda_if_available(0)?;
    tracing::info!("Using device: {:?}", device);
    Ok(device)
}
