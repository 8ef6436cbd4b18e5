// ============================================================
// Layer 6 — Checkpoint Directory
// ============================================================
// Locates the files of a fine-tuned model saved with the usual
// "save_pretrained" layout:
//
//   best_model/
//     config.json                    ← architecture + special token IDs
//     model.safetensors              ← weights (single file), or
//     model.safetensors.index.json   ← weights (sharded), or
//     pytorch_model.bin              ← weights (legacy pickle)
//     tokenizer.json                 ← HuggingFace fast tokenizer
//
// Weight formats are tried in the order listed above.
// Nothing here is ever written: the directory is read-only input.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const SAFETENSORS_INDEX_FILE: &str = "model.safetensors.index.json";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model directory '{0}' does not exist")]
    MissingDir(PathBuf),

    #[error("no model weights in '{0}' (expected model.safetensors, model.safetensors.index.json or pytorch_model.bin)")]
    NoWeights(PathBuf),
}

/// Where the weights live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightFiles {
    Safetensors(Vec<PathBuf>),
    Pytorch(PathBuf),
}

#[derive(Deserialize)]
struct SafetensorsIndex {
    weight_map: HashMap<String, String>,
}

/// A model directory on disk.
#[derive(Debug, Clone)]
pub struct CheckpointDir {
    dir: PathBuf,
}

impl CheckpointDir {
    /// Point at an existing directory.
    /// Fails early so a typo in --model-dir is reported before anything loads.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ArtifactError::MissingDir(dir).into());
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Default location of the tokenizer inside the directory
    pub fn tokenizer_path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Deserialise `config.json`.
    pub fn load_config<T: DeserializeOwned>(&self) -> Result<T> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read model config '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid model config '{}'", path.display()))
    }

    /// Find the weight files, preferring safetensors.
    pub fn weight_files(&self) -> Result<WeightFiles> {
        let single = self.dir.join(SAFETENSORS_FILE);
        if single.is_file() {
            return Ok(WeightFiles::Safetensors(vec![single]));
        }

        let index = self.dir.join(SAFETENSORS_INDEX_FILE);
        if index.is_file() {
            return Ok(WeightFiles::Safetensors(self.sharded_files(&index)?));
        }

        let pth = self.dir.join(PYTORCH_FILE);
        if pth.is_file() {
            return Ok(WeightFiles::Pytorch(pth));
        }

        Err(ArtifactError::NoWeights(self.dir.clone()).into())
    }

    /// Unique shard files named by a safetensors index, in name order
    fn sharded_files(&self, index: &Path) -> Result<Vec<PathBuf>> {
        let json = fs::read_to_string(index)
            .with_context(|| format!("Cannot read '{}'", index.display()))?;
        let index: SafetensorsIndex = serde_json::from_str(&json)
            .with_context(|| format!("Invalid safetensors index '{}'", index.display()))?;

        let shards: BTreeSet<String> = index.weight_map.into_values().collect();
        Ok(shards.into_iter().map(|f| self.dir.join(f)).collect())
    }
}
