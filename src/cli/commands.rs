// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `serve` and `ask`
// and all their configurable flags.
//
// Every model/server flag can also come from the environment
// (QA_MODEL_DIR, QA_HOST, QA_PORT, ...), which is convenient in
// containers where the command line is fixed.

use clap::{ArgAction, Args, Subcommand};
use std::path::PathBuf;

use crate::application::chat_use_case::ModelSettings;
use crate::ml::beam_search::GenerationConfig;
use crate::web::ServerConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chatbot web page
    Serve(ServeArgs),

    /// Answer one question on the command line
    Ask(AskArgs),
}

/// Where the model lives and how answers are decoded.
/// Shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Directory with config.json, weights and tokenizer.json
    #[arg(long, env = "QA_MODEL_DIR", default_value = "best_model")]
    pub model_dir: PathBuf,

    /// tokenizer.json to use instead of the one in --model-dir
    #[arg(long, env = "QA_TOKENIZER")]
    pub tokenizer: Option<PathBuf>,

    /// Never use a GPU, even when one is available
    #[arg(long)]
    pub cpu: bool,

    /// Number of beams kept alive while decoding
    #[arg(long, env = "QA_NUM_BEAMS", default_value_t = 4)]
    pub num_beams: usize,

    /// Maximum answer length in tokens (decoder start token included)
    #[arg(long, env = "QA_MAX_LENGTH", default_value_t = 64)]
    pub max_length: usize,

    /// Stop once num_beams complete answers have been found
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub early_stopping: bool,

    /// Exponent on answer length when ranking finished answers
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub length_penalty: f32,
}

/// Convert CLI ModelArgs into the application-layer ModelSettings.
/// The application layer never sees clap types.
impl From<ModelArgs> for ModelSettings {
    fn from(a: ModelArgs) -> Self {
        ModelSettings {
            model_dir:  a.model_dir,
            tokenizer:  a.tokenizer,
            cpu_only:   a.cpu,
            generation: GenerationConfig {
                num_beams:      a.num_beams,
                max_length:     a.max_length,
                early_stopping: a.early_stopping,
                length_penalty: a.length_penalty,
            },
        }
    }
}

/// All arguments for the `serve` command
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Interface to bind; 0.0.0.0 listens on all of them
    #[arg(long, env = "QA_HOST", default_value_t = ServerConfig::default().host)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "QA_PORT", default_value_t = ServerConfig::default().port)]
    pub port: u16,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig { host: self.host.clone(), port: self.port }
    }
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    #[arg(long)]
    pub question: String,

    #[command(flatten)]
    pub model: ModelArgs,
}
