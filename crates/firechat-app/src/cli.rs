use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use firechat_types::ChatSettings;

/// CLI arguments for firechat
#[derive(Parser)]
#[command(name = "firechat")]
#[command(about = "Function-calling chat and streaming transcription on the Fireworks API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive chat with external function calling
    Chat {
        /// Fireworks API key
        #[arg(long, env = "FIREWORKS_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Model identifier for chat completions
        #[arg(
            long,
            env = "FIREWORKS_CHAT_MODEL",
            default_value = "accounts/fireworks/models/firefunction-v2"
        )]
        model: String,

        /// Chat completions endpoint base URL
        #[arg(long, env = "FIREWORKS_API_BASE", default_value = firechat_api::DEFAULT_API_BASE)]
        api_base: String,

        /// Comma-separated list of functions to expose to the model.
        /// Omit to enable every function with credentials available.
        #[arg(long, env = "ACTIVE_FUNCTIONS", value_delimiter = ',')]
        functions: Vec<String>,

        /// Directory where binary function results (images) are written
        #[arg(long, value_name = "DIR", default_value = "media")]
        media_dir: PathBuf,

        /// Directory for JSONL conversation transcripts
        #[arg(long, value_name = "DIR", default_value = ".")]
        log_dir: PathBuf,

        /// Disable transcript logging
        #[arg(long)]
        no_log: bool,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Stream a WAV file to the transcription endpoint
    Transcribe {
        /// Path to the WAV file
        file: PathBuf,

        /// Fireworks API key
        #[arg(long, env = "FIREWORKS_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Spoken language hint
        #[arg(long, default_value = "en")]
        language: String,

        /// Streaming transcription endpoint
        #[arg(
            long,
            env = "FIREWORKS_STT_ENDPOINT",
            default_value = firechat_audio::DEFAULT_STREAMING_ENDPOINT
        )]
        endpoint: String,
    },
}

/// Sampling knobs sent with every chat completion.
#[derive(Args)]
pub struct SamplingArgs {
    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    pub temperature: f32,

    /// Maximum tokens generated per response
    #[arg(long, default_value_t = 1024)]
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    #[arg(long, default_value_t = 1.0)]
    pub top_p: f32,

    /// Top-k sampling cutoff
    #[arg(long, default_value_t = 50)]
    pub top_k: u32,
}

impl SamplingArgs {
    pub fn to_settings(&self) -> ChatSettings {
        ChatSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
            ..ChatSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_flags_reach_settings() {
        let cli = Cli::try_parse_from([
            "firechat",
            "chat",
            "--api-key",
            "k",
            "--temperature",
            "0.7",
            "--max-tokens",
            "256",
        ])
        .unwrap();
        let Command::Chat { sampling, .. } = cli.command else {
            panic!("expected chat subcommand");
        };
        let settings = sampling.to_settings();
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 256);
        // unset knobs keep their defaults
        assert_eq!(settings.top_p, 1.0);
        assert_eq!(settings.top_k, 50);
    }
}
