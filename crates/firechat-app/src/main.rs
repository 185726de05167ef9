mod app;
mod cli;
mod config;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; missing file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.command {
        Command::Chat {
            api_key,
            model,
            api_base,
            functions,
            media_dir,
            log_dir,
            no_log,
            sampling,
        } => {
            let registry = config::build_registry(&functions, &api_key, &api_base)?;
            app::run_chat(
                app::ChatOptions {
                    api_key,
                    model,
                    api_base,
                    media_dir,
                    log_dir,
                    no_log,
                    settings: sampling.to_settings(),
                },
                registry,
            )
            .await
        }
        Command::Transcribe {
            file,
            api_key,
            language,
            endpoint,
        } => app::run_transcribe(api_key, endpoint, language, &file).await,
    }
}
