use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use firechat_api::HttpModelClient;
use firechat_audio::{transcribe_file, TranscriptionConfig};
use firechat_chat::{ChatError, Conversation, ConversationLogger, Orchestrator};
use firechat_functions::FunctionRegistry;
use firechat_types::ChatSettings;

pub struct ChatOptions {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub media_dir: PathBuf,
    pub log_dir: PathBuf,
    pub no_log: bool,
    pub settings: ChatSettings,
}

/// Run the interactive chat REPL.
pub async fn run_chat(options: ChatOptions, registry: FunctionRegistry) -> Result<()> {
    println!("{}", "🔥 firechat".bright_cyan().bold());
    println!(
        "{}",
        format!("Model: {} • endpoint: {}", options.model, options.api_base).bright_black()
    );
    if registry.is_empty() {
        println!(
            "{}",
            "No functions enabled; plain chat only.".bright_black()
        );
    } else {
        println!(
            "{}",
            format!("Functions: {}", registry.names().join(", ")).bright_black()
        );
    }
    println!(
        "{}",
        "Type 'exit' to quit, '/clear' to reset, '/functions' to list specs\n".bright_black()
    );

    let client = Arc::new(HttpModelClient::new(
        options.api_key,
        options.api_base,
        options.model,
    ));
    let mut builder = Orchestrator::builder(client, Arc::new(registry))
        .conversation(Conversation::new(options.settings))
        .media_dir(&options.media_dir);

    if !options.no_log {
        match ConversationLogger::new(&options.log_dir).await {
            Ok(logger) => {
                println!(
                    "{}",
                    format!("Transcript: {}", logger.path().display()).bright_black()
                );
                builder = builder.logger(logger);
            }
            Err(e) => eprintln!("Logging disabled: {}", e),
        }
    }
    let mut orchestrator = builder.build();

    let mut rl = DefaultEditor::new()?;
    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                if line == "/clear" {
                    orchestrator.clear();
                    println!("{} {}", "🧹".bright_cyan(), "Conversation cleared.");
                    continue;
                }
                if line == "/functions" {
                    for spec in orchestrator.functions().specs() {
                        println!("{}", serde_json::to_string_pretty(&spec)?);
                    }
                    continue;
                }

                let _ = rl.add_history_entry(line);
                match orchestrator.submit_user_text(line).await {
                    Ok(answer) => {
                        print_last_round(&orchestrator);
                        println!("{} {}\n", "Assistant:".bright_blue().bold(), answer);
                    }
                    Err(e) => print_chat_error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(e) => {
                eprintln!("{} Input error: {}", "❌".bright_red(), e);
                break;
            }
        }
    }

    orchestrator.shutdown().await;
    Ok(())
}

/// Dimmed "what was called / what it returned" block after a tool round.
fn print_last_round(orchestrator: &Orchestrator) {
    let Some(last) = orchestrator.conversation().messages().last() else {
        return;
    };
    if last.metadata.function_calls.is_empty() {
        return;
    }
    for call in &last.metadata.function_calls {
        println!(
            "{}",
            format!("  ↳ {}({})", call.name, call.arguments).bright_black()
        );
    }
    if let Some(response) = &last.metadata.function_response {
        println!("{}", format!("  ↳ {}", response).bright_black());
    }
}

fn print_chat_error(error: &ChatError) {
    match error {
        ChatError::Model(e) => {
            eprintln!(
                "{} Model error: {} (your message was not kept)",
                "❌".bright_red(),
                e
            );
        }
        ChatError::ToolExecution { name, source } => {
            eprintln!("{} Function '{}' failed: {}", "❌".bright_red(), name, source);
        }
        ChatError::Media(e) => {
            eprintln!("{} Could not store function output: {}", "❌".bright_red(), e);
        }
        ChatError::RoundLimit(limit) => {
            eprintln!(
                "{} Gave up after {} tool rounds; try rephrasing.",
                "❌".bright_red(),
                limit
            );
        }
    }
}

/// Stream a WAV file, reprinting the reconciled transcript as it evolves.
pub async fn run_transcribe(
    api_key: String,
    endpoint: String,
    language: String,
    file: &Path,
) -> Result<()> {
    let config = TranscriptionConfig {
        endpoint,
        api_key,
        language,
    };

    println!(
        "{}",
        format!("🎙️  Streaming {} ...", file.display()).bright_cyan()
    );

    let reconciler = transcribe_file(&config, file, |snapshot| {
        println!("{}", snapshot.render().bright_black());
    })
    .await?;

    println!("\n{}", "Final transcript:".bright_green().bold());
    println!("{}", reconciler.render());
    Ok(())
}
