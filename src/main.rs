//! webtailor - rule cache and replay engine for AI page customization
//!
//! Main entry point for the webtailor CLI.

mod cli;
mod register;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use webtailor_config::{Config, ConfigLoader, ConfigValidator, home_dir};
use webtailor_core::origin_key;
use webtailor_protocols::document::Document;
use webtailor_protocols::persistence::{API_KEY_KEY, GLOBAL_PROMPT_KEY, KeyValueStore};

use crate::cli::{Cli, Commands, GlobalPromptAction, RulesAction};
use crate::register::{Engine, assemble, open_rules, open_storage};

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.webtailor/logs/ with daily rotation. Console
/// output goes to stderr so command results on stdout stay parseable.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = home_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("webtailor")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer flushes on drop; keep it for the life of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::default_path);
    let config = ConfigLoader::load_or_default(&path)
        .with_context(|| format!("loading config {}", path.display()))?;

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stylesheet(engine: &Engine) {
    println!("--- injected stylesheet ---");
    println!("{}", engine.document.stylesheet().trim());
}

fn origin_of(url: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(url).with_context(|| format!("invalid URL {}", url))?;
    Ok(origin_key(parsed.host_str().unwrap_or_default()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            page,
            no_global,
            command,
        } => {
            let engine = assemble(&config, &page).await?;
            engine.customizer.initialize().await;

            let command = command.join(" ");
            let result = if no_global {
                engine.customizer.execute_natural_language_command(&command).await?
            } else {
                engine.customizer.process_customization(&command).await?
            };
            print_json(&result)?;
            print_stylesheet(&engine);
        }

        Commands::Replay { page } => {
            let engine = assemble(&config, &page).await?;
            engine.customizer.initialize().await;
            info!(
                origin = %engine.customizer.origin(),
                rules = engine.customizer.rules().await.len(),
                "Replay finished"
            );
            print_stylesheet(&engine);
        }

        Commands::Tool { page, name, params } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).context("--params must be a JSON object")?;
            let engine = assemble(&config, &page).await?;
            engine.customizer.initialize().await;

            let output = engine.customizer.execute_tool(&name, params).await?;
            print_json(&output)?;
            print_stylesheet(&engine);
        }

        Commands::Rules { action } => {
            let rules = open_rules(&config, open_storage(&config).await?).await?;
            match action {
                RulesAction::List { url: Some(url) } => {
                    print_json(&rules.load(&origin_of(&url)?).await)?;
                }
                RulesAction::List { url: None } => {
                    let mut all = HashMap::new();
                    for origin in rules.origins().await {
                        let stored = rules.load(&origin).await;
                        all.insert(origin, stored);
                    }
                    print_json(&all)?;
                }
                RulesAction::Clear { url } => {
                    let origin = origin_of(&url)?;
                    rules.clear(&origin).await?;
                    println!("Cleared rules for {}", origin);
                }
            }
        }

        Commands::Origin { host } => {
            println!("{}", origin_key(&host));
        }

        Commands::GlobalPrompt { action } => match action {
            GlobalPromptAction::Set { text } => {
                let storage = open_storage(&config).await?;
                let text = text.join(" ");
                storage
                    .set(HashMap::from([(GLOBAL_PROMPT_KEY.to_string(), serde_json::json!(text.trim()))]))
                    .await?;
                println!("Global prompt saved");
            }
            GlobalPromptAction::Show => {
                let storage = open_storage(&config).await?;
                let stored = storage.get(&[GLOBAL_PROMPT_KEY]).await?;
                let text = stored
                    .get(GLOBAL_PROMPT_KEY)
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();
                println!("{}", text);
            }
            GlobalPromptAction::Apply { page } => {
                let engine = assemble(&config, &page).await?;
                engine.customizer.initialize().await;
                let result = engine.customizer.apply_global_prompt().await?;
                print_json(&result)?;
                print_stylesheet(&engine);
            }
        },

        Commands::ApiKey { key } => {
            let storage = open_storage(&config).await?;
            storage
                .set(HashMap::from([(API_KEY_KEY.to_string(), serde_json::json!(key.trim()))]))
                .await?;
            println!("API key saved to {}", storage.path().display());
        }
    }

    Ok(())
}
