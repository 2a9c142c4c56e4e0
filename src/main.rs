//! Main entry point for the subtitle translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zh_subtitle_translator::cli::commands::{self, Commands};
use zh_subtitle_translator::{ClientConfig, Translator};

/// Subtitle translator - translate subtitle text into Simplified Chinese
#[derive(Parser, Debug)]
#[command(name = "zh-subtitle-translator", version, about, long_about = None)]
struct Args {
    /// JSON or TOML config file; ZH_TRANSLATOR_* env vars override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// API key (optional, defaults to ZH_TRANSLATOR_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("zh_subtitle_translator={}", default_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(api_key) = &args.api_key {
        std::env::set_var("ZH_TRANSLATOR_API_KEY", api_key);
    }

    let mut config = ClientConfig::load(args.config.as_ref())?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let translator = Translator::new(config)?;

    match args.command {
        Commands::Translate {
            text,
            context,
            max_retries,
        } => {
            commands::handle_translate(&translator, text, context, max_retries).await?;
        }
        Commands::Lines { file, max_retries } => {
            commands::handle_lines(&translator, file, max_retries).await?;
        }
    }

    Ok(())
}
