//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::client::Translator;
use crate::core::models::TranslationRequest;

/// Commands for the subtitle translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single text block
    Translate {
        /// Text to translate
        #[arg(short, long)]
        text: String,

        /// Surrounding subtitle lines used for coherence
        #[arg(short, long)]
        context: Option<String>,

        /// Retries after the first failed attempt (default: 3)
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Translate a text file line by line, using the previous line as context
    Lines {
        /// Input file (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Retries after the first failed attempt (default: 3)
        #[arg(long)]
        max_retries: Option<u32>,
    },
}

/// Handle single text translation
pub async fn handle_translate(
    translator: &Translator,
    text: String,
    context: Option<String>,
    max_retries: Option<u32>,
) -> anyhow::Result<()> {
    let (ok, result) = translator
        .translate_to_zh(&text, context.as_deref(), max_retries)
        .await
        .into_parts();

    if !ok {
        anyhow::bail!(result);
    }

    println!("{}", result);
    Ok(())
}

/// Handle line-by-line file translation
pub async fn handle_lines(
    translator: &Translator,
    file: PathBuf,
    max_retries: Option<u32>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;
    let requests = line_requests(&content);
    info!("Translating {} line(s) from {}", requests.len(), file.display());

    let mut failed = 0;
    for request in &requests {
        let (ok, result) = translator
            .translate_to_zh(&request.text, request.context.as_deref(), max_retries)
            .await
            .into_parts();

        if ok {
            println!("{}", result);
        } else {
            warn!("Line {:?} failed: {}", request.text, result);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} line(s) failed to translate", failed, requests.len());
    }

    Ok(())
}

/// One request per non-blank line, each carrying the preceding line as context
pub fn line_requests(content: &str) -> Vec<TranslationRequest> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let request = TranslationRequest::new(*line);
            match i.checked_sub(1).map(|prev| lines[prev]) {
                Some(prev) => request.with_context(prev),
                None => request,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_requests_carry_previous_line() {
        let requests = line_requests("Hello there.\n\n  General Kenobi!  \nYou are a bold one.\n");

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].text, "Hello there.");
        assert!(requests[0].context.is_none());
        assert_eq!(requests[1].text, "General Kenobi!");
        assert_eq!(requests[1].context.as_deref(), Some("Hello there."));
        assert_eq!(requests[2].context.as_deref(), Some("General Kenobi!"));
    }

    #[test]
    fn test_line_requests_empty_input() {
        assert!(line_requests("\n  \n").is_empty());
    }
}
