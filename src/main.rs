use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recast::segmenter::{normalize_sentence_into, RuleSegmenter, SegmentationRules};
use recast::{
    Abort, Completion, EditorSession, EditorSnapshot, HttpRewriter, RewriteConfig, TextSpan,
};

#[derive(Parser, Debug)]
#[command(name = "recast")]
#[command(about = "Select and rewrite the sentence at a cursor position")]
#[command(version)]
struct Args {
    /// JSON file overriding the default segmentation rules
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every sentence with its char span
    Segment {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Emit JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },
    /// Print the sentence at the cursor
    Select {
        /// Cursor offset in chars
        #[arg(long)]
        cursor: usize,

        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Rewrite the sentence at the cursor and print the resulting text
    Rewrite {
        /// Cursor offset in chars
        #[arg(long)]
        cursor: usize,

        /// How the rewritten sentence should begin
        #[arg(long)]
        directive: String,

        /// Rewriting service URL
        #[arg(long, env = "RECAST_REWRITE_ENDPOINT")]
        endpoint: String,

        /// Request timeout in milliseconds
        #[arg(long, env = "RECAST_REWRITE_TIMEOUT_MS")]
        timeout_ms: Option<u64>,

        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SentenceRecord<'a> {
    index: usize,
    span: TextSpan,
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: stdout carries command output, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let rules = match &args.rules {
        Some(path) => SegmentationRules::from_json_file(path)?,
        None => SegmentationRules::default(),
    };
    let segmenter = RuleSegmenter::new(rules)?;

    match args.command {
        Command::Segment { file, json } => {
            let text = read_input(file.as_deref()).await?;
            run_segment(&segmenter, &text, json)
        }
        Command::Select { cursor, file } => {
            let text = read_input(file.as_deref()).await?;
            let mut session = EditorSession::with_segmenter(&segmenter);
            match session.select_sentence(EditorSnapshot::new(&text, cursor)) {
                Ok(span) => {
                    if let Some(sentence) = span.slice(&text) {
                        println!("{sentence}");
                    }
                }
                Err(reason) => info!(?reason, "No sentence to select"),
            }
            Ok(())
        }
        Command::Rewrite {
            cursor,
            directive,
            endpoint,
            timeout_ms,
            file,
        } => {
            let text = read_input(file.as_deref()).await?;
            let mut config = RewriteConfig::new(&endpoint)?;
            if let Some(millis) = timeout_ms {
                config = config.with_timeout(Duration::from_millis(millis));
            }
            let rewriter = HttpRewriter::new(config)?;
            run_rewrite(&segmenter, &rewriter, &text, cursor, &directive).await
        }
    }
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_segment(segmenter: &RuleSegmenter, text: &str, json: bool) -> Result<()> {
    let sentences = segmenter.detect_sentences_borrowed(text)?;

    if json {
        let records: Vec<SentenceRecord> = sentences
            .iter()
            .map(|sentence| SentenceRecord {
                index: sentence.index,
                span: sentence.span,
                text: sentence.raw(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let mut buffer = String::new();
    for sentence in &sentences {
        normalize_sentence_into(sentence.raw(), &mut buffer);
        println!(
            "{}\t{}\t({},{})",
            sentence.index, buffer, sentence.span.start, sentence.span.end
        );
    }
    Ok(())
}

async fn run_rewrite(
    segmenter: &RuleSegmenter,
    rewriter: &HttpRewriter,
    text: &str,
    cursor: usize,
    directive: &str,
) -> Result<()> {
    let mut session = EditorSession::with_segmenter(segmenter);

    let span = match session.select_sentence(EditorSnapshot::new(text, cursor)) {
        Ok(span) => span,
        Err(Abort::NoSentenceFound) => {
            info!("No sentence at cursor; text left unchanged");
            print!("{text}");
            return Ok(());
        }
        Err(reason) => anyhow::bail!("Rewrite aborted: {reason:?}"),
    };

    let snapshot = EditorSnapshot::new(text, cursor).with_selection(span);
    let completion = session
        .rewrite_sentence(rewriter, snapshot, Some(directive), || text.to_string())
        .await;
    match completion {
        Ok(Completion::Applied { text, span }) => {
            info!(?span, "Rewrite applied");
            print!("{text}");
            Ok(())
        }
        Ok(Completion::Failed(error)) => Err(error).context("Rewrite failed; text left unchanged"),
        Ok(Completion::Discarded(reason)) => anyhow::bail!("Rewrite result discarded: {reason:?}"),
        Err(reason) => anyhow::bail!("Rewrite aborted: {reason:?}"),
    }
}
