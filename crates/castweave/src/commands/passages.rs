//! Passages command: the merged passages one pair of characters shares.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use castweave_core::config::Config;
use castweave_core::sentiment::weighted_mean;
use castweave_core::{PassageSentiment, RuleTokenizer, Tokenizer, pair_passages, text};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{read_story, resolve_scorer};

/// Arguments for the `passages` subcommand.
#[derive(Args, Debug)]
pub struct PassagesArgs {
    /// Story file to search (`.md` files are reduced to prose first).
    pub file: Utf8PathBuf,

    /// The two characters, comma-separated (e.g. `Zuko,Katara`).
    #[arg(long, value_delimiter = ',', required = true)]
    pub pair: Vec<String>,

    /// Window width in tokens.
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Normalize quotes, dashes and stray symbols before tokenizing.
    #[arg(long)]
    pub clean: bool,

    /// JSON file of extra `word → valence` entries for sentiment scoring.
    #[arg(long, value_name = "FILE")]
    pub lexicon: Option<Utf8PathBuf>,
}

#[derive(Serialize)]
struct PairReport<'a> {
    first: &'a str,
    second: &'a str,
    window_size: usize,
    sentiment: f64,
    passages: &'a [PassageSentiment],
}

/// List the scored passages shared by two characters.
#[instrument(name = "cmd_passages", skip_all, fields(file = %args.file))]
pub fn cmd_passages(
    args: PassagesArgs,
    global_json: bool,
    config: &Config,
    base_dir: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(file = %args.file, pair = ?args.pair, window = ?args.window, "executing passages command");

    let [first, second] = args.pair.as_slice() else {
        bail!("--pair takes exactly two names, got {}", args.pair.len());
    };
    let (first, second) = (first.trim(), second.trim());

    let content = read_story(&args.file, config.input_limit())?;
    let content = if args.clean || config.clean_input {
        text::clean_text(&content)
    } else {
        content
    };
    let scorer = resolve_scorer(args.lexicon, config, base_dir)?;
    let window_size = args.window.unwrap_or(config.window_size);

    let document = RuleTokenizer
        .tokenize(&content)
        .with_context(|| format!("failed to tokenize {}", args.file))?;
    let passages = pair_passages(&document, first, second, window_size, &scorer)
        .with_context(|| format!("failed to find passages for {first} and {second}"))?;

    let report = PairReport {
        first,
        second,
        window_size,
        sentiment: weighted_mean(&passages),
        passages: &passages,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        report.first.bold(),
        "&".dimmed(),
        report.second.bold()
    );
    if report.passages.is_empty() {
        println!(
            "  {}",
            format!("no passages within {window_size} tokens").dimmed()
        );
        return Ok(());
    }
    println!(
        "  {} {} passages, mean sentiment {:+.3}",
        "Found:".cyan(),
        report.passages.len(),
        report.sentiment
    );
    for (i, passage) in report.passages.iter().enumerate() {
        let score = format!("{:+.3}", passage.score);
        let score = if passage.score >= 0.0 {
            score.green().to_string()
        } else {
            score.red().to_string()
        };
        println!("\n  {} {}", format!("[{}]", i + 1).dimmed(), score);
        for line in passage.text.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}
