//! Analyze command: presence, pair frequencies and pair sentiment for a roster.

use std::time::Duration;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use castweave_core::config::Config;
use castweave_core::{AnalyticsResult, AnalyzeOptions, RuleTokenizer, analyze_text};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use super::{read_story, resolve_roster, resolve_scorer};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Story file to analyze (`.md` files are reduced to prose first).
    pub file: Utf8PathBuf,

    /// Characters to track (comma-separated). Defaults to `characters` from config.
    #[arg(long, value_delimiter = ',')]
    pub characters: Option<Vec<String>>,

    /// Window width in tokens.
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Keep "alone" frequencies on the diagonal of the pair matrix.
    #[arg(long)]
    pub keep_self_pairs: bool,

    /// Normalize quotes, dashes and stray symbols before tokenizing.
    #[arg(long)]
    pub clean: bool,

    /// JSON file of extra `word → valence` entries for sentiment scoring.
    #[arg(long, value_name = "FILE")]
    pub lexicon: Option<Utf8PathBuf>,

    /// Number of pairs to list in text output.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Analyze character interactions in a story file.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    base_dir: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(file = %args.file, characters = ?args.characters, window = ?args.window, "executing analyze command");

    let content = read_story(&args.file, config.input_limit())?;
    let roster = resolve_roster(args.characters, config)?;
    let scorer = resolve_scorer(args.lexicon, config, base_dir)?;
    let options = AnalyzeOptions {
        window_size: args.window.unwrap_or(config.window_size),
        clean_input: args.clean || config.clean_input,
        keep_self_pairs: args.keep_self_pairs || config.keep_self_pairs,
    };

    let spinner = (!global_json).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("analyzing {}", args.file));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });
    let result = analyze_text(&content, &roster, &options, &RuleTokenizer, &scorer);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result.with_context(|| format!("failed to analyze {}", args.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_report(&args.file, &roster, &result, args.top);
    Ok(())
}

fn print_report(file: &Utf8Path, roster: &[String], result: &AnalyticsResult, top: usize) {
    println!("{}", file.bold());
    println!(
        "  {} {} tokens, {} windows",
        "Window:".cyan(),
        result.window_size,
        result.windows
    );

    println!("\n  {}", "Characters:".cyan());
    for (i, name) in result.char_list.iter().enumerate() {
        println!(
            "    {:<16} {:>6.1}% of windows, {} mentions",
            name,
            result.char_freqs[i] * 100.0,
            result.mentions[i],
        );
    }
    let missing: Vec<&str> = roster
        .iter()
        .filter(|name| !result.char_list.contains(*name))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        println!("    {} {}", "not found:".yellow(), missing.join(", "));
    }

    let pairs = result.strongest_pairs(top);
    if pairs.is_empty() {
        println!("\n  {}", "No character pairs share a window.".dimmed());
        return;
    }
    println!("\n  {}", "Strongest pairs:".cyan());
    for pair in pairs {
        let label = format!("{} & {}", pair.first, pair.second);
        let sentiment = format!("{:+.3}", pair.sentiment);
        let sentiment = if pair.sentiment > 0.05 {
            sentiment.green().to_string()
        } else if pair.sentiment < -0.05 {
            sentiment.red().to_string()
        } else {
            sentiment.dimmed().to_string()
        };
        println!(
            "    {:<28} {:>6.1}%  sentiment {}  ({} passages)",
            label,
            pair.frequency * 100.0,
            sentiment,
            pair.passages,
        );
    }
}
