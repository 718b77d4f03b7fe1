//! `castweave info`: package metadata and the effective configuration.

use castweave_core::config::{Config, ConfigSources};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    window_size: usize,
    characters: Vec<String>,
    keep_self_pairs: bool,
    clean_input: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    lexicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_limit: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            window_size: config.window_size,
            characters: config.characters.clone(),
            keep_self_pairs: config.keep_self_pairs,
            clean_input: config.clean_input,
            lexicon: config.lexicon.as_ref().map(|p| p.to_string()),
            input_limit: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print what was built and which settings an `analyze` run would use.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.package.name.bold(), info.package.version.green());
    if !info.package.description.is_empty() {
        println!("{}", info.package.description);
    }
    if !info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), info.package.license);
    }
    if !info.package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), info.package.repository.cyan());
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    match info.config.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), info.config.log_level);
    if let Some(ref dir) = info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Analysis".bold().underline());
    println!("{}: {} tokens", "Window".dimmed(), info.config.window_size);
    if info.config.characters.is_empty() {
        println!("{}: {}", "Characters".dimmed(), "(not set)".dimmed());
    } else {
        println!("{}: {}", "Characters".dimmed(), info.config.characters.join(", "));
    }
    println!("{}: {}", "Keep self pairs".dimmed(), info.config.keep_self_pairs);
    println!("{}: {}", "Clean input".dimmed(), info.config.clean_input);
    if let Some(ref lexicon) = info.config.lexicon {
        println!("{}: {}", "Lexicon".dimmed(), lexicon);
    }
    match info.config.input_limit {
        Some(limit) => println!("{}: {} bytes", "Input limit".dimmed(), limit),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_info_text_succeeds() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), false, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn cmd_info_json_succeeds() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), true, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn config_info_reports_defaults() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.window_size, castweave_core::DEFAULT_WINDOW_SIZE);
        assert_eq!(info.input_limit, Some(castweave_core::DEFAULT_MAX_INPUT_BYTES));
    }
}
