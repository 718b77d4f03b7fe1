//! castweave CLI
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use camino::Utf8PathBuf;
use castweave::{Cli, Commands, commands};
use castweave_core::config::ConfigLoader;
use clap::Parser;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = utf8_path(
        std::env::current_dir().context("failed to determine current directory")?,
        "current directory",
    )?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(path) = cli.config.clone() {
        loader = loader.with_file(utf8_path(path, "config path")?);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config.log_dir.clone().map(Utf8PathBuf::into_std_path_buf),
    );
    let console_filter = observability::env_filter(cli.quiet, cli.verbose, "warn");
    let file_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, console_filter, file_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let base_dir = config_sources.base_dir(&cwd).to_path_buf();
    let result = match command {
        Commands::Analyze(args) => {
            commands::analyze::cmd_analyze(args, cli.json, &config, &base_dir)
        }
        Commands::Passages(args) => {
            commands::passages::cmd_passages(args, cli.json, &config, &base_dir)
        }
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &config_sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()
                .context("failed to create async runtime for MCP server")?;
            rt.block_on(commands::serve::cmd_serve(args, config, base_dir))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

fn utf8_path(path: PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}
