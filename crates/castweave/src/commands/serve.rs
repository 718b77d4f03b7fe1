//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use camino::Utf8PathBuf;
use castweave_core::config::Config;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use crate::server::{ProjectServer, ServerSettings};

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve MCP tools over stdin/stdout until the client disconnects.
///
/// The configured lexicon is loaded once, up front; a bad lexicon path fails
/// here rather than on the first tool call.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    config: Config,
    base_dir: Utf8PathBuf,
) -> anyhow::Result<()> {
    let scorer = config
        .scorer(&base_dir)
        .context("failed to load configured lexicon")?;
    let server = ProjectServer::with_settings(ServerSettings::from_config(&config), scorer);

    info!(
        window_size = config.window_size,
        characters = config.characters.len(),
        "starting MCP server on stdio"
    );
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server task failed")?;
    info!(?reason, "MCP server stopped");
    Ok(())
}
