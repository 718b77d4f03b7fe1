//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes castweave's analytics over the MCP protocol via stdio
//! transport. It is a presentation layer over the same core library the CLI
//! commands use: each `#[tool]` method validates its input, calls into
//! `castweave_core`, and returns JSON text.
//!
//! Roster and window mistakes come back as `invalid_params`; anything else
//! that fails inside the pipeline is an `internal_error`.

use std::sync::Arc;

use castweave_core::config::Config;
use castweave_core::sentiment::weighted_mean;
use castweave_core::{
    AnalysisError, AnalyzeOptions, LexiconScorer, RuleTokenizer, SentimentScorer, Tokenizer,
    analyze_text, markdown, pair_passages, text,
};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_interactions` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeInteractionsParams {
    /// The story text.
    pub text: String,
    /// Characters to track. Omit to use the server's configured roster.
    pub characters: Option<Vec<String>>,
    /// Window width in tokens. Omit for the configured default.
    pub window_size: Option<usize>,
    /// Keep "alone" frequencies on the pair matrix diagonal.
    pub keep_self_pairs: Option<bool>,
    /// Normalize quotes, dashes and stray symbols first.
    pub clean: Option<bool>,
    /// Treat the text as markdown and reduce it to prose first.
    #[serde(default)]
    pub markdown: bool,
}

/// Parameters for the `pair_passages` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PairPassagesParams {
    /// The story text.
    pub text: String,
    /// Exactly two character names.
    pub pair: Vec<String>,
    /// Window width in tokens. Omit for the configured default.
    pub window_size: Option<usize>,
    /// Normalize quotes, dashes and stray symbols first. Omit for the configured default.
    pub clean: Option<bool>,
    /// Treat the text as markdown and reduce it to prose first.
    #[serde(default)]
    pub markdown: bool,
}

/// Parameters for the `score_sentiment` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScoreSentimentParams {
    /// The passage to score.
    pub text: String,
}

/// Server-wide defaults taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Window width when a call does not give one.
    pub window_size: usize,
    /// Roster when a call does not give one.
    pub characters: Vec<String>,
    /// Keep the pair matrix diagonal unless a call says otherwise.
    pub keep_self_pairs: bool,
    /// Clean input unless a call says otherwise.
    pub clean_input: bool,
    /// Largest accepted `text`, in bytes.
    pub max_input_bytes: Option<usize>,
}

impl ServerSettings {
    /// Settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            window_size: config.window_size,
            characters: config.characters.clone(),
            keep_self_pairs: config.keep_self_pairs,
            clean_input: config.clean_input,
            max_input_bytes: config.input_limit(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// MCP server exposing character interaction analytics.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    settings: Arc<ServerSettings>,
    scorer: Arc<LexiconScorer>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

fn analysis_error(err: AnalysisError) -> McpError {
    if err.is_configuration() || matches!(err, AnalysisError::EmptyInput) {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

impl ProjectServer {
    /// Server with the given defaults and scorer.
    pub fn with_settings(settings: ServerSettings, scorer: LexiconScorer) -> Self {
        Self {
            tool_router: Self::tool_router(),
            settings: Arc::new(settings),
            scorer: Arc::new(scorer),
        }
    }

    /// Enforce the size limit, then optionally reduce markdown to prose.
    fn prepare_text(&self, text: String, is_markdown: bool) -> Result<String, McpError> {
        if let Some(max) = self.settings.max_input_bytes
            && text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            ));
        }
        Ok(if is_markdown {
            markdown::to_prose(&text)
        } else {
            text
        })
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server instance with default settings.
    pub fn new() -> Self {
        Self::with_settings(ServerSettings::default(), LexiconScorer::new())
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "window_size": self.settings.window_size,
            "characters": self.settings.characters,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Full interaction analysis for a roster.
    #[tool(
        description = "Analyze how characters interact in a story. Returns per-character presence frequencies, a symmetric pair co-presence matrix, the passages each pair shares with sentiment scores, and mean pair sentiment."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_interactions(
        &self,
        Parameters(params): Parameters<AnalyzeInteractionsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_interactions",
            characters = ?params.characters,
            window_size = ?params.window_size,
            "executing MCP tool"
        );

        let text = self.prepare_text(params.text, params.markdown)?;
        let characters = params
            .characters
            .unwrap_or_else(|| self.settings.characters.clone());
        let options = AnalyzeOptions {
            window_size: params.window_size.unwrap_or(self.settings.window_size),
            clean_input: params.clean.unwrap_or(self.settings.clean_input),
            keep_self_pairs: params
                .keep_self_pairs
                .unwrap_or(self.settings.keep_self_pairs),
        };

        let result = analyze_text(
            &text,
            &characters,
            &options,
            &RuleTokenizer,
            self.scorer.as_ref(),
        )
        .map_err(analysis_error)?;
        let json = to_json(&result)?;

        tracing::info!(
            tool = "analyze_interactions",
            present = result.char_list.len(),
            windows = result.windows,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Passages shared by one pair.
    #[tool(
        description = "List the sentence-aligned passages in which two characters appear within a window of each other, with a sentiment score for each and their length-weighted mean."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn pair_passages(
        &self,
        Parameters(params): Parameters<PairPassagesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "pair_passages", pair = ?params.pair, "executing MCP tool");

        let [first, second] = params.pair.as_slice() else {
            return Err(McpError::invalid_params(
                format!("pair takes exactly two names, got {}", params.pair.len()),
                None,
            ));
        };
        let (first, second) = (first.trim(), second.trim());
        let window_size = params.window_size.unwrap_or(self.settings.window_size);
        let text = self.prepare_text(params.text, params.markdown)?;
        let text = if params.clean.unwrap_or(self.settings.clean_input) {
            text::clean_text(&text)
        } else {
            text
        };

        let document = RuleTokenizer.tokenize(&text).map_err(analysis_error)?;
        let passages = pair_passages(&document, first, second, window_size, self.scorer.as_ref())
            .map_err(analysis_error)?;
        let json = to_json(&serde_json::json!({
            "first": first,
            "second": second,
            "window_size": window_size,
            "sentiment": weighted_mean(&passages),
            "passages": passages,
        }))?;

        tracing::info!(
            tool = "pair_passages",
            passages = passages.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Compound sentiment of one passage.
    #[tool(description = "Score the sentiment of a passage. Returns a compound score in [-1, 1].")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_sentiment(
        &self,
        Parameters(params): Parameters<ScoreSentimentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "score_sentiment", "executing MCP tool");

        let text = self.prepare_text(params.text, false)?;
        let score = self.scorer.score(&text).map_err(analysis_error)?;
        let json = to_json(&serde_json::json!({ "score": score }))?;

        tracing::info!(tool = "score_sentiment", score, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_interactions for a whole roster, \
                 pair_passages for one pair, score_sentiment for a single passage.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
