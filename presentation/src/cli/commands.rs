//! CLI command definitions

use clap::{Parser, ValueEnum};
use relay_application::ToolDisplay;
use std::path::PathBuf;

/// How tool calls are shown, as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToolDisplayArg {
    /// One status edit per tool-call batch
    Batched,
    /// A dedicated message per tool call
    PerTool,
}

impl From<ToolDisplayArg> for ToolDisplay {
    fn from(arg: ToolDisplayArg) -> Self {
        match arg {
            ToolDisplayArg::Batched => ToolDisplay::Batched,
            ToolDisplayArg::PerTool => ToolDisplay::PerTool,
        }
    }
}

/// CLI arguments for live-relay
#[derive(Parser, Debug)]
#[command(name = "live-relay")]
#[command(author, version, about = "Relay streaming assistant events into live-updating chat messages")]
#[command(long_about = r#"
live-relay replays a stream of assistant session events (JSON Lines) through
the live relay and prints every chat message it sends, edits or strips of
its cancel button.

Each input line looks like:
  {"kind":"content","session_id":"p1","payload":{"text":"Hello"}}

Kinds: content, tool_call_batch, tool_result, progress, error.
The session is finalized at end of input. Ctrl-C requests cancellation.

Configuration files are loaded from (in priority order):
1. LIVE_RELAY_* environment variables
2. --config <path>     Explicit config file
3. ./relay.toml        Project-level config
4. ~/.config/live-relay/config.toml   Global config

Example:
  live-relay session.jsonl
  cat session.jsonl | live-relay --tool-display per-tool --min-interval-ms 300
"#)]
pub struct Cli {
    /// JSON Lines file to replay (reads stdin when omitted or "-")
    pub events_file: Option<PathBuf>,

    /// Session to relay; events for other sessions are ignored
    /// (defaults to the session id of the first event)
    #[arg(long, value_name = "ID")]
    pub session_id: Option<String>,

    /// Chat the messages are posted to
    #[arg(long, value_name = "ID", default_value_t = 1)]
    pub chat_id: i64,

    /// User who started the session
    #[arg(long, value_name = "ID", default_value_t = 1)]
    pub user_id: i64,

    /// Minimum milliseconds between content edits (overrides config)
    #[arg(long, value_name = "MS")]
    pub min_interval_ms: Option<u64>,

    /// How tool calls are shown (overrides config)
    #[arg(long, value_enum)]
    pub tool_display: Option<ToolDisplayArg>,

    /// Render without markup
    #[arg(long)]
    pub plain: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Events file, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.events_file
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}
