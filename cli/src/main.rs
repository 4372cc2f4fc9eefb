//! CLI entrypoint for live-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection: JSONL events in, console messages out.

use anyhow::{Context, Result};
use clap::Parser;
use relay_application::{LiveStreamRelay, RelayParams};
use relay_domain::{ChatId, Markup, MessageId, RelayEvent, SessionId, UserId};
use relay_infrastructure::{ConfigLoader, FileConfig, JsonlEventReader};
use relay_presentation::{Cli, ConsoleConfig, ConsoleFormatter, ConsoleSink};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// The replayed session has no real trigger message; the status replies to this id.
const TRIGGER_MESSAGE_ID: MessageId = MessageId(0);

type EventInput = Box<dyn AsyncBufRead + Unpin + Send>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    let params = build_params(&cli, &file_config)?;
    debug!(?params, "Relay parameters");

    if !file_config.output.color {
        colored::control::set_override(false);
    }
    let console = ConsoleConfig::default()
        .with_color(file_config.output.color)
        .with_show_controls(file_config.output.show_controls);

    // === Dependency Injection ===
    let sink = Arc::new(ConsoleSink::stdout(console));
    let relay = LiveStreamRelay::new(sink, params);

    let input = open_input(cli.input_path().map(|p| p.as_path())).await?;
    let mut reader = JsonlEventReader::new(input);

    let session_id = cli
        .session_id
        .as_deref()
        .map(str::parse::<SessionId>)
        .transpose()?;
    let outcome = replay(
        &relay,
        &mut reader,
        session_id,
        ChatId(cli.chat_id),
        UserId(cli.user_id),
    )
    .await?;

    let Some(outcome) = outcome else {
        warn!(lines = reader.lines_read(), "No events for the session; nothing to relay");
        return Ok(());
    };

    if let Some(summary) = relay
        .finalize(&outcome.session_id, "", outcome.saw_error)
        .await
    {
        println!();
        println!(
            "{}",
            ConsoleFormatter::format_summary(&summary, outcome.cancelled)
        );
    }
    info!(
        lines = reader.lines_read(),
        skipped = reader.skipped(),
        "Replay finished"
    );

    Ok(())
}

/// What happened while replaying one session.
struct ReplayOutcome {
    session_id: SessionId,
    saw_error: bool,
    cancelled: bool,
}

/// Feed events into the relay until end of input or Ctrl-C.
///
/// Returns `None` when no event for the session was seen.
async fn replay(
    relay: &LiveStreamRelay<ConsoleSink>,
    reader: &mut JsonlEventReader<EventInput>,
    mut session_id: Option<SessionId>,
    chat_id: ChatId,
    user_id: UserId,
) -> Result<Option<ReplayOutcome>> {
    let mut started = false;
    let mut saw_error = false;
    let mut cancelled = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let envelope = tokio::select! {
            next = reader.next_event() => match next? {
                Some(envelope) => envelope,
                None => break,
            },
            signal = &mut ctrl_c, if started => {
                signal.context("Failed to listen for Ctrl-C")?;
                if let Some(id) = &session_id {
                    relay.request_cancel(id);
                }
                cancelled = true;
                break;
            }
        };

        let id = session_id.get_or_insert_with(|| envelope.session_id.clone());
        if envelope.session_id != *id {
            debug!(session_id = %envelope.session_id, "Skipping event for another session");
            continue;
        }

        if !started {
            relay
                .start(user_id, chat_id, TRIGGER_MESSAGE_ID, id.clone())
                .await?;
            started = true;
        }
        saw_error |= matches!(envelope.event, RelayEvent::Error(_));
        relay.handle_event(id, envelope.event).await;
    }

    Ok(session_id.filter(|_| started).map(|session_id| ReplayOutcome {
        session_id,
        saw_error,
        cancelled,
    }))
}

/// Merge config file values with command-line overrides.
fn build_params(cli: &Cli, file_config: &FileConfig) -> Result<RelayParams> {
    let mut params = file_config
        .relay
        .to_params()
        .context("Invalid [relay] configuration")?;
    if let Some(ms) = cli.min_interval_ms {
        params = params.with_min_edit_interval(Duration::from_millis(ms));
    }
    if let Some(display) = cli.tool_display {
        params = params.with_tool_display(display.into());
    }
    if cli.plain {
        params = params.with_markup(Markup::Plain);
    }
    params.validate()?;
    Ok(params)
}

async fn open_input(path: Option<&Path>) -> Result<EventInput> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// Logs go to stderr so they never interleave with relayed messages on
/// stdout. The returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
