//! CLI module for haven-stream.
//!
//! ```ignore
//! use haven_stream::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, StreamArgs, USAGE};
pub use version::{version_string, VERSION};

use color_eyre::Result;
use std::io::Write;
use std::process::ExitCode;

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::integrations::{ChatStreamer, Integration, SessionHandle};
use crate::models::ChatMessage;
use crate::session::SessionState;
use crate::traits::{DoneInfo, ErrorInfo, HttpClient, StreamCallbacks};

/// Exit status for a stream that failed after the fallback was printed
pub const EXIT_STREAM_FAILED: u8 = 1;

/// Prints a streaming reply as it grows.
///
/// Snapshots only ever extend the text, so each redraw writes the part not
/// yet on screen.
pub struct TerminalPrinter<W: Write + Send> {
    out: W,
    printed: usize,
}

impl<W: Write + Send> TerminalPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to write reply: {}", e);
        }
    }
}

impl<W: Write + Send> StreamCallbacks for TerminalPrinter<W> {
    fn on_delta(&mut self, text: &str) {
        let fresh = text.get(self.printed..).unwrap_or(text).to_string();
        self.printed = text.len();
        self.write(&fresh);
    }

    fn on_done(&mut self, info: &DoneInfo) {
        if info.is_possibly_partial() {
            self.write("\n[connection closed early, reply may be incomplete]\n");
        } else {
            self.write("\n");
        }
    }

    fn on_error(&mut self, info: &ErrorInfo) {
        if !info.partial_text.is_empty() {
            self.write("\n");
        }
        let line = format!("[{}]\n", info.fallback_message);
        self.write(&line);
    }
}

/// Run a parsed command.
///
/// `Err` is reserved for setup problems (configuration, client). A stream
/// that fails has already shown its fallback message and only sets the
/// exit code.
pub async fn run_cli_command(command: CliCommand) -> Result<ExitCode> {
    match command {
        CliCommand::Version => {
            println!("{}", version_string());
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Stream(args) => run_stream(args).await,
    }
}

/// Exit status for the state a stream ended in
pub fn exit_status(state: SessionState) -> u8 {
    match state {
        SessionState::Failed => EXIT_STREAM_FAILED,
        _ => 0,
    }
}

/// Start the session described by the command line.
pub fn start_stream<H, C>(
    client: H,
    config: ClientConfig,
    args: StreamArgs,
    callbacks: C,
) -> std::result::Result<SessionHandle, NetworkError>
where
    H: HttpClient + 'static,
    C: StreamCallbacks + 'static,
{
    let mut streamer = ChatStreamer::new(client, config, args.integration);
    if let Some(context) = args.context {
        streamer = streamer.with_context(context);
    }

    match args.integration {
        Integration::RewriteMessage => streamer.start_rewrite(&args.prompt, callbacks),
        _ => streamer.start(vec![ChatMessage::user(args.prompt)], callbacks),
    }
}

/// Stream one reply to stdout. Ctrl-C cancels the session.
pub async fn run_stream(args: StreamArgs) -> Result<ExitCode> {
    let config = ClientConfig::from_env()?;
    let client = config.build_http_client()?;

    let printer = TerminalPrinter::new(std::io::stdout());
    let handle = start_stream(client, config, args, printer)?;

    let cancel = handle.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling stream");
            cancel.cancel();
        }
    });

    let outcome = handle.join().await?;
    interrupt.abort();

    if outcome.state == SessionState::Cancelled {
        eprintln!();
        eprintln!("Cancelled.");
    }
    tracing::debug!("Stream ended in state {}", outcome.state);
    Ok(ExitCode::from(exit_status(outcome.state)))
}
