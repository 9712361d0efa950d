//! Command-line argument parsing for haven-stream.

use thiserror::Error;

use crate::integrations::Integration;

pub const USAGE: &str = "\
Usage: haven-stream [--integration assistant|chat|rewrite] [--context <tag>] <prompt>...

Options:
  -i, --integration <name>  UI integration to act as (default: chat)
  -c, --context <tag>       Override the context tag sent with the request
  -V, --version             Print version and exit
  -h, --help                Print this help and exit

Environment:
  HAVEN_STREAM_URL          Streaming completion endpoint (required)
  HAVEN_STREAM_TOKEN        Bearer token (required)
  HAVEN_STREAM_TIMEOUT_SECS Whole-request timeout in seconds (optional)
  RUST_LOG                  Log filter (default: haven_stream=info)";

/// What to stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamArgs {
    pub integration: Integration,
    /// Overrides the integration's default context tag
    pub context: Option<String>,
    pub prompt: String,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream a reply for a prompt
    Stream(StreamArgs),
}

#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown option {0}")]
    UnknownOption(String),

    #[error("{0}")]
    InvalidIntegration(String),

    #[error("No prompt given")]
    MissingPrompt,
}

/// Parse command-line arguments.
///
/// The first item is the program name. Words that are not options are joined
/// with spaces into the prompt; everything after `--` is prompt text.
///
/// # Examples
///
/// ```
/// use haven_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["haven-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut integration = Integration::FullChat;
    let mut context = None;
    let mut words: Vec<String> = Vec::new();

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--integration" | "-i" => {
                let value = args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                integration = value.parse().map_err(ArgsError::InvalidIntegration)?;
            }
            "--context" | "-c" => {
                let value = args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                context = Some(value);
            }
            "--" => {
                words.extend(args.by_ref());
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(ArgsError::UnknownOption(flag.to_string()));
            }
            _ => words.push(arg),
        }
    }

    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        return Err(ArgsError::MissingPrompt);
    }

    Ok(CliCommand::Stream(StreamArgs {
        integration,
        context,
        prompt,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let args: Vec<String> = std::iter::once("haven-stream")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["-h"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_prompt_words() {
        assert_eq!(
            parse(&["how", "do", "I", "reset"]),
            Ok(CliCommand::Stream(StreamArgs {
                integration: Integration::FullChat,
                context: None,
                prompt: "how do I reset".to_string(),
            }))
        );
    }

    #[test]
    fn test_parse_integration_and_context() {
        let command = parse(&["-i", "rewrite", "--context", "formal", "fix this"]).unwrap();
        assert_eq!(
            command,
            CliCommand::Stream(StreamArgs {
                integration: Integration::RewriteMessage,
                context: Some("formal".to_string()),
                prompt: "fix this".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_double_dash() {
        let command = parse(&["--", "-V", "is", "a", "flag"]).unwrap();
        match command {
            CliCommand::Stream(args) => assert_eq!(args.prompt, "-V is a flag"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&[]), Err(ArgsError::MissingPrompt));
        assert_eq!(
            parse(&["--context"]),
            Err(ArgsError::MissingValue("--context".to_string()))
        );
        assert_eq!(
            parse(&["--bogus", "hi"]),
            Err(ArgsError::UnknownOption("--bogus".to_string()))
        );
        assert!(matches!(
            parse(&["-i", "sidebar", "hi"]),
            Err(ArgsError::InvalidIntegration(_))
        ));
    }
}
