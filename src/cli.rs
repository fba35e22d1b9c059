use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::ui::pipe::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "air-chat", about = "Terminal client for the Air Helper site chat")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Site origin to chat with, e.g. https://example.com (overrides config)
    #[arg(short, long, global = true)]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the interactive chat shell
    Run,
    /// Send stdin lines as messages and print replies to stdout
    Pipe {
        /// How each received message is printed
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Quiet period to wait for replies after stdin closes, in milliseconds
        #[arg(long, default_value_t = 2_000)]
        linger_ms: u64,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use crate::ui::pipe::OutputFormat;

    #[test]
    fn defaults_to_run_when_command_is_missing() {
        let cli = Cli::parse_from(["air-chat"]);

        assert_eq!(cli.command_or_default(), Command::Run);
        assert_eq!(cli.origin, None);
    }

    #[test]
    fn parses_explicit_run_command() {
        let cli = Cli::parse_from(["air-chat", "run", "--config", "custom.toml"]);

        assert_eq!(cli.command_or_default(), Command::Run);
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
    }

    #[test]
    fn parses_pipe_with_defaults() {
        let cli = Cli::parse_from(["air-chat", "pipe"]);

        assert_eq!(
            cli.command_or_default(),
            Command::Pipe {
                format: OutputFormat::Text,
                linger_ms: 2_000,
            }
        );
    }

    #[test]
    fn origin_is_accepted_after_subcommand() {
        let cli = Cli::parse_from([
            "air-chat",
            "pipe",
            "--format",
            "html",
            "--origin",
            "https://example.com",
            "--linger-ms",
            "500",
        ]);

        assert_eq!(cli.origin.as_deref(), Some("https://example.com"));
        assert_eq!(
            cli.command_or_default(),
            Command::Pipe {
                format: OutputFormat::Html,
                linger_ms: 500,
            }
        );
    }
}
