use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Veil: dialog and overlay layer for a tabbed browser shell.
#[derive(Parser, Debug)]
#[command(name = "veil", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (a tracing filter directive, e.g. `veil=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Load dialog pages from the local dev server.
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the effective configuration as JSON.
    PrintConfig,
    /// Print the URL a dialog's page is loaded from.
    ContentUrl {
        /// Dialog name, e.g. `menu`.
        name: String,
    },
    /// Run a scripted menu session against the in-memory host (default).
    Simulate,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let args = Args::try_parse_from(["veil"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.dev);
        assert!(args.config.is_none());
    }

    #[test]
    fn parses_content_url() {
        let args = Args::try_parse_from(["veil", "--dev", "content-url", "menu"]).unwrap();
        assert!(args.dev);
        assert_eq!(
            args.command,
            Some(Command::ContentUrl {
                name: "menu".into()
            })
        );
    }

    #[test]
    fn parses_global_options() {
        let args = Args::try_parse_from([
            "veil",
            "--config",
            "/tmp/veil.toml",
            "--log-level",
            "veil=debug",
            "print-config",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/veil.toml")));
        assert_eq!(args.log_level.as_deref(), Some("veil=debug"));
        assert_eq!(args.command, Some(Command::PrintConfig));
    }
}
