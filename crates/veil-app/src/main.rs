mod cli;
mod simulate;

use std::process::ExitCode;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;
use veil_common::{ConfigError, VeilError};
use veil_config::{ContentMode, VeilConfig};
use veil_dialogs::ContentOrigin;

use cli::{Args, Command};

/// Load the config named on the command line, or the default one.
///
/// An explicit path must load cleanly. The default location falls back to
/// built-in defaults so a broken user config never blocks startup.
fn load_config(args: &Args) -> (VeilConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => veil_config::load_config_from(path),
        None => veil_config::load_config(),
    };
    let (mut config, failure) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (VeilConfig::default(), Some(e)),
    };
    if args.dev {
        config.content.mode = ContentMode::DevServer;
    }
    (config, failure)
}

fn init_logging(args: &Args, config: &VeilConfig) {
    let fallback = format!("veil={}", config.logging.level.as_directive());
    let directive: Directive = args
        .log_level
        .as_deref()
        .unwrap_or(&fallback)
        .parse()
        .or_else(|_| fallback.parse())
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn execute(args: &Args, config: &VeilConfig) -> Result<(), VeilError> {
    match args.command.clone().unwrap_or(Command::Simulate) {
        Command::PrintConfig => {
            println!("{}", veil_config::config_to_json(config));
        }
        Command::ContentUrl { name } => {
            if !veil_config::validation::is_valid_dialog_name(&name) {
                return Err(VeilError::Other(format!("invalid dialog name: {name:?}")));
            }
            println!("{}", ContentOrigin::from_config(&config.content).url_for(&name));
        }
        Command::Simulate => {
            let summary = simulate::run(config)?;
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| VeilError::Other(e.to_string()))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse();
    let (config, failure) = load_config(&args);

    init_logging(&args, &config);
    tracing::info!("Veil v{} starting...", env!("CARGO_PKG_VERSION"));

    match (&args.config, failure) {
        (Some(path), Some(e)) => {
            tracing::error!("Config {} failed to load: {e}", path.display());
            return ExitCode::FAILURE;
        }
        (None, Some(e)) => tracing::warn!("Config load failed, using defaults: {e}"),
        (_, None) => {}
    }
    tracing::debug!(mode = ?config.content.mode, "content origin selected");

    match execute(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
