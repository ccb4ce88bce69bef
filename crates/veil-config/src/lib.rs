//! Settings for the Veil dialog layer, read from one TOML file.
//!
//! Sections: `[content]` (dev server or packaged pages), `[pool]` (warm
//! surface counts), `[dialogs]` (persistent overlays, menu geometry) and
//! `[logging]`. Anything left out of the file keeps its default.
//!
//! ```rust,no_run
//! let config = veil_config::load_config()?;
//! println!("pool floor: {}", config.pool.retention_floor);
//! # Ok::<(), veil_common::ConfigError>(())
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ContentConfig, ContentMode, DialogsConfig, LogLevel, LoggingConfig, MenuDialogConfig,
    PoolConfig, VeilConfig, CONFIG_SCHEMA_VERSION,
};

use veil_common::ConfigError;

/// Per-user config, validated. Writes the commented default on first run.
pub fn load_config() -> Result<VeilConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Config at `path`, validated. Unlike the loader, invalid values are an error.
pub fn load_config_from(path: &std::path::Path) -> Result<VeilConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Pretty JSON dump, used by `veil print-config`.
pub fn config_to_json(config: &VeilConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}
