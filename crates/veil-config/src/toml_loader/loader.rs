//! Reading a config file into a `VeilConfig`.

use crate::schema::VeilConfig;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};
use veil_common::ConfigError;

use super::paths::{create_default_config, default_config_path, io_failure};

/// Parse the TOML file at `path`.
///
/// Missing fields take their defaults. Validation problems are logged and
/// the parsed config is returned anyway; `crate::load_config_from` is the
/// strict variant.
pub fn load_from_path(path: &Path) -> Result<VeilConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(io_failure("read", path, e)),
    };

    let config = toml::from_str::<VeilConfig>(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    match crate::validation::validate(&config) {
        Ok(()) => debug!(path = %path.display(), "config loaded"),
        Err(e) => warn!(path = %path.display(), "config loaded with problems: {e}"),
    }
    Ok(config)
}

/// Load the per-user config, writing the commented default first if there
/// is none yet.
pub fn load_default() -> Result<VeilConfig, ConfigError> {
    let path = default_config_path()?;
    load_from_path(&path).or_else(|e| match e {
        ConfigError::FileNotFound(_) => {
            info!(path = %path.display(), "no config yet");
            create_default_config(&path)?;
            Ok(VeilConfig::default())
        }
        other => Err(other),
    })
}
